#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the Kerbside server.
//!
//! These types are serialized to JSON for the REST API. Success bodies
//! are the upstream-shaped records from
//! `kerbside_vehicle_data_models`, passed through unchanged; this
//! crate only adds the inbound request envelopes, the error body and
//! the report response with its risk supplement.

use kerbside_risk::RiskAssessment;
use kerbside_vehicle_data_models::ComprehensiveReport;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Always true when the server can respond.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable machine-readable error kind.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Request body for registration-keyed lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    /// Vehicle registration number, any casing/spacing.
    pub registration: String,
}

/// Request body for the driver enquiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenceRequest {
    /// Driving licence number, any casing/spacing.
    pub license_number: String,
}

/// Request body for a valuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRequest {
    /// CAP vehicle identifier from a prior vehicle lookup.
    pub vehicle_id: String,
    /// Current mileage.
    pub mileage: u32,
    /// Optional condition band (e.g. "good").
    #[serde(default)]
    pub condition: Option<String>,
}

/// Request body for an insurance lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceRequest {
    /// CAP vehicle identifier from a prior vehicle lookup.
    pub vehicle_id: String,
}

/// Request body for the comprehensive report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// Vehicle registration number.
    pub registration: String,
    /// Mileage; a valuation section is only attempted when present.
    #[serde(default)]
    pub mileage: Option<u32>,
    /// Optional condition band for the valuation.
    #[serde(default)]
    pub condition: Option<String>,
}

/// Comprehensive report response: the gateway report plus the risk
/// assessment derived from its history section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    /// The gateway report, flattened into this body.
    #[serde(flatten)]
    pub report: ComprehensiveReport,
    /// Present iff the history section is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_assessment: Option<RiskAssessment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerbside_risk::RiskLevel;
    use kerbside_vehicle_data_models::CapVehicle;

    fn report_of(history: Option<kerbside_vehicle_data_models::HistoryCheck>) -> ComprehensiveReport {
        ComprehensiveReport {
            vehicle: CapVehicle {
                cap_id: "CAP-1".to_string(),
                registration: "AB12CDE".to_string(),
                make: Some("FORD".to_string()),
                model: None,
                derivative: None,
                built_year: None,
                fuel_type: None,
                transmission: None,
            },
            valuation: None,
            insurance: None,
            history,
        }
    }

    #[test]
    fn report_response_flattens_and_carries_risk() {
        let response = ReportResponse {
            report: report_of(None),
            risk_assessment: Some(RiskAssessment {
                score: 10,
                level: RiskLevel::High,
                alerts: vec!["Vehicle reported as stolen".to_string()],
            }),
        };
        let json = serde_json::to_value(&response).unwrap();
        // The report flattens into the body rather than nesting.
        assert_eq!(json["vehicle"]["capId"], "CAP-1");
        assert_eq!(json["riskAssessment"]["level"], "high");
        assert_eq!(json["riskAssessment"]["score"], 10);
    }

    #[test]
    fn report_response_omits_absent_risk() {
        let response = ReportResponse {
            report: report_of(None),
            risk_assessment: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("riskAssessment").is_none());
        assert_eq!(json["vehicle"]["registration"], "AB12CDE");
    }

    #[test]
    fn licence_request_uses_api_field_name() {
        let req: LicenceRequest =
            serde_json::from_str(r#"{"licenseNumber":"SMITH710238HJ91"}"#).unwrap();
        assert_eq!(req.license_number, "SMITH710238HJ91");
    }

    #[test]
    fn report_request_fields_are_optional() {
        let req: ReportRequest = serde_json::from_str(r#"{"registration":"AB12CDE"}"#).unwrap();
        assert!(req.mileage.is_none());
        assert!(req.condition.is_none());
    }
}
