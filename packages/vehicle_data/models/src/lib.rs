#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared data model for the Kerbside vehicle data gateway.
//!
//! Defines the closed error taxonomy every lookup operation maps onto,
//! the total status-code-to-message table, and the typed records
//! returned by the upstream vehicle/driver APIs (DVLA Vehicle Enquiry,
//! DVLA driver enquiry, DVSA MOT history, CAP HPI-style valuation,
//! insurance and history-check endpoints).
//!
//! These types are separate from the gateway crate so the server, CLI
//! and risk crates can depend on the data shapes without pulling in
//! the HTTP client stack.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// A lookup operation exposed by the gateway, used for log lines and
/// fallback error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum Operation {
    /// DVLA Vehicle Enquiry Service lookup by registration.
    #[strum(serialize = "vehicle enquiry")]
    VehicleEnquiry,
    /// DVLA driver enquiry by driving licence number.
    #[strum(serialize = "driver enquiry")]
    DriverEnquiry,
    /// DVSA MOT history lookup by registration.
    #[strum(serialize = "MOT history lookup")]
    MotHistory,
    /// CAP vehicle identifier resolution by registration.
    #[strum(serialize = "vehicle lookup")]
    CapVehicle,
    /// CAP valuation by vehicle identifier.
    #[strum(serialize = "valuation")]
    Valuation,
    /// CAP insurance data by vehicle identifier.
    #[strum(serialize = "insurance lookup")]
    Insurance,
    /// CAP provenance history check by registration.
    #[strum(serialize = "history check")]
    HistoryCheck,
    /// OAuth2 client-credentials token exchange.
    #[strum(serialize = "token exchange")]
    TokenExchange,
}

/// The closed error taxonomy for every gateway operation.
///
/// Errors are returned as values and carry a stable machine-readable
/// kind plus a human-readable message. Callers branch on the variant,
/// never on message text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataError {
    /// The identifier failed local shape validation. No network call
    /// was made.
    #[error("{message}")]
    InvalidFormat {
        /// What was wrong with the identifier.
        message: String,
    },

    /// Required credential material is missing or empty. No network
    /// call was made.
    #[error("{message}")]
    Configuration {
        /// Which configuration was missing.
        message: String,
    },

    /// The call produced no HTTP response (connect failure, timeout).
    #[error("{message}")]
    Network {
        /// Transport-level failure description.
        message: String,
    },

    /// The upstream service answered with a non-2xx status.
    #[error("{message}")]
    Upstream {
        /// The upstream HTTP status code.
        status: u16,
        /// Message selected from the per-status table.
        message: String,
    },

    /// Anything that fits none of the above.
    #[error("{message}")]
    Unknown {
        /// Failure description.
        message: String,
    },
}

impl DataError {
    /// Builds a [`DataError::Upstream`] with the message drawn from
    /// the per-status table.
    #[must_use]
    pub fn upstream(status: u16, operation: Operation) -> Self {
        Self::Upstream {
            status,
            message: upstream_message(status, operation),
        }
    }

    /// Builds a [`DataError::InvalidFormat`].
    #[must_use]
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Builds a [`DataError::Configuration`].
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Stable machine-readable kind, used as the `error` field of API
    /// error bodies.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidFormat { .. } => "invalid_format",
            Self::Configuration { .. } => "configuration",
            Self::Network { .. } => "network",
            Self::Upstream { .. } => "upstream",
            Self::Unknown { .. } => "unknown",
        }
    }

    /// Wire-taxonomy status code: 400 for invalid format, 0 for a
    /// transport failure with no response, the upstream status for
    /// upstream errors, 500 otherwise.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidFormat { .. } => 400,
            Self::Network { .. } => 0,
            Self::Upstream { status, .. } => *status,
            Self::Configuration { .. } | Self::Unknown { .. } => 500,
        }
    }

    /// HTTP status to serve this error with. Differs from
    /// [`Self::status_code`] only for `Network`, which has no upstream
    /// status to mirror and is served as 502.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Network { .. } => 502,
            other => other.status_code(),
        }
    }
}

/// Selects the human-readable message for an upstream HTTP status.
///
/// Unlisted statuses fall back to a generic per-operation message so
/// raw upstream text is never leaked to callers.
#[must_use]
pub fn upstream_message(status: u16, operation: Operation) -> String {
    match status {
        400 => "Bad request: the supplied identifier was rejected as malformed".to_string(),
        401 => "Credentials were rejected by the upstream service".to_string(),
        403 => "Access to the upstream service is forbidden".to_string(),
        404 => "No record was found for the supplied identifier".to_string(),
        429 => "Upstream rate limit exceeded, try again shortly".to_string(),
        500 | 503 => "The upstream service is currently unavailable".to_string(),
        _ => format!("Failed to perform {operation}"),
    }
}

/// A vehicle record from the DVLA Vehicle Enquiry Service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    /// The registration number the record was resolved from.
    pub registration_number: String,
    /// Manufacturer name.
    #[serde(default)]
    pub make: Option<String>,
    /// Body colour.
    #[serde(default)]
    pub colour: Option<String>,
    /// Fuel type (PETROL, DIESEL, ELECTRICITY, ...).
    #[serde(default)]
    pub fuel_type: Option<String>,
    /// Current tax status (Taxed, SORN, Untaxed).
    #[serde(default)]
    pub tax_status: Option<String>,
    /// Date the current tax expires (ISO 8601 date).
    #[serde(default)]
    pub tax_due_date: Option<String>,
    /// Current MOT status (Valid, Not valid, No details held).
    #[serde(default)]
    pub mot_status: Option<String>,
    /// Date the current MOT expires (ISO 8601 date).
    #[serde(default)]
    pub mot_expiry_date: Option<String>,
    /// Year of manufacture.
    #[serde(default)]
    pub year_of_manufacture: Option<u16>,
    /// Engine capacity in cubic centimetres.
    #[serde(default)]
    pub engine_capacity: Option<u32>,
    /// CO2 emissions in g/km.
    #[serde(default)]
    pub co2_emissions: Option<u32>,
    /// Whether the vehicle is marked for export.
    #[serde(default)]
    pub marked_for_export: Option<bool>,
    /// EC type approval category.
    #[serde(default)]
    pub type_approval: Option<String>,
    /// Wheelplan description.
    #[serde(default)]
    pub wheelplan: Option<String>,
    /// Month of first registration (YYYY-MM).
    #[serde(default)]
    pub month_of_first_registration: Option<String>,
    /// Date the last V5C logbook was issued.
    #[serde(default)]
    pub date_of_last_v5c_issued: Option<String>,
}

/// A driver record from the DVLA driver enquiry API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRecord {
    /// Personal details.
    pub driver: DriverDetails,
    /// Licence summary.
    #[serde(default)]
    pub licence: Option<LicenceDetails>,
    /// Category entitlements held.
    #[serde(default)]
    pub entitlements: Vec<Entitlement>,
    /// Endorsements recorded against the licence.
    #[serde(default)]
    pub endorsements: Vec<Endorsement>,
}

/// Personal details section of a driver record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDetails {
    /// First and middle names.
    #[serde(default)]
    pub first_names: Option<String>,
    /// Surname.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Date of birth (ISO 8601 date).
    #[serde(default)]
    pub date_of_birth: Option<String>,
    /// Address block, passed through as received.
    #[serde(default)]
    pub address: Option<serde_json::Value>,
}

/// Licence summary section of a driver record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenceDetails {
    /// Licence type (Full, Provisional).
    #[serde(default, rename = "type")]
    pub licence_type: Option<String>,
    /// Licence status (Valid, Revoked, Disqualified).
    #[serde(default)]
    pub status: Option<String>,
}

/// A single category entitlement on a driving licence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    /// Category code (B, C1, D, ...).
    pub category_code: String,
    /// Legal wording for the category.
    #[serde(default)]
    pub category_legal_literal: Option<String>,
    /// Date the entitlement became valid.
    #[serde(default)]
    pub from_date: Option<String>,
    /// Date the entitlement expires.
    #[serde(default)]
    pub expiry_date: Option<String>,
}

/// An endorsement recorded against a driving licence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endorsement {
    /// Offence code (SP30, IN10, ...).
    #[serde(default)]
    pub offence_code: Option<String>,
    /// Legal wording for the offence.
    #[serde(default)]
    pub offence_legal_literal: Option<String>,
    /// Date of the offence.
    #[serde(default)]
    pub offence_date: Option<String>,
    /// Penalty points attached.
    #[serde(default)]
    pub penalty_points: Option<u8>,
}

/// MOT test history for a vehicle, from the DVSA MOT history API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotHistory {
    /// Registration the history belongs to.
    pub registration: String,
    /// Manufacturer name.
    #[serde(default)]
    pub make: Option<String>,
    /// Model name.
    #[serde(default)]
    pub model: Option<String>,
    /// Tests in reverse chronological order, newest first.
    #[serde(default)]
    pub mot_tests: Vec<MotTest>,
}

/// A single MOT test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotTest {
    /// When the test was completed.
    #[serde(default)]
    pub completed_date: Option<String>,
    /// PASSED or FAILED.
    #[serde(default)]
    pub test_result: Option<String>,
    /// Expiry date for a passed test.
    #[serde(default)]
    pub expiry_date: Option<String>,
    /// Odometer reading at test time.
    #[serde(default)]
    pub odometer_value: Option<String>,
    /// Odometer unit (mi or km).
    #[serde(default)]
    pub odometer_unit: Option<String>,
    /// DVSA test number.
    #[serde(default)]
    pub mot_test_number: Option<String>,
    /// Defects and advisories raised during the test.
    #[serde(default)]
    pub defects: Vec<MotDefect>,
}

/// A defect or advisory raised during an MOT test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotDefect {
    /// Defect description.
    #[serde(default)]
    pub text: Option<String>,
    /// Defect class (ADVISORY, MINOR, MAJOR, DANGEROUS, FAIL).
    #[serde(default, rename = "type")]
    pub defect_type: Option<String>,
    /// Whether the defect was classed as dangerous.
    #[serde(default)]
    pub dangerous: Option<bool>,
}

/// A vehicle identity resolved by the CAP-style vehicle lookup.
///
/// The `cap_id` is the identifier the valuation and insurance
/// endpoints address vehicles by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapVehicle {
    /// CAP vehicle identifier.
    pub cap_id: String,
    /// Registration the identity was resolved from.
    pub registration: String,
    /// Manufacturer name.
    #[serde(default)]
    pub make: Option<String>,
    /// Model name.
    #[serde(default)]
    pub model: Option<String>,
    /// Trim / derivative description.
    #[serde(default)]
    pub derivative: Option<String>,
    /// Year the vehicle was built.
    #[serde(default)]
    pub built_year: Option<u16>,
    /// Fuel type.
    #[serde(default)]
    pub fuel_type: Option<String>,
    /// Transmission description.
    #[serde(default)]
    pub transmission: Option<String>,
}

/// A valuation from the CAP-style valuation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    /// CAP vehicle identifier the valuation is for.
    #[serde(default)]
    pub cap_id: Option<String>,
    /// Forecourt retail value in pounds.
    #[serde(default)]
    pub retail_value: Option<f64>,
    /// Trade-in value in pounds.
    #[serde(default)]
    pub trade_value: Option<f64>,
    /// Part-exchange value in pounds.
    #[serde(default)]
    pub part_exchange_value: Option<f64>,
    /// Private-sale value in pounds.
    #[serde(default)]
    pub private_value: Option<f64>,
    /// Adjustment applied for the supplied mileage, in pounds.
    #[serde(default)]
    pub mileage_adjustment: Option<f64>,
    /// Date the valuation was produced.
    #[serde(default)]
    pub valuation_date: Option<String>,
}

/// Insurance rating data from the CAP-style insurance endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceDetails {
    /// ABI insurance group (1-50).
    #[serde(default)]
    pub insurance_group: Option<u8>,
    /// Group rating suffix (E, D, A, P, U, G).
    #[serde(default)]
    pub group_rating: Option<String>,
    /// Thatcham security rating code.
    #[serde(default)]
    pub security_code: Option<String>,
    /// ABI broker code for the derivative.
    #[serde(default)]
    pub abi_code: Option<String>,
}

/// Status of a single provenance check section.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordStatus {
    /// Nothing recorded against the vehicle.
    Clear,
    /// A record exists; see the section's detail fields.
    Recorded,
}

/// Origin of the vehicle as recorded by the history check.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImportStatus {
    /// First registered in the UK.
    Uk,
    /// Imported into the UK.
    Imported,
}

/// Write-off section of a history check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOffRecord {
    /// Whether a write-off is recorded.
    pub status: RecordStatus,
    /// Insurance write-off category (A, B, S, N) when recorded.
    #[serde(default)]
    pub category: Option<String>,
}

/// Mileage section of a history check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageRecord {
    /// Whether a mileage discrepancy is recorded.
    pub status: RecordStatus,
}

/// Outstanding-finance section of a history check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceRecord {
    /// Whether outstanding finance is recorded.
    pub status: RecordStatus,
    /// Name of the finance house when recorded.
    #[serde(default)]
    pub agreement_holder: Option<String>,
}

/// Previous-keepers section of a history check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeeperRecord {
    /// Number of previous keepers on the V5C.
    pub count: u32,
}

/// Import section of a history check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    /// Where the vehicle was first registered.
    pub status: ImportStatus,
}

/// A provenance history check from the CAP-style history endpoint.
///
/// The section layout mirrors the upstream response and is the input
/// to `kerbside_risk` scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryCheck {
    /// Whether the vehicle is recorded as stolen.
    pub stolen: bool,
    /// Insurance write-off section.
    pub write_off: WriteOffRecord,
    /// Mileage discrepancy section.
    pub mileage: MileageRecord,
    /// Outstanding finance section.
    pub finance: FinanceRecord,
    /// Previous keepers section.
    pub previous_keepers: KeeperRecord,
    /// Import section.
    pub import: ImportRecord,
}

/// Best-effort aggregate report for a registration.
///
/// `vehicle` is always present; each optional section is present iff
/// its sub-lookup succeeded. Partial success is a valid terminal
/// state, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveReport {
    /// The resolved vehicle identity.
    pub vehicle: CapVehicle,
    /// Valuation, when mileage was supplied and the lookup succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation: Option<Valuation>,
    /// Insurance rating, when the lookup succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<InsuranceDetails>,
    /// Provenance history, when the lookup succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoryCheck>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_messages_match_table() {
        let op = Operation::VehicleEnquiry;
        assert!(upstream_message(400, op).contains("malformed"));
        assert!(upstream_message(401, op).contains("rejected"));
        assert!(upstream_message(403, op).contains("forbidden"));
        assert!(upstream_message(404, op).contains("No record"));
        assert!(upstream_message(429, op).contains("rate limit"));
        assert!(upstream_message(500, op).contains("unavailable"));
        assert!(upstream_message(503, op).contains("unavailable"));
    }

    #[test]
    fn unlisted_status_falls_back_to_operation_message() {
        let msg = upstream_message(418, Operation::HistoryCheck);
        assert_eq!(msg, "Failed to perform history check");
    }

    #[test]
    fn error_status_codes() {
        assert_eq!(DataError::invalid_format("bad plate").status_code(), 400);
        assert_eq!(DataError::configuration("no key").status_code(), 500);
        assert_eq!(
            DataError::Network {
                message: "timed out".to_string()
            }
            .status_code(),
            0
        );
        assert_eq!(
            DataError::upstream(429, Operation::Valuation).status_code(),
            429
        );
        assert_eq!(
            DataError::Unknown {
                message: "?".to_string()
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn network_served_as_bad_gateway() {
        let err = DataError::Network {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.http_status(), 502);
        // Every other variant serves its wire status unchanged.
        assert_eq!(DataError::invalid_format("x").http_status(), 400);
        assert_eq!(
            DataError::upstream(404, Operation::CapVehicle).http_status(),
            404
        );
    }

    #[test]
    fn error_kinds_are_stable() {
        assert_eq!(DataError::invalid_format("x").kind(), "invalid_format");
        assert_eq!(DataError::configuration("x").kind(), "configuration");
        assert_eq!(
            DataError::upstream(500, Operation::Insurance).kind(),
            "upstream"
        );
    }

    #[test]
    fn history_check_deserializes_camel_case() {
        let body = serde_json::json!({
            "stolen": true,
            "writeOff": { "status": "clear" },
            "mileage": { "status": "clear" },
            "finance": { "status": "clear" },
            "previousKeepers": { "count": 1 },
            "import": { "status": "uk" }
        });
        let check: HistoryCheck = serde_json::from_value(body).unwrap();
        assert!(check.stolen);
        assert_eq!(check.write_off.status, RecordStatus::Clear);
        assert_eq!(check.previous_keepers.count, 1);
        assert_eq!(check.import.status, ImportStatus::Uk);
    }

    #[test]
    fn report_omits_failed_sections() {
        let report = ComprehensiveReport {
            vehicle: CapVehicle {
                cap_id: "CAP123".to_string(),
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
            history: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("valuation").is_none());
        assert!(json.get("insurance").is_none());
        assert!(json.get("history").is_none());
        assert_eq!(json["vehicle"]["capId"], "CAP123");
    }

    #[test]
    fn operation_display_names() {
        assert_eq!(Operation::MotHistory.to_string(), "MOT history lookup");
        assert_eq!(Operation::VehicleEnquiry.to_string(), "vehicle enquiry");
    }
}
