//! CAP HPI-style vehicle data API client.
//!
//! One bearer token covers four endpoints under a common base URL:
//! vehicle identity resolution by registration, valuation and
//! insurance data by CAP identifier, and the provenance history check
//! by registration. The history check is the heavy one (it consults
//! the stolen, write-off, finance and mileage registers) and gets the
//! longer timeout from the service registry.

use std::time::Duration;

use kerbside_vehicle_data_models::{
    CapVehicle, DataError, HistoryCheck, InsuranceDetails, Operation, Valuation,
};

use crate::classify;

/// Resolves the CAP vehicle identity for a registration.
///
/// # Errors
///
/// Returns a classified [`DataError`] on any transport, HTTP or parse
/// failure.
pub async fn vehicle_lookup(
    client: &reqwest::Client,
    base_url: &str,
    bearer_token: &str,
    registration: &str,
    timeout: Duration,
) -> Result<CapVehicle, DataError> {
    let outcome = client
        .get(format!("{base_url}/vehicles/{registration}"))
        .bearer_auth(bearer_token)
        .timeout(timeout)
        .send()
        .await;

    classify::read_json(outcome, Operation::CapVehicle).await
}

/// Requests a valuation for a CAP identifier at the given mileage.
///
/// `condition` is an optional dealer-grade condition band (e.g.
/// `"good"`); the upstream applies its default when omitted.
///
/// # Errors
///
/// Returns a classified [`DataError`] on any transport, HTTP or parse
/// failure.
pub async fn valuation(
    client: &reqwest::Client,
    base_url: &str,
    bearer_token: &str,
    cap_id: &str,
    mileage: u32,
    condition: Option<&str>,
    timeout: Duration,
) -> Result<Valuation, DataError> {
    let mut body = serde_json::json!({
        "capId": cap_id,
        "mileage": mileage,
    });
    if let Some(cond) = condition {
        body["condition"] = serde_json::Value::String(cond.to_string());
    }

    let outcome = client
        .post(format!("{base_url}/valuations"))
        .bearer_auth(bearer_token)
        .json(&body)
        .timeout(timeout)
        .send()
        .await;

    classify::read_json(outcome, Operation::Valuation).await
}

/// Fetches insurance rating data for a CAP identifier.
///
/// # Errors
///
/// Returns a classified [`DataError`] on any transport, HTTP or parse
/// failure.
pub async fn insurance(
    client: &reqwest::Client,
    base_url: &str,
    bearer_token: &str,
    cap_id: &str,
    timeout: Duration,
) -> Result<InsuranceDetails, DataError> {
    let outcome = client
        .get(format!("{base_url}/insurance/{cap_id}"))
        .bearer_auth(bearer_token)
        .timeout(timeout)
        .send()
        .await;

    classify::read_json(outcome, Operation::Insurance).await
}

/// Runs the provenance history check for a registration.
///
/// # Errors
///
/// Returns a classified [`DataError`] on any transport, HTTP or parse
/// failure.
pub async fn history_check(
    client: &reqwest::Client,
    base_url: &str,
    bearer_token: &str,
    registration: &str,
    timeout: Duration,
) -> Result<HistoryCheck, DataError> {
    let outcome = client
        .get(format!("{base_url}/history/{registration}"))
        .bearer_auth(bearer_token)
        .timeout(timeout)
        .send()
        .await;

    classify::read_json(outcome, Operation::HistoryCheck).await
}
