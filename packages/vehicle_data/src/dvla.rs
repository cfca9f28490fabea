//! DVLA API clients: Vehicle Enquiry Service and driver enquiry.
//!
//! VES authenticates with a static API key header; the driver enquiry
//! endpoint takes a bearer token. Both are single POST calls with a
//! JSON body.
//!
//! See <https://developer-portal.driver-vehicle-licensing.api.gov.uk/>

use std::time::Duration;

use kerbside_vehicle_data_models::{DataError, DriverRecord, Operation, VehicleRecord};

use crate::classify;

/// Looks up a vehicle by registration via the Vehicle Enquiry Service.
///
/// # Errors
///
/// Returns a classified [`DataError`] on any transport, HTTP or parse
/// failure.
pub async fn vehicle_enquiry(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    registration: &str,
    timeout: Duration,
) -> Result<VehicleRecord, DataError> {
    let outcome = client
        .post(format!("{base_url}/vehicles"))
        .header("x-api-key", api_key)
        .json(&serde_json::json!({ "registrationNumber": registration }))
        .timeout(timeout)
        .send()
        .await;

    classify::read_json(outcome, Operation::VehicleEnquiry).await
}

/// Looks up a driver record by driving licence number.
///
/// CPC and tachograph data belong to commercial operator licensing and
/// are never requested. Partial responses are declined: the record
/// either arrives whole or the enquiry fails, so a caller never acts
/// on a silently truncated licence record.
///
/// # Errors
///
/// Returns a classified [`DataError`] on any transport, HTTP or parse
/// failure.
pub async fn driver_enquiry(
    client: &reqwest::Client,
    base_url: &str,
    bearer_token: &str,
    licence_number: &str,
    timeout: Duration,
) -> Result<DriverRecord, DataError> {
    let outcome = client
        .post(format!("{base_url}/driver-enquiry"))
        .bearer_auth(bearer_token)
        .json(&serde_json::json!({
            "drivingLicenceNumber": licence_number,
            "includeCPC": false,
            "includeTacho": false,
            "acceptPartialResponse": "false",
        }))
        .timeout(timeout)
        .send()
        .await;

    classify::read_json(outcome, Operation::DriverEnquiry).await
}
