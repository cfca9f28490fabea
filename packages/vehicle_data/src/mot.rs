//! DVSA MOT history API client.
//!
//! The trade endpoint requires both an OAuth2 bearer token (obtained
//! through `kerbside_auth`) and a static API key header on every
//! request. The caller supplies the already-acquired token so this
//! module stays a single outbound call.
//!
//! See <https://documentation.history.mot.api.gov.uk/>

use std::time::Duration;

use kerbside_vehicle_data_models::{DataError, MotHistory, Operation};

use crate::classify;

/// Fetches the MOT test history for a registration.
///
/// # Errors
///
/// Returns a classified [`DataError`] on any transport, HTTP or parse
/// failure.
pub async fn history(
    client: &reqwest::Client,
    base_url: &str,
    bearer_token: &str,
    api_key: &str,
    registration: &str,
    timeout: Duration,
) -> Result<MotHistory, DataError> {
    let outcome = client
        .get(format!("{base_url}/{registration}"))
        .bearer_auth(bearer_token)
        .header("x-api-key", api_key)
        .timeout(timeout)
        .send()
        .await;

    classify::read_json(outcome, Operation::MotHistory).await
}
