//! Outcome classification for outbound calls.
//!
//! Every gateway operation funnels its `reqwest` outcome through
//! [`read_json`], so the transport/HTTP/parse failure taxonomy is
//! decided in exactly one place.

use kerbside_vehicle_data_models::{DataError, Operation};
use serde::de::DeserializeOwned;

/// Classifies a completed call and parses a 2xx body as `T`.
///
/// - transport failure with no response: `Network` (timeout, refused
///   connection) or `Unknown` for anything stranger;
/// - non-2xx status: `Upstream` with the per-status table message;
/// - 2xx with an unparseable body: `Unknown`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    outcome: Result<reqwest::Response, reqwest::Error>,
    operation: Operation,
) -> Result<T, DataError> {
    let resp = outcome.map_err(|e| transport_error(&e, operation))?;

    let status = resp.status();
    if !status.is_success() {
        log::warn!("{operation} answered {status}");
        return Err(DataError::upstream(status.as_u16(), operation));
    }

    resp.json::<T>().await.map_err(|e| DataError::Unknown {
        message: format!("Malformed {operation} response: {e}"),
    })
}

/// Maps a transport-level failure onto the taxonomy.
fn transport_error(err: &reqwest::Error, operation: Operation) -> DataError {
    if err.is_timeout() || err.is_connect() {
        log::warn!("{operation} transport failure: {err}");
        DataError::Network {
            message: format!("Could not reach the {operation} service: {err}"),
        }
    } else {
        DataError::Unknown {
            message: format!("{operation} failed: {err}"),
        }
    }
}
