#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! OAuth2 client-credentials token cache.
//!
//! The DVSA MOT history API authenticates with a bearer token obtained
//! via the client-credentials grant. Tokens are valid for about an
//! hour, so the cache holds the most recent token and only performs a
//! new exchange once it is within 60 seconds of expiry.
//!
//! The cache slot is a process-wide resource with last-writer-wins
//! replacement semantics. Concurrent refreshes of an expired token may
//! each perform their own grant call; the slot is replaced wholesale
//! under a write lock, so the losers simply overwrite with an equally
//! fresh token. No single-flight deduplication is attempted.

use std::sync::RwLock;
use std::time::Duration;

use kerbside_vehicle_data_models::{DataError, Operation};
use serde::Deserialize;

/// Tokens are treated as expired this long before their true expiry,
/// so an in-flight request never carries a token that lapses mid-call.
const SAFETY_MARGIN_MS: i64 = 60_000;

/// Timeout for the token-exchange call itself.
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Client-credentials configuration for the token endpoint.
#[derive(Debug, Clone, Default)]
pub struct OAuthConfig {
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Scope URL to request.
    pub scope: String,
    /// Token endpoint URL.
    pub token_url: String,
}

impl OAuthConfig {
    /// Reads the configuration from the `MOT_*` environment variables.
    ///
    /// Missing variables become empty fields; validation is deferred
    /// to the first [`TokenCache::token`] call so that a misconfigured
    /// process starts up and reports the problem per request instead
    /// of crashing.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            client_id: std::env::var("MOT_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("MOT_CLIENT_SECRET").unwrap_or_default(),
            scope: std::env::var("MOT_SCOPE_URL").unwrap_or_default(),
            token_url: std::env::var("MOT_TOKEN_URL").unwrap_or_default(),
        }
    }

    /// Checks that every credential field is present.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Configuration`] naming the first missing
    /// field.
    pub fn validate(&self) -> Result<(), DataError> {
        let missing = [
            ("MOT_CLIENT_ID", &self.client_id),
            ("MOT_CLIENT_SECRET", &self.client_secret),
            ("MOT_SCOPE_URL", &self.scope),
            ("MOT_TOKEN_URL", &self.token_url),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        match missing {
            Some((name, _)) => Err(DataError::configuration(format!(
                "MOT history credentials are not configured: {name} is unset"
            ))),
            None => Ok(()),
        }
    }
}

/// A cached bearer token with its adjusted expiry instant.
///
/// Never mutated in place; the cache slot replaces the whole value on
/// each successful exchange.
#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at_ms: i64,
}

impl CachedToken {
    /// Builds a token from a grant response received at `now_ms`.
    ///
    /// The expiry is `expires_in` seconds ahead minus the flat safety
    /// margin. The arithmetic is signed: a token with
    /// `expires_in <= 60` is born expired and every subsequent call
    /// performs a fresh exchange.
    fn from_grant(now_ms: i64, value: String, expires_in: i64) -> Self {
        Self {
            value,
            expires_at_ms: now_ms + expires_in * 1000 - SAFETY_MARGIN_MS,
        }
    }

    /// A token is usable iff `now` is strictly before its adjusted
    /// expiry.
    const fn is_valid_at(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at_ms
    }
}

/// Token endpoint response body.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: i64,
}

/// Caching source of bearer tokens for OAuth-protected operations.
///
/// One instance per gateway; pass it explicitly to whatever needs a
/// token rather than hiding it behind a module-level singleton.
pub struct TokenCache {
    config: OAuthConfig,
    client: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    /// Creates a cache with an empty slot.
    #[must_use]
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            cached: RwLock::new(None),
        }
    }

    /// Returns a valid bearer token, performing a client-credentials
    /// exchange only when the cached token is missing or within the
    /// safety margin of expiry.
    ///
    /// On exchange failure the existing slot is left untouched and the
    /// classified error is returned; the caller decides whether to
    /// retry the outer operation.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Configuration`] if any credential field is
    /// unset (checked before any network I/O), [`DataError::Upstream`]
    /// for a non-2xx token endpoint response, [`DataError::Network`]
    /// for a transport failure and [`DataError::Unknown`] for an
    /// unparseable grant response.
    pub async fn token(&self) -> Result<String, DataError> {
        self.config.validate()?;

        let now_ms = chrono::Utc::now().timestamp_millis();
        {
            let slot = self.cached.read().expect("token cache lock poisoned");
            if let Some(cached) = slot.as_ref() {
                if cached.is_valid_at(now_ms) {
                    return Ok(cached.value.clone());
                }
            }
        }

        log::debug!("Token cache miss, performing client-credentials exchange");
        let fresh = self.exchange(now_ms).await?;
        let value = fresh.value.clone();

        let mut slot = self.cached.write().expect("token cache lock poisoned");
        *slot = Some(fresh);

        Ok(value)
    }

    /// Performs the client-credentials grant.
    async fn exchange(&self, now_ms: i64) -> Result<CachedToken, DataError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", self.config.scope.as_str()),
        ];

        let resp = self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .timeout(EXCHANGE_TIMEOUT)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("Token exchange failed with status {status}");
            return Err(DataError::upstream(
                status.as_u16(),
                Operation::TokenExchange,
            ));
        }

        let body: TokenResponse = resp.json().await.map_err(|e| DataError::Unknown {
            message: format!("Malformed token endpoint response: {e}"),
        })?;

        Ok(CachedToken::from_grant(
            now_ms,
            body.access_token,
            body.expires_in,
        ))
    }
}

/// Maps a transport-level reqwest failure onto the taxonomy.
fn classify_transport(err: reqwest::Error) -> DataError {
    if err.is_timeout() || err.is_connect() {
        DataError::Network {
            message: format!("Token endpoint unreachable: {err}"),
        }
    } else {
        DataError::Unknown {
            message: format!("Token exchange failed: {err}"),
        }
    }
}
