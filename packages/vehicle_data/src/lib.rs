#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Typed gateway over the third-party vehicle and driver data APIs.
//!
//! Every operation follows the same discipline: validate the
//! identifier shape locally, check the credential material, issue one
//! outbound HTTP call with an explicit timeout, and classify the
//! outcome onto the closed [`DataError`] taxonomy. Format and
//! configuration failures are detected before any network I/O and
//! carry zero side effects.
//!
//! Upstreams:
//!
//! 1. **DVLA Vehicle Enquiry Service** — vehicle tax/MOT status by
//!    registration, static API key.
//! 2. **DVLA driver enquiry** — licence record by licence number,
//!    static bearer token.
//! 3. **DVSA MOT history** — test history by registration, OAuth2
//!    bearer (via [`kerbside_auth::TokenCache`]) plus API key.
//! 4. **CAP HPI-style data** — vehicle identity, valuation, insurance
//!    and provenance history under one bearer token.
//!
//! Endpoint defaults live in the embedded [`registry`]; credentials
//! come from the environment and missing ones surface as
//! [`DataError::Configuration`] per call, never a crash.

pub mod cap_hpi;
mod classify;
pub mod dvla;
pub mod mot;
pub mod plates;
pub mod registry;
pub mod report;

use std::time::Duration;

use kerbside_auth::{OAuthConfig, TokenCache};
use kerbside_vehicle_data_models::{
    CapVehicle, ComprehensiveReport, DataError, DriverRecord, HistoryCheck, InsuranceDetails,
    MotHistory, Valuation, VehicleRecord,
};

use crate::registry::UpstreamService;

/// Endpoint and credential configuration for the gateway.
///
/// Endpoints default to the embedded service registry; credentials are
/// optional at construction and checked per operation so one missing
/// key only disables the operations that need it.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// DVLA Vehicle Enquiry Service endpoint.
    pub ves: UpstreamService,
    /// DVLA driver enquiry endpoint.
    pub driver: UpstreamService,
    /// DVSA MOT history endpoint.
    pub mot: UpstreamService,
    /// CAP HPI-style data endpoint.
    pub cap: UpstreamService,
    /// API key for the Vehicle Enquiry Service.
    pub dvla_api_key: Option<String>,
    /// Bearer token for the driver enquiry endpoint.
    pub driver_api_token: Option<String>,
    /// API key sent alongside the OAuth bearer on MOT history calls.
    pub mot_api_key: Option<String>,
    /// Bearer token for the CAP endpoints.
    pub cap_api_token: Option<String>,
}

impl GatewayConfig {
    /// Builds the configuration from the embedded registry and the
    /// process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            ves: resolved("dvla_ves"),
            driver: resolved("dvla_driver"),
            mot: resolved("dvsa_mot"),
            cap: resolved("cap_hpi"),
            dvla_api_key: non_empty_env("DVLA_API_KEY"),
            driver_api_token: non_empty_env("DVLA_DRIVER_API_TOKEN"),
            mot_api_key: non_empty_env("MOT_API_KEY"),
            cap_api_token: non_empty_env("CAP_HPI_API_TOKEN"),
        }
    }

    fn require<'a>(credential: &'a Option<String>, name: &str) -> Result<&'a str, DataError> {
        credential.as_deref().ok_or_else(|| {
            DataError::configuration(format!("{name} is not configured"))
        })
    }
}

/// Loads a registry service with its environment base-URL override
/// applied.
fn resolved(id: &str) -> UpstreamService {
    let mut svc = registry::service(id);
    svc.base_url = svc.resolved_base_url();
    svc
}

/// Reads an environment variable, treating blank values as unset.
fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Single entry point for all vehicle/driver data lookups.
///
/// Holds the shared HTTP client and the token cache; construct one per
/// process and share it behind an `Arc`.
pub struct VehicleDataGateway {
    client: reqwest::Client,
    config: GatewayConfig,
    tokens: TokenCache,
}

impl VehicleDataGateway {
    /// Creates a gateway with an explicit configuration and token
    /// cache. The token cache is passed in rather than built
    /// internally so OAuth state stays visible to the caller.
    #[must_use]
    pub fn new(config: GatewayConfig, tokens: TokenCache) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            tokens,
        }
    }

    /// Convenience constructor wiring both the gateway and the token
    /// cache from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GatewayConfig::from_env(), TokenCache::new(OAuthConfig::from_env()))
    }

    /// Looks up tax/MOT status and attributes for a registration via
    /// the DVLA Vehicle Enquiry Service.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` for an unrecognized plate shape,
    /// `Configuration` when `DVLA_API_KEY` is unset (both before any
    /// network call), otherwise the classified call outcome.
    pub async fn vehicle_enquiry(&self, registration: &str) -> Result<VehicleRecord, DataError> {
        let reg = plates::validate_registration(registration)?;
        let api_key = GatewayConfig::require(&self.config.dvla_api_key, "DVLA_API_KEY")?;
        dvla::vehicle_enquiry(
            &self.client,
            &self.config.ves.base_url,
            api_key,
            &reg,
            timeout(&self.config.ves),
        )
        .await
    }

    /// Looks up a driver record by driving licence number.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` for a malformed licence number,
    /// `Configuration` when `DVLA_DRIVER_API_TOKEN` is unset,
    /// otherwise the classified call outcome.
    pub async fn driver_enquiry(&self, licence_number: &str) -> Result<DriverRecord, DataError> {
        let licence = plates::validate_licence(licence_number)?;
        let token =
            GatewayConfig::require(&self.config.driver_api_token, "DVLA_DRIVER_API_TOKEN")?;
        dvla::driver_enquiry(
            &self.client,
            &self.config.driver.base_url,
            token,
            &licence,
            timeout(&self.config.driver),
        )
        .await
    }

    /// Fetches MOT test history for a registration.
    ///
    /// Acquires an OAuth bearer from the token cache first; the
    /// exchange only happens on a cache miss.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` / `Configuration` before any network call,
    /// token-exchange failures as classified by `kerbside_auth`,
    /// otherwise the classified call outcome.
    pub async fn mot_history(&self, registration: &str) -> Result<MotHistory, DataError> {
        let reg = plates::validate_registration(registration)?;
        let api_key = GatewayConfig::require(&self.config.mot_api_key, "MOT_API_KEY")?;
        let bearer = self.tokens.token().await?;
        mot::history(
            &self.client,
            &self.config.mot.base_url,
            &bearer,
            api_key,
            &reg,
            timeout(&self.config.mot),
        )
        .await
    }

    /// Resolves the CAP vehicle identity for a registration.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` / `Configuration` before any network call,
    /// otherwise the classified call outcome.
    pub async fn cap_vehicle(&self, registration: &str) -> Result<CapVehicle, DataError> {
        let reg = plates::validate_registration(registration)?;
        let token = self.cap_token()?;
        cap_hpi::vehicle_lookup(
            &self.client,
            &self.config.cap.base_url,
            token,
            &reg,
            timeout(&self.config.cap),
        )
        .await
    }

    /// Requests a valuation for a CAP identifier at the given mileage.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` for an empty identifier, `Configuration` when
    /// the CAP token is unset, otherwise the classified call outcome.
    pub async fn valuation(
        &self,
        cap_id: &str,
        mileage: u32,
        condition: Option<&str>,
    ) -> Result<Valuation, DataError> {
        if cap_id.trim().is_empty() {
            return Err(DataError::invalid_format("CAP vehicle id must not be empty"));
        }
        let token = self.cap_token()?;
        cap_hpi::valuation(
            &self.client,
            &self.config.cap.base_url,
            token,
            cap_id,
            mileage,
            condition,
            timeout(&self.config.cap),
        )
        .await
    }

    /// Fetches insurance rating data for a CAP identifier.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` for an empty identifier, `Configuration` when
    /// the CAP token is unset, otherwise the classified call outcome.
    pub async fn insurance(&self, cap_id: &str) -> Result<InsuranceDetails, DataError> {
        if cap_id.trim().is_empty() {
            return Err(DataError::invalid_format("CAP vehicle id must not be empty"));
        }
        let token = self.cap_token()?;
        cap_hpi::insurance(
            &self.client,
            &self.config.cap.base_url,
            token,
            cap_id,
            timeout(&self.config.cap),
        )
        .await
    }

    /// Runs the provenance history check for a registration. Uses the
    /// longer history timeout from the service registry.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` / `Configuration` before any network call,
    /// otherwise the classified call outcome.
    pub async fn history_check(&self, registration: &str) -> Result<HistoryCheck, DataError> {
        let reg = plates::validate_registration(registration)?;
        let token = self.cap_token()?;
        cap_hpi::history_check(
            &self.client,
            &self.config.cap.base_url,
            token,
            &reg,
            history_timeout(&self.config.cap),
        )
        .await
    }

    /// Produces a best-effort aggregate report for a registration; see
    /// [`report`].
    ///
    /// # Errors
    ///
    /// Fails only when the initial vehicle resolution fails; failed
    /// optional sections are omitted from an `Ok` report.
    pub async fn comprehensive_report(
        &self,
        registration: &str,
        mileage: Option<u32>,
        condition: Option<&str>,
    ) -> Result<ComprehensiveReport, DataError> {
        report::comprehensive(self, registration, mileage, condition).await
    }

    fn cap_token(&self) -> Result<&str, DataError> {
        GatewayConfig::require(&self.config.cap_api_token, "CAP_HPI_API_TOKEN")
    }
}

/// Standard per-request timeout for a service.
fn timeout(svc: &UpstreamService) -> Duration {
    Duration::from_secs(svc.timeout_secs)
}

/// Timeout for a service's heavy operations; falls back to the
/// standard one.
fn history_timeout(svc: &UpstreamService) -> Duration {
    Duration::from_secs(svc.history_timeout_secs.unwrap_or(svc.timeout_secs))
}
