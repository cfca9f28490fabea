//! Compile-time registry of upstream service endpoint configurations.
//!
//! Each upstream API is described by a TOML file under `services/`.
//! The registry embeds these at compile time; base URLs can be
//! overridden per service through the environment variable named in
//! the TOML (used by deployments pointing at sandbox endpoints, and by
//! the integration tests pointing at a mock server). Credential
//! material never lives here; see [`crate::GatewayConfig`].

use serde::Deserialize;

/// An upstream service endpoint configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamService {
    /// Unique identifier (e.g., `"dvla_ves"`, `"cap_hpi"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Default API base URL.
    pub base_url: String,
    /// Environment variable that overrides `base_url` when set.
    pub env_override: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Timeout for the service's heavier operations, when it has any
    /// (the CAP history check walks several provenance registers).
    #[serde(default)]
    pub history_timeout_secs: Option<u64>,
}

impl UpstreamService {
    /// Returns the base URL, honouring the environment override.
    #[must_use]
    pub fn resolved_base_url(&self) -> String {
        std::env::var(&self.env_override).unwrap_or_else(|_| self.base_url.clone())
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SERVICE_TOMLS: &[(&str, &str)] = &[
    ("dvla_ves", include_str!("../services/dvla_ves.toml")),
    ("dvla_driver", include_str!("../services/dvla_driver.toml")),
    ("dvsa_mot", include_str!("../services/dvsa_mot.toml")),
    ("cap_hpi", include_str!("../services/cap_hpi.toml")),
];

#[cfg(test)]
const EXPECTED_SERVICE_COUNT: usize = 4;

/// Returns all upstream service configurations.
///
/// # Panics
///
/// Panics if any embedded TOML config is malformed (this is a
/// compile-time guarantee since the configs are embedded).
#[must_use]
pub fn all_services() -> Vec<UpstreamService> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse upstream service '{name}': {e}"))
        })
        .collect()
}

/// Returns the configuration for a single service by id.
///
/// # Panics
///
/// Panics if the id is not in the embedded registry; callers pass
/// literal ids, so a miss is a programming error.
#[must_use]
pub fn service(id: &str) -> UpstreamService {
    all_services()
        .into_iter()
        .find(|svc| svc.id == id)
        .unwrap_or_else(|| panic!("Unknown upstream service '{id}'"))
}
