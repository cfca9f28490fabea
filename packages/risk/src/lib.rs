#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Rule-based risk scoring over a vehicle provenance history check.
//!
//! The rule weights, evaluation order and level thresholds are a
//! reproducible contract consumed by the marketplace front-end and the
//! report endpoint; changing any of them changes what renters see, so
//! they are pinned by the tests below.

use kerbside_vehicle_data_models::{HistoryCheck, ImportStatus, RecordStatus};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Overall risk band for a vehicle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    /// Score below 3.
    Low,
    /// Score 3 to 7.
    Medium,
    /// Score 8 or above.
    High,
}

impl RiskLevel {
    /// Maps an accumulated score onto a band.
    #[must_use]
    pub const fn from_score(score: u32) -> Self {
        match score {
            0..=2 => Self::Low,
            3..=7 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// The outcome of scoring a history check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Accumulated rule score.
    pub score: u32,
    /// Band the score falls in.
    pub level: RiskLevel,
    /// Human-readable alerts, in rule evaluation order.
    pub alerts: Vec<String>,
}

/// Keeper counts above this add to the score.
const KEEPER_THRESHOLD: u32 = 5;

/// Scores a history check against the fixed rule set.
///
/// Rules are evaluated in a fixed order (stolen, write-off, mileage,
/// finance, keepers, import) and each firing rule appends one alert,
/// so `alerts` is ordered deterministically for identical input.
#[must_use]
pub fn assess(check: &HistoryCheck) -> RiskAssessment {
    let mut score = 0;
    let mut alerts = Vec::new();

    if check.stolen {
        score += 10;
        alerts.push("Vehicle reported as stolen".to_string());
    }

    if check.write_off.status == RecordStatus::Recorded {
        let category = check.write_off.category.as_deref();
        if matches!(category, Some("A" | "B")) {
            score += 8;
        } else {
            score += 5;
        }
        match category {
            Some(cat) => alerts.push(format!("Recorded as an insurance write-off (category {cat})")),
            None => alerts.push("Recorded as an insurance write-off".to_string()),
        }
    }

    if check.mileage.status == RecordStatus::Recorded {
        score += 3;
        alerts.push("Mileage discrepancy recorded".to_string());
    }

    if check.finance.status == RecordStatus::Recorded {
        score += 6;
        alerts.push("Outstanding finance recorded".to_string());
    }

    if check.previous_keepers.count > KEEPER_THRESHOLD {
        score += 2;
        alerts.push(format!(
            "High number of previous keepers ({})",
            check.previous_keepers.count
        ));
    }

    if check.import.status == ImportStatus::Imported {
        score += 1;
        alerts.push("Imported vehicle".to_string());
    }

    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        alerts,
    }
}
