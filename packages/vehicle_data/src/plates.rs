//! Registration and driving-licence number validation and formatting.
//!
//! Identifiers arrive from forms and query strings in every casing and
//! spacing imaginable, so everything is normalized (whitespace
//! stripped, uppercased) before shape checks. A registration must
//! match one of the five UK plate formats issued since 1903:
//!
//! - Current: `AB12CDE` (2001 onwards)
//! - Prefix: `A123BCD` (1983-2001)
//! - Suffix: `ABC123D` (1963-1983)
//! - Dateless: `ABC1234` (pre-1963)
//! - Reversed dateless: `1234ABC`
//!
//! Validation happens before any network call; a shape miss is a
//! [`DataError::InvalidFormat`] with zero side effects.

use std::sync::LazyLock;

use kerbside_vehicle_data_models::DataError;
use regex::Regex;

/// Current format: two letters, two digits, three letters.
static CURRENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z]{3}$").expect("valid regex"));

/// Prefix format: one letter, 1-3 digits, three letters.
static PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][0-9]{1,3}[A-Z]{3}$").expect("valid regex"));

/// Suffix format: three letters, 1-3 digits, one letter.
static SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}[0-9]{1,3}[A-Z]$").expect("valid regex"));

/// Dateless format: 1-3 letters then 1-4 digits.
static DATELESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{1,3}[0-9]{1,4}$").expect("valid regex"));

/// Reversed dateless format: 1-4 digits then 1-3 letters.
static REVERSED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,4}[A-Z]{1,3}$").expect("valid regex"));

/// Driving licence number: 5 letters, 6 digits, 2 letters, 2 digits.
static LICENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{6}[A-Z]{2}[0-9]{2}$").expect("valid regex"));

/// Strips all whitespace and uppercases an identifier.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Whether a normalized registration matches any recognized UK plate
/// shape.
#[must_use]
pub fn is_valid_registration(normalized: &str) -> bool {
    CURRENT_RE.is_match(normalized)
        || PREFIX_RE.is_match(normalized)
        || SUFFIX_RE.is_match(normalized)
        || DATELESS_RE.is_match(normalized)
        || REVERSED_RE.is_match(normalized)
}

/// Normalizes and validates a registration number.
///
/// # Errors
///
/// Returns [`DataError::InvalidFormat`] when the cleaned value matches
/// none of the five recognized plate shapes.
pub fn validate_registration(raw: &str) -> Result<String, DataError> {
    let cleaned = normalize(raw);
    if is_valid_registration(&cleaned) {
        Ok(cleaned)
    } else {
        Err(DataError::invalid_format(format!(
            "'{raw}' is not a recognized UK registration number"
        )))
    }
}

/// Normalizes and validates a driving licence number.
///
/// # Errors
///
/// Returns [`DataError::InvalidFormat`] when the cleaned value does
/// not match the DVLA licence number shape.
pub fn validate_licence(raw: &str) -> Result<String, DataError> {
    let cleaned = normalize(raw);
    if LICENCE_RE.is_match(&cleaned) {
        Ok(cleaned)
    } else {
        Err(DataError::invalid_format(format!(
            "'{raw}' is not a valid driving licence number"
        )))
    }
}

/// Pretty-prints a registration with the conventional space.
///
/// Only the current format (`AB12 CDE`) and the prefix format
/// (`A123 BCD`) can be split unambiguously; anything else is returned
/// as the cleaned string unchanged.
#[must_use]
pub fn format_registration(raw: &str) -> String {
    let cleaned = normalize(raw);
    if CURRENT_RE.is_match(&cleaned) {
        format!("{} {}", &cleaned[..4], &cleaned[4..])
    } else if PREFIX_RE.is_match(&cleaned) {
        let split = cleaned.len() - 3;
        format!("{} {}", &cleaned[..split], &cleaned[split..])
    } else {
        cleaned
    }
}
