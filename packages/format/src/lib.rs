#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Display formatting helpers for Kerbside surfaces.
//!
//! Pure string transforms with no side effects: GBP currency values
//! for valuations and UK-style long dates for tax/MOT expiry output.
//! Unparseable input is returned unchanged rather than erroring, since
//! these feed display layers that prefer raw data over a blank field.

use chrono::NaiveDate;

/// Formats a value in pounds as a grouped GBP amount, e.g. `£12,500`.
///
/// The value is rounded to the nearest whole pound; valuation feeds do
/// not carry meaningful pence.
#[must_use]
pub fn format_currency_gbp(pounds: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let whole = pounds.round() as i64;
    let negative = whole < 0;
    let digits = whole.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-£{grouped}")
    } else {
        format!("£{grouped}")
    }
}

/// Formats an ISO `YYYY-MM-DD` date (or the date prefix of a longer
/// timestamp) as a UK long date, e.g. `1 May 2023`.
///
/// Returns the input unchanged when it does not start with a parseable
/// date.
#[must_use]
pub fn format_date_uk(iso: &str) -> String {
    let prefix = iso.get(..10).unwrap_or(iso);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").map_or_else(
        |_| iso.to_string(),
        |date| date.format("%-d %B %Y").to_string(),
    )
}
