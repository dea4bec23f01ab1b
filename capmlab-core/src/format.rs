//! Display precision policy for expected returns.
//!
//! Three policies exist and they are not interchangeable; the same value
//! renders differently under each:
//!
//! | value | `Fixed2` | `Rounded9`      | `Trimmed9` |
//! |-------|----------|-----------------|------------|
//! | 7.4   | `7.40`   | `7.400000000`   | `7.4`      |
//! | 8.0   | `8.00`   | `8.000000000`   | `8`        |
//!
//! `Fixed2` is the default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CapmError;

/// How an expected return (in percent units) is turned into a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatPolicy {
    /// Two decimal places.
    #[default]
    Fixed2,
    /// Round to 9 decimal digits, then show all 9.
    Rounded9,
    /// Nine decimal places with trailing zeros and a trailing point removed.
    Trimmed9,
}

impl FormatPolicy {
    pub const ALL: [FormatPolicy; 3] = [
        FormatPolicy::Fixed2,
        FormatPolicy::Rounded9,
        FormatPolicy::Trimmed9,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormatPolicy::Fixed2 => "fixed2",
            FormatPolicy::Rounded9 => "rounded9",
            FormatPolicy::Trimmed9 => "trimmed9",
        }
    }

    /// Cycle to the next policy (TUI toggle).
    pub fn next(self) -> FormatPolicy {
        match self {
            FormatPolicy::Fixed2 => FormatPolicy::Rounded9,
            FormatPolicy::Rounded9 => FormatPolicy::Trimmed9,
            FormatPolicy::Trimmed9 => FormatPolicy::Fixed2,
        }
    }

    /// Format a number under this policy.
    pub fn format(self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let s = match self {
            FormatPolicy::Fixed2 => format!("{value:.2}"),
            FormatPolicy::Rounded9 => format!("{:.9}", round_to(value, 9)),
            FormatPolicy::Trimmed9 => trim_fraction(format!("{value:.9}")),
        };
        strip_negative_zero(s)
    }

    /// Format with a trailing `%`.
    pub fn format_percent(self, value_pct: f64) -> String {
        format!("{}%", self.format(value_pct))
    }
}

impl fmt::Display for FormatPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FormatPolicy {
    type Err = CapmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed2" | "2dp" => Ok(FormatPolicy::Fixed2),
            "rounded9" => Ok(FormatPolicy::Rounded9),
            "trimmed9" | "trim" => Ok(FormatPolicy::Trimmed9),
            _ => Err(CapmError::Parse {
                field: "format policy",
                input: s.to_string(),
            }),
        }
    }
}

fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

fn trim_fraction(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

// "-0.00" and friends come out of rounding tiny negatives.
fn strip_negative_zero(s: String) -> String {
    match s.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => s,
    }
}
