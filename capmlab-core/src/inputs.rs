//! CAPM inputs and the collection-layer validation policy.

use serde::{Deserialize, Serialize};

use crate::error::{CapmError, Result};

/// The three scalars a CAPM evaluation needs.
///
/// Rates are fractions (0.02 = 2%). Front-ends collect percentages and go
/// through [`CapmInputs::from_percent`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapmInputs {
    pub risk_free_rate: f64,
    pub beta: f64,
    pub market_return: f64,
}

impl CapmInputs {
    pub fn new(risk_free_rate: f64, beta: f64, market_return: f64) -> Self {
        Self {
            risk_free_rate,
            beta,
            market_return,
        }
    }

    /// Build from percentage-entered rates (2.0 = 2%).
    pub fn from_percent(risk_free_pct: f64, beta: f64, market_return_pct: f64) -> Self {
        Self::new(risk_free_pct / 100.0, beta, market_return_pct / 100.0)
    }

    pub fn risk_free_pct(&self) -> f64 {
        self.risk_free_rate * 100.0
    }

    pub fn market_return_pct(&self) -> f64 {
        self.market_return * 100.0
    }

    /// `rm − rf`, the slope of the Security Market Line.
    pub fn market_risk_premium(&self) -> f64 {
        self.market_return - self.risk_free_rate
    }

    /// Input-collection policy: every field finite and non-negative.
    ///
    /// The evaluator accepts any real; this is what the CLI and TUI enforce
    /// before triggering a calculation. There is no upper bound.
    pub fn validate(&self) -> Result<()> {
        check_field("risk-free rate", self.risk_free_rate)?;
        check_field("beta", self.beta)?;
        check_field("market return", self.market_return)?;
        Ok(())
    }
}

impl Default for CapmInputs {
    /// Rf 2%, β 1.0, Rm 8%.
    fn default() -> Self {
        Self::from_percent(2.0, 1.0, 8.0)
    }
}

fn check_field(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CapmError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(CapmError::Negative { field, value });
    }
    Ok(())
}

/// Parse a user-typed number for `field`. Surrounding whitespace and a
/// trailing `%` are accepted.
pub fn parse_field(field: &'static str, input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    trimmed.parse::<f64>().map_err(|_| CapmError::Parse {
        field,
        input: input.to_string(),
    })
}
