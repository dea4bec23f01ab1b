//! The CAPM evaluator.
//!
//! `E[R] = rf + β · (rm − rf)`. Total over the reals: there is no division,
//! no parsing and no resource access, so nothing here returns a `Result`.
//! Non-negativity of the inputs is a collection-layer policy
//! (see [`CapmInputs::validate`](crate::inputs::CapmInputs::validate)) and is
//! deliberately not checked here.

use serde::{Deserialize, Serialize};

use crate::inputs::CapmInputs;

/// Expected return of an asset under CAPM.
///
/// Units are whatever the caller uses for the two rates: fractions in,
/// fractions out; percentages in, percentages out.
#[inline]
pub fn evaluate(risk_free_rate: f64, beta: f64, market_return: f64) -> f64 {
    risk_free_rate + beta * (market_return - risk_free_rate)
}

/// Output of one evaluation. Not stored anywhere; recomputed per request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapmResult {
    /// Expected return as a fraction (0.08 = 8%).
    pub expected_return: f64,
}

impl CapmResult {
    /// Expected return in percent units, as displayed to the user.
    pub fn expected_return_pct(&self) -> f64 {
        self.expected_return * 100.0
    }
}

impl CapmInputs {
    /// Evaluate CAPM for these inputs.
    pub fn evaluate(&self) -> CapmResult {
        CapmResult {
            expected_return: evaluate(self.risk_free_rate, self.beta, self.market_return),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_beta_returns_risk_free_rate() {
        assert_eq!(evaluate(0.02, 0.0, 0.08), 0.02);
    }

    #[test]
    fn unit_beta_returns_market_return() {
        assert_relative_eq!(evaluate(0.02, 1.0, 0.08), 0.08, epsilon = 1e-15);
    }

    #[test]
    fn double_beta_doubles_premium() {
        assert_relative_eq!(evaluate(0.02, 2.0, 0.08), 0.14, epsilon = 1e-15);
    }

    #[test]
    fn negative_beta_below_risk_free() {
        // Allowed by the formula even though the front-ends never send it.
        let r = evaluate(0.02, -1.0, 0.08);
        assert_relative_eq!(r, -0.04, epsilon = 1e-15);
    }

    #[test]
    fn result_in_percent() {
        let inputs = CapmInputs::new(0.02, 1.5, 0.08);
        let result = inputs.evaluate();
        assert_relative_eq!(result.expected_return, 0.11, epsilon = 1e-15);
        assert_relative_eq!(result.expected_return_pct(), 11.0, epsilon = 1e-12);
    }
}
