//! One full calculation: evaluate, format, sample the line, compare inputs.
//!
//! This is what a "calculate now" trigger produces. The report is plain data;
//! the CLI serializes it and the TUI renders it.

use serde::{Deserialize, Serialize};

use crate::evaluator::CapmResult;
use crate::inputs::CapmInputs;
use crate::settings::Settings;
use crate::sml::{generate_curve_with, highlight_point, SmlCurve, SmlPoint};

/// The three bars of the input comparison chart, all in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputComparison {
    pub risk_free_pct: f64,
    pub market_return_pct: f64,
    pub expected_return_pct: f64,
}

impl InputComparison {
    pub fn new(inputs: &CapmInputs, result: &CapmResult) -> Self {
        Self {
            risk_free_pct: inputs.risk_free_pct(),
            market_return_pct: inputs.market_return_pct(),
            expected_return_pct: result.expected_return_pct(),
        }
    }

    /// Labelled bars in display order.
    pub fn bars(&self) -> [(&'static str, f64); 3] {
        [
            ("Risk-Free Rate (%)", self.risk_free_pct),
            ("Market Return (%)", self.market_return_pct),
            ("Your Expected Return (%)", self.expected_return_pct),
        ]
    }

    pub fn max(&self) -> f64 {
        self.bars().iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Everything one calculation produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapmReport {
    pub inputs: CapmInputs,
    pub result: CapmResult,
    /// Expected return in percent, formatted under the active policy, with `%`.
    pub display: String,
    pub curve: SmlCurve,
    /// Computed in percent units like `curve`, not from `result`, so it can
    /// differ from `display` in the last bits.
    pub highlight: SmlPoint,
    pub comparison: InputComparison,
}

impl CapmReport {
    /// The line shown after a successful calculation.
    pub fn headline(&self) -> String {
        format!("Expected Return: {}", self.display)
    }
}

/// Run the whole pipeline for `inputs` under `settings`.
///
/// Pure: the same arguments always produce an equal report. Inputs are not
/// validated here.
pub fn calculate(inputs: &CapmInputs, settings: &Settings) -> CapmReport {
    let result = inputs.evaluate();
    let display = settings.format.format_percent(result.expected_return_pct());
    let curve = generate_curve_with(
        inputs.risk_free_rate,
        inputs.market_return,
        settings.domain,
        settings.sample_count,
    );
    let highlight = highlight_point(inputs.risk_free_rate, inputs.market_return, inputs.beta);
    let comparison = InputComparison::new(inputs, &result);

    tracing::debug!(
        rf = inputs.risk_free_rate,
        beta = inputs.beta,
        rm = inputs.market_return,
        expected = result.expected_return,
        "capm calculated"
    );

    CapmReport {
        inputs: *inputs,
        result,
        display,
        curve,
        highlight,
        comparison,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatPolicy;

    #[test]
    fn default_inputs_headline() {
        let report = calculate(&CapmInputs::default(), &Settings::default());
        assert_eq!(report.headline(), "Expected Return: 8.00%");
        assert_eq!(report.curve.len(), 100);
        assert_eq!(report.highlight.beta, 1.0);
    }

    #[test]
    fn headline_follows_policy() {
        let settings = Settings::default().with_format(FormatPolicy::Trimmed9);
        let report = calculate(&CapmInputs::from_percent(2.0, 0.9, 8.0), &settings);
        assert_eq!(report.display, "7.4%");
    }

    #[test]
    fn comparison_bars_in_percent() {
        let report = calculate(&CapmInputs::from_percent(2.0, 2.0, 8.0), &Settings::default());
        let bars = report.comparison.bars();
        assert_eq!(bars[0], ("Risk-Free Rate (%)", 2.0));
        assert_eq!(bars[1], ("Market Return (%)", 8.0));
        assert!((bars[2].1 - 14.0).abs() < 1e-9);
        assert!((report.comparison.max() - 14.0).abs() < 1e-9);
    }

    #[test]
    fn report_serializes_to_json() {
        let report = calculate(&CapmInputs::default(), &Settings::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["display"], "8.00%");
        assert_eq!(json["curve"]["points"].as_array().unwrap().len(), 100);
        assert_eq!(json["inputs"]["beta"], 1.0);
    }

    #[test]
    fn highlight_uses_curve_units() {
        let inputs = CapmInputs::from_percent(3.5, 1.3, 9.25);
        let report = calculate(&inputs, &Settings::default());
        let on_line = crate::evaluator::evaluate(
            inputs.risk_free_rate * 100.0,
            inputs.beta,
            inputs.market_return * 100.0,
        );
        assert_eq!(report.highlight.expected_return, on_line);
        let shown = report.result.expected_return_pct();
        assert!((report.highlight.expected_return - shown).abs() < 1e-9);
    }

    #[test]
    fn calculation_is_deterministic() {
        let inputs = CapmInputs::from_percent(3.5, 1.3, 9.25);
        let settings = Settings::default();
        assert_eq!(calculate(&inputs, &settings), calculate(&inputs, &settings));
    }
}
