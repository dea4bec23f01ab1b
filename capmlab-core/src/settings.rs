//! Runtime settings.
//!
//! Settings are built in memory from defaults plus command-line flags. They
//! can be rendered as TOML so a user can see what is in effect, but nothing
//! reads them back from disk.

use serde::{Deserialize, Serialize};

use crate::error::{CapmError, Result};
use crate::format::FormatPolicy;
use crate::inputs::CapmInputs;
use crate::sml::{BetaDomain, DEFAULT_SAMPLE_COUNT};

/// Default values the input form starts with, in the units the user types.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputDefaults {
    pub risk_free_pct: f64,
    pub beta: f64,
    pub market_return_pct: f64,
    /// Increment applied by the +/- keys.
    pub step: f64,
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            risk_free_pct: 2.0,
            beta: 1.0,
            market_return_pct: 8.0,
            step: 0.1,
        }
    }
}

impl InputDefaults {
    pub fn to_inputs(&self) -> CapmInputs {
        CapmInputs::from_percent(self.risk_free_pct, self.beta, self.market_return_pct)
    }
}

/// Everything that shapes a calculation and its presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub format: FormatPolicy,
    pub sample_count: usize,
    /// Artificial "calculating" delay the TUI shows before a result.
    pub simulated_latency_ms: u64,
    pub domain: BetaDomain,
    pub defaults: InputDefaults,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: FormatPolicy::default(),
            sample_count: DEFAULT_SAMPLE_COUNT,
            simulated_latency_ms: 2_000,
            domain: BetaDomain::default(),
            defaults: InputDefaults::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.domain.validate()?;
        if self.sample_count < 2 {
            return Err(CapmError::InvalidSampleCount(self.sample_count));
        }
        if !self.defaults.step.is_finite() || self.defaults.step <= 0.0 {
            return Err(CapmError::InvalidStep(self.defaults.step));
        }
        self.defaults.to_inputs().validate()?;
        Ok(())
    }

    pub fn with_format(mut self, format: FormatPolicy) -> Self {
        self.format = format;
        self
    }

    pub fn with_domain(mut self, domain: BetaDomain) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn with_latency_ms(mut self, ms: u64) -> Self {
        self.simulated_latency_ms = ms;
        self
    }

    /// Pretty TOML rendering for display.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CapmError::Serialize(e.to_string()))
    }
}
