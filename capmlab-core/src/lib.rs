//! CAPM Lab Core — Capital Asset Pricing Model evaluation and Security Market
//! Line sampling.
//!
//! This crate is the stateless heart of the calculator:
//! - [`evaluate`]: `rf + β · (rm − rf)`
//! - [`generate_curve`]: the SML sampled over `[0, 2]` plus the user's point
//! - [`FormatPolicy`]: how an expected return is displayed
//! - [`calculate`]: the full pipeline a "calculate" trigger runs
//!
//! Nothing here holds state or performs I/O. Front-ends own the session and
//! hand immutable [`CapmInputs`] in.

pub mod error;
pub mod evaluator;
pub mod format;
pub mod inputs;
pub mod report;
pub mod settings;
pub mod sml;

pub use error::CapmError;
pub use evaluator::{evaluate, CapmResult};
pub use format::FormatPolicy;
pub use inputs::{parse_field, CapmInputs};
pub use report::{calculate, CapmReport, InputComparison};
pub use settings::{InputDefaults, Settings};
pub use sml::{
    generate_curve, generate_curve_with, highlight_point, BetaDomain, SmlCurve, SmlPoint,
    SmlSampler, DEFAULT_SAMPLE_COUNT,
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a worker thread ships back is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<CapmInputs>();
        require_sync::<CapmInputs>();
        require_send::<CapmReport>();
        require_sync::<CapmReport>();
        require_send::<Settings>();
        require_sync::<Settings>();
        require_send::<SmlSampler>();
        require_sync::<SmlSampler>();
        require_send::<CapmError>();
        require_sync::<CapmError>();
    }

    #[test]
    fn reexports_agree() {
        let (curve, point) = generate_curve(0.02, 0.08, 1.0);
        assert_eq!(curve.len(), DEFAULT_SAMPLE_COUNT);
        assert_eq!(point.beta, 1.0);
        assert_eq!(evaluate(0.02, 0.0, 0.08), 0.02);
    }
}
