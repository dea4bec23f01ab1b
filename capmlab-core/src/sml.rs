//! Security Market Line sampling.
//!
//! The SML is the CAPM expected return plotted against beta. For display it
//! is sampled at evenly spaced betas over a fixed domain (`[0, 2]` unless
//! configured otherwise) with both endpoints included, and the user's own
//! beta is overlaid as a single highlighted point.
//!
//! All y-values are in percent units: the evaluator is applied to
//! `rf * 100` and `rm * 100`. The highlight goes through exactly the same
//! path as the samples, so a sample taken at the user's beta and the
//! highlight are bit-identical.

use serde::{Deserialize, Serialize};

use crate::error::{CapmError, Result};
use crate::evaluator::evaluate;

/// Number of samples the calculator plots.
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// A `(beta, expected return %)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmlPoint {
    pub beta: f64,
    pub expected_return: f64,
}

impl SmlPoint {
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.beta, self.expected_return)
    }
}

/// Closed beta interval the line is sampled over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaDomain {
    pub start: f64,
    pub end: f64,
}

impl BetaDomain {
    pub fn new(start: f64, end: f64) -> Result<Self> {
        let domain = Self { start, end };
        domain.validate()?;
        Ok(domain)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.start.is_finite() || !self.end.is_finite() || self.start >= self.end {
            return Err(CapmError::InvalidDomain {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, beta: f64) -> bool {
        beta >= self.start && beta <= self.end
    }
}

impl Default for BetaDomain {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 2.0,
        }
    }
}

/// Lazy, restartable sampler over the SML.
///
/// Cloning gives an independent cursor; two samplers built from the same
/// arguments always yield the same sequence.
#[derive(Debug, Clone)]
pub struct SmlSampler {
    risk_free_pct: f64,
    market_return_pct: f64,
    domain: BetaDomain,
    sample_count: usize,
    front: usize,
    back: usize,
}

impl SmlSampler {
    /// `risk_free_rate` and `market_return` are fractions.
    pub fn new(
        risk_free_rate: f64,
        market_return: f64,
        domain: BetaDomain,
        sample_count: usize,
    ) -> Self {
        Self {
            risk_free_pct: risk_free_rate * 100.0,
            market_return_pct: market_return * 100.0,
            domain,
            sample_count,
            front: 0,
            back: sample_count,
        }
    }

    /// Beta of the `i`-th sample. The last sample is pinned to the domain end
    /// so accumulated rounding never moves the endpoint.
    fn beta_at(&self, i: usize) -> f64 {
        if i == 0 {
            return self.domain.start;
        }
        if i + 1 == self.sample_count {
            return self.domain.end;
        }
        let step = self.domain.width() / (self.sample_count - 1) as f64;
        self.domain.start + i as f64 * step
    }

    fn point_at(&self, i: usize) -> SmlPoint {
        self.point_for_beta(self.beta_at(i))
    }

    /// Evaluate the line at an arbitrary beta, in percent units.
    pub fn point_for_beta(&self, beta: f64) -> SmlPoint {
        SmlPoint {
            beta,
            expected_return: evaluate(self.risk_free_pct, beta, self.market_return_pct),
        }
    }

    pub fn domain(&self) -> BetaDomain {
        self.domain
    }
}

impl Iterator for SmlSampler {
    type Item = SmlPoint;

    fn next(&mut self) -> Option<SmlPoint> {
        if self.front >= self.back {
            return None;
        }
        let point = self.point_at(self.front);
        self.front += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for SmlSampler {
    fn next_back(&mut self) -> Option<SmlPoint> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.point_at(self.back))
    }
}

impl ExactSizeIterator for SmlSampler {}

impl std::iter::FusedIterator for SmlSampler {}

/// A sampled Security Market Line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmlCurve {
    pub domain: BetaDomain,
    pub points: Vec<SmlPoint>,
}

impl SmlCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&SmlPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SmlPoint> {
        self.points.last()
    }

    /// Points as `(x, y)` tuples, the shape chart widgets want.
    pub fn to_tuples(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(SmlPoint::as_tuple).collect()
    }

    /// Min and max expected return over the samples.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let (lo, hi) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.expected_return), hi.max(p.expected_return))
            });
        Some((lo, hi))
    }
}

/// Sample the SML with an explicit domain and sample count.
pub fn generate_curve_with(
    risk_free_rate: f64,
    market_return: f64,
    domain: BetaDomain,
    sample_count: usize,
) -> SmlCurve {
    let sampler = SmlSampler::new(risk_free_rate, market_return, domain, sample_count);
    let points: Vec<SmlPoint> = sampler.collect();
    tracing::trace!(samples = points.len(), "sampled security market line");
    SmlCurve { domain, points }
}

/// The highlighted point for the user's beta, in percent units.
pub fn highlight_point(risk_free_rate: f64, market_return: f64, user_beta: f64) -> SmlPoint {
    SmlSampler::new(risk_free_rate, market_return, BetaDomain::default(), 0)
        .point_for_beta(user_beta)
}

/// Sampled line over `[0, 2]` with 100 points, plus the user's point.
pub fn generate_curve(
    risk_free_rate: f64,
    market_return: f64,
    user_beta: f64,
) -> (SmlCurve, SmlPoint) {
    let curve = generate_curve_with(
        risk_free_rate,
        market_return,
        BetaDomain::default(),
        DEFAULT_SAMPLE_COUNT,
    );
    let highlight = highlight_point(risk_free_rate, market_return, user_beta);
    (curve, highlight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_curve_has_100_points_on_0_2() {
        let (curve, _) = generate_curve(0.02, 0.08, 1.0);
        assert_eq!(curve.len(), 100);
        assert_eq!(curve.first().unwrap().beta, 0.0);
        assert_eq!(curve.last().unwrap().beta, 2.0);
    }

    #[test]
    fn endpoints_in_percent_units() {
        let (curve, _) = generate_curve(0.02, 0.08, 1.0);
        assert_eq!(curve.first().unwrap().expected_return, 2.0);
        assert_relative_eq!(curve.last().unwrap().expected_return, 14.0, epsilon = 1e-12);
    }

    #[test]
    fn highlight_at_domain_end_matches_last_sample() {
        let (curve, highlight) = generate_curve(0.02, 0.08, 2.0);
        assert_eq!(highlight, *curve.last().unwrap());
    }

    #[test]
    fn single_sample_is_domain_start() {
        let curve = generate_curve_with(0.02, 0.08, BetaDomain::default(), 1);
        assert_eq!(curve.len(), 1);
        assert_eq!(curve.points[0].beta, 0.0);
    }

    #[test]
    fn zero_samples_is_empty() {
        let curve = generate_curve_with(0.02, 0.08, BetaDomain::default(), 0);
        assert!(curve.is_empty());
        assert!(curve.y_bounds().is_none());
    }

    #[test]
    fn sampler_is_restartable() {
        let sampler = SmlSampler::new(0.03, 0.1, BetaDomain::default(), 17);
        let a: Vec<_> = sampler.clone().collect();
        let b: Vec<_> = sampler.collect();
        assert_eq!(a, b);
    }

    #[test]
    fn sampler_reverses() {
        let sampler = SmlSampler::new(0.03, 0.1, BetaDomain::default(), 10);
        let forward: Vec<_> = sampler.clone().collect();
        let mut backward: Vec<_> = sampler.rev().collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn sampler_exact_size() {
        let mut sampler = SmlSampler::new(0.03, 0.1, BetaDomain::default(), 5);
        assert_eq!(sampler.len(), 5);
        sampler.next();
        sampler.next_back();
        assert_eq!(sampler.len(), 3);
    }

    #[test]
    fn invalid_domain_rejected() {
        assert!(BetaDomain::new(2.0, 0.0).is_err());
        assert!(BetaDomain::new(1.0, 1.0).is_err());
        assert!(BetaDomain::new(0.0, f64::INFINITY).is_err());
        assert!(BetaDomain::new(-1.0, 3.0).is_ok());
    }

    #[test]
    fn y_bounds_of_rising_line() {
        let (curve, _) = generate_curve(0.02, 0.08, 1.0);
        let (lo, hi) = curve.y_bounds().unwrap();
        assert_eq!(lo, 2.0);
        assert_relative_eq!(hi, 14.0, epsilon = 1e-12);
    }

    #[test]
    fn inverted_market_slopes_down() {
        // rm below rf: the line falls with beta.
        let (curve, _) = generate_curve(0.08, 0.02, 1.0);
        assert!(curve.first().unwrap().expected_return > curve.last().unwrap().expected_return);
    }
}
