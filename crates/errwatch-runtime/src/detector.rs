//! Rate-change detection seam.
//!
//! [`RateChangeDetector`] decides how much a key's occurrence rate moved
//! between two windows. [`BootstrapDetector`] is the production
//! implementation; tests substitute closures or stubs.

use errwatch_core::error::Result;
use errwatch_core::models::ConfidenceInterval;
use errwatch_core::stats::{
    confidence_interval_of_median_difference, BootstrapConfig, DEFAULT_ALPHA,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── RateChangeDetector ────────────────────────────────────────────────────────

/// Estimates a confidence interval for `median(target) - median(history)`.
pub trait RateChangeDetector {
    fn confidence_interval(&mut self, target: &[u64], history: &[u64])
        -> Result<ConfidenceInterval>;

    /// Significance level of the produced intervals.
    fn alpha(&self) -> f64 {
        DEFAULT_ALPHA
    }
}

impl<F> RateChangeDetector for F
where
    F: FnMut(&[u64], &[u64]) -> Result<ConfidenceInterval>,
{
    fn confidence_interval(
        &mut self,
        target: &[u64],
        history: &[u64],
    ) -> Result<ConfidenceInterval> {
        self(target, history)
    }
}

// ── BootstrapDetector ─────────────────────────────────────────────────────────

/// Bootstrap test over an owned random source.
pub struct BootstrapDetector<R = StdRng> {
    config: BootstrapConfig,
    rng: R,
}

impl BootstrapDetector<StdRng> {
    /// Seed from `config.seed`, or from the operating system when unset.
    pub fn new(config: BootstrapConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng }
    }
}

impl<R: Rng> BootstrapDetector<R> {
    /// Use an explicit random source; `config.seed` is ignored.
    pub fn with_rng(config: BootstrapConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }
}

impl<R: Rng> RateChangeDetector for BootstrapDetector<R> {
    fn confidence_interval(
        &mut self,
        target: &[u64],
        history: &[u64],
    ) -> Result<ConfidenceInterval> {
        confidence_interval_of_median_difference(
            target,
            history,
            self.config.resamples,
            self.config.alpha,
            &mut self.rng,
        )
    }

    fn alpha(&self) -> f64 {
        self.config.alpha
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use errwatch_core::error::WatchError;

    fn seeded_config(seed: u64) -> BootstrapConfig {
        BootstrapConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_bootstrap_detector_single_values() {
        let mut detector = BootstrapDetector::new(BootstrapConfig::default());
        let ci = detector.confidence_interval(&[10], &[5]).unwrap();
        assert!(ci.low > 0.0);
    }

    #[test]
    fn test_bootstrap_detector_seed_is_reproducible() {
        let target = [2, 9, 4, 7, 3];
        let history = [1, 3, 2, 5, 2, 4];

        let mut a = BootstrapDetector::new(seeded_config(17));
        let mut b = BootstrapDetector::new(seeded_config(17));

        assert_eq!(
            a.confidence_interval(&target, &history).unwrap(),
            b.confidence_interval(&target, &history).unwrap()
        );
    }

    #[test]
    fn test_bootstrap_detector_with_rng() {
        let config = BootstrapConfig {
            resamples: 200,
            alpha: 0.1,
            seed: None,
        };
        let mut detector = BootstrapDetector::with_rng(config, StdRng::seed_from_u64(1));
        assert!((detector.alpha() - 0.1).abs() < f64::EPSILON);
        assert_eq!(detector.config().resamples, 200);

        let ci = detector.confidence_interval(&[40, 41, 42], &[1, 2, 3]).unwrap();
        assert!(ci.is_increase());
    }

    #[test]
    fn test_bootstrap_detector_rejects_empty_input() {
        let mut detector = BootstrapDetector::new(seeded_config(1));
        let err = detector.confidence_interval(&[], &[1]).unwrap_err();
        assert!(matches!(err, WatchError::InvalidInput(_)));
    }

    #[test]
    fn test_closure_detector() {
        let mut calls = 0;
        let mut detector = |_: &[u64], _: &[u64]| {
            calls += 1;
            Ok::<_, WatchError>(ConfidenceInterval::new(1.0, 2.0))
        };
        let ci = detector.confidence_interval(&[1], &[1]).unwrap();
        assert_eq!(ci, ConfidenceInterval::new(1.0, 2.0));
        assert!((detector.alpha() - DEFAULT_ALPHA).abs() < f64::EPSILON);
        drop(detector);
        assert_eq!(calls, 1);
    }
}
