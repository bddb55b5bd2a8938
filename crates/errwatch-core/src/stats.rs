//! Bootstrap statistics for occurrence-rate comparison.
//!
//! Estimates a confidence interval for the difference between the medians of
//! two count samples by resampling each sample with replacement.

use rand::Rng;

use crate::error::{Result, WatchError};
use crate::models::ConfidenceInterval;

/// Default number of bootstrap resamples per input sample.
pub const DEFAULT_RESAMPLES: usize = 1000;

/// Default significance level (two-sided 95% interval).
pub const DEFAULT_ALPHA: f64 = 0.05;

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using standard linear
/// interpolation between order statistics (NumPy's default `percentile`).
///
/// Returns `0.0` for an empty slice. `p` is clamped to `[0, 100]`.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    let len = sorted_data.len();
    if len == 1 {
        return sorted_data[0];
    }
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) };
    let rank = (p / 100.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted_data[lo];
    }
    let frac = rank - lo as f64;
    sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo])
}

/// Median of a **sorted** slice; mean of the two middle values for even
/// lengths.
pub fn median(sorted_data: &[f64]) -> f64 {
    percentile(sorted_data, 50.0)
}

// ── BootstrapConfig ───────────────────────────────────────────────────────────

/// Parameters of the bootstrap rate-change test.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapConfig {
    /// Number of resamples drawn from each input.
    pub resamples: usize,
    /// Significance level; the interval covers `1 - alpha`.
    pub alpha: f64,
    /// Fixed RNG seed, or `None` to seed from the operating system.
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            resamples: DEFAULT_RESAMPLES,
            alpha: DEFAULT_ALPHA,
            seed: None,
        }
    }
}

impl BootstrapConfig {
    /// Confidence level expressed as a percentage, e.g. `95.0`.
    pub fn confidence_percent(&self) -> f64 {
        confidence_percent(self.alpha)
    }
}

/// `100 * (1 - alpha)`.
pub fn confidence_percent(alpha: f64) -> f64 {
    100.0 * (1.0 - alpha)
}

// ── Bootstrap ─────────────────────────────────────────────────────────────────

/// Bootstrap confidence interval for `median(target) - median(history)`.
///
/// Each input is resampled `resamples` times (same length, drawn uniformly
/// with replacement). The medians of the resamples are paired by position and
/// differenced; the `[alpha/2, 1 - alpha/2]` percentiles of those differences
/// form the interval.
///
/// # Errors
///
/// [`WatchError::InvalidInput`] when either sample is empty, `resamples` is
/// zero, or `alpha` is not inside `(0, 1)`.
pub fn confidence_interval_of_median_difference<R: Rng>(
    target: &[u64],
    history: &[u64],
    resamples: usize,
    alpha: f64,
    rng: &mut R,
) -> Result<ConfidenceInterval> {
    if target.is_empty() {
        return Err(WatchError::InvalidInput(
            "target sample is empty".to_string(),
        ));
    }
    if history.is_empty() {
        return Err(WatchError::InvalidInput(
            "history sample is empty".to_string(),
        ));
    }
    if resamples < 1 {
        return Err(WatchError::InvalidInput(
            "at least one resample is required".to_string(),
        ));
    }
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(WatchError::InvalidInput(format!(
            "alpha must be in (0, 1), got {alpha}"
        )));
    }

    let target_medians = bootstrap_medians(target, resamples, rng);
    let history_medians = bootstrap_medians(history, resamples, rng);

    let mut deltas: Vec<f64> = target_medians
        .iter()
        .zip(history_medians.iter())
        .map(|(t, h)| t - h)
        .collect();
    deltas.sort_by(|a, b| a.total_cmp(b));

    Ok(ConfidenceInterval::new(
        percentile(&deltas, 100.0 * alpha / 2.0),
        percentile(&deltas, 100.0 * (1.0 - alpha / 2.0)),
    ))
}

/// Draw `resamples` bootstrap resamples of `data` and return their medians,
/// in draw order.
///
/// `data` must be non-empty.
pub fn bootstrap_medians<R: Rng>(data: &[u64], resamples: usize, rng: &mut R) -> Vec<f64> {
    let n = data.len();
    let mut sample = vec![0.0_f64; n];
    let mut medians = Vec::with_capacity(resamples);

    for _ in 0..resamples {
        for slot in sample.iter_mut() {
            *slot = data[rng.random_range(0..n)] as f64;
        }
        sample.sort_by(|a, b| a.total_cmp(b));
        medians.push(median(&sample));
    }

    medians
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    // ── percentile ───────────────────────────────────────────────────────────

    #[test]
    fn test_percentile_empty_returns_zero() {
        assert_eq!(percentile(&[], 97.5), 0.0);
    }

    #[test]
    fn test_percentile_single_element() {
        assert_eq!(percentile(&[42.0], 2.5), 42.0);
        assert_eq!(percentile(&[42.0], 97.5), 42.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        // rank = 0.025 * 4 = 0.1 → 1 + 0.1 * (2 - 1) = 1.1
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((percentile(&data, 2.5) - 1.1).abs() < 1e-9);
        // rank = 0.975 * 4 = 3.9 → 4 + 0.9 * (5 - 4) = 4.9
        assert!((percentile(&data, 97.5) - 4.9).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_bounds() {
        let data = vec![-3.0, 0.0, 8.0];
        assert_eq!(percentile(&data, 0.0), -3.0);
        assert_eq!(percentile(&data, 100.0), 8.0);
    }

    #[test]
    fn test_percentile_clamps_out_of_range() {
        let data = vec![1.0, 2.0, 3.0];
        assert_eq!(percentile(&data, 150.0), 3.0);
        assert_eq!(percentile(&data, -20.0), 1.0);
        assert_eq!(percentile(&data, f64::NAN), 1.0);
    }

    // ── median ───────────────────────────────────────────────────────────────

    #[test]
    fn test_median_odd_length() {
        assert_eq!(median(&[1.0, 4.0, 9.0]), 4.0);
    }

    #[test]
    fn test_median_even_length() {
        assert_eq!(median(&[2.0, 3.0, 4.0, 5.0]), 3.5);
    }

    // ── bootstrap_medians ────────────────────────────────────────────────────

    #[test]
    fn test_bootstrap_medians_count_and_range() {
        let data = [2, 3, 4, 5];
        let medians = bootstrap_medians(&data, 250, &mut seeded(7));
        assert_eq!(medians.len(), 250);
        assert!(medians.iter().all(|m| (2.0..=5.0).contains(m)));
    }

    #[test]
    fn test_bootstrap_medians_constant_sample() {
        let medians = bootstrap_medians(&[6, 6, 6], 50, &mut seeded(1));
        assert!(medians.iter().all(|&m| m == 6.0));
    }

    // ── confidence_interval_of_median_difference ─────────────────────────────

    #[test]
    fn test_single_values_increase() {
        let ci = confidence_interval_of_median_difference(
            &[10],
            &[5],
            DEFAULT_RESAMPLES,
            DEFAULT_ALPHA,
            &mut seeded(42),
        )
        .unwrap();
        assert!(ci.low > 0.0);
        assert_eq!(ci.low, 5.0);
        assert_eq!(ci.high, 5.0);
    }

    #[test]
    fn test_separated_samples_increase() {
        let ci = confidence_interval_of_median_difference(
            &[50, 52, 55],
            &[1, 2, 3, 2, 1],
            DEFAULT_RESAMPLES,
            DEFAULT_ALPHA,
            &mut seeded(3),
        )
        .unwrap();
        assert!(ci.is_increase(), "{ci:?}");
        assert!(ci.low <= ci.high);
    }

    #[test]
    fn test_decrease_is_not_increase() {
        let ci = confidence_interval_of_median_difference(
            &[1, 1],
            &[20, 21, 22, 23],
            DEFAULT_RESAMPLES,
            DEFAULT_ALPHA,
            &mut seeded(3),
        )
        .unwrap();
        assert!(!ci.is_increase());
        assert!(ci.high < 0.0);
    }

    #[test]
    fn test_identical_constant_samples_give_zero_interval() {
        let ci = confidence_interval_of_median_difference(
            &[3, 3, 3],
            &[3, 3],
            200,
            DEFAULT_ALPHA,
            &mut seeded(9),
        )
        .unwrap();
        assert_eq!(ci, ConfidenceInterval::new(0.0, 0.0));
        assert!(!ci.is_increase());
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let target = [4, 8, 15, 16, 23, 42];
        let history = [1, 2, 3, 5, 8, 13, 21];
        let run = |seed| {
            confidence_interval_of_median_difference(&target, &history, 500, 0.1, &mut seeded(seed))
                .unwrap()
        };
        let a = run(11);
        let b = run(11);
        assert_eq!(a, b);
    }

    #[test]
    fn test_interval_stays_within_possible_differences() {
        let target = [4, 8, 15];
        let history = [1, 2, 30];
        let ci =
            confidence_interval_of_median_difference(&target, &history, 300, 0.05, &mut seeded(5))
                .unwrap();
        // Medians lie within each sample's range.
        assert!(ci.low >= 4.0 - 30.0);
        assert!(ci.high <= 15.0 - 1.0);
        assert!(ci.low <= ci.high);
    }

    #[test]
    fn test_empty_target_is_invalid() {
        let err = confidence_interval_of_median_difference(&[], &[1], 10, 0.05, &mut seeded(0))
            .unwrap_err();
        assert!(matches!(err, WatchError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_history_is_invalid() {
        let err = confidence_interval_of_median_difference(&[1], &[], 10, 0.05, &mut seeded(0))
            .unwrap_err();
        assert!(matches!(err, WatchError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_resamples_is_invalid() {
        let err = confidence_interval_of_median_difference(&[1], &[1], 0, 0.05, &mut seeded(0))
            .unwrap_err();
        assert!(matches!(err, WatchError::InvalidInput(_)));
    }

    #[test]
    fn test_alpha_out_of_range_is_invalid() {
        for alpha in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let result =
                confidence_interval_of_median_difference(&[1], &[1], 10, alpha, &mut seeded(0));
            assert!(result.is_err(), "alpha {alpha} accepted");
        }
    }

    // ── BootstrapConfig ──────────────────────────────────────────────────────

    #[test]
    fn test_bootstrap_config_defaults() {
        let config = BootstrapConfig::default();
        assert_eq!(config.resamples, 1000);
        assert!((config.alpha - 0.05).abs() < f64::EPSILON);
        assert!(config.seed.is_none());
        assert!((config.confidence_percent() - 95.0).abs() < 1e-9);
    }
}
