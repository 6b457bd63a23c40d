//! Permutation test on the difference of means between two samples.
use std::sync::atomic::AtomicBool;

use log::{debug, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::errors::{Result, StatsError};
use crate::models::DepthSample;
use crate::utils::{
    check_cancelled, check_iterations, mean, percentile, percentile_sorted, retain_finite,
};

/// How often (in iterations) the cancellation flag is polled.
const CANCEL_POLL_INTERVAL: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermutationResult {
    /// `mean(a) - mean(b)` on the observed samples.
    pub observed_diff: f64,
    /// One difference of means per shuffle of the pooled values.
    pub null_distribution: Vec<f64>,
    /// Fraction of null values `<=` the observed difference.
    pub p_low: f64,
    /// Fraction of null values `>=` the observed difference.
    pub p_high: f64,
    pub mean_a: f64,
    pub mean_b: f64,
    pub size_a: usize,
    pub size_b: usize,
    /// 2.5th and 97.5th percentiles of the permuted mean ratios
    /// `mean(a') / mean(b')`, each divided by the observed ratio.
    pub ratio_interval: (f64, f64),
    /// Shuffles whose second group had a zero mean, left out of `ratio_interval`.
    pub undefined_ratios: usize,
}

impl PermutationResult {
    /// Observed ratio `mean(a) / mean(b)`.
    pub fn observed_ratio(&self) -> f64 {
        self.mean_a / self.mean_b
    }

    /// `(2.5th, 50th, 97.5th)` percentiles of the null distribution.
    pub fn null_quantiles(&self) -> (f64, f64, f64) {
        let mut sorted = self.null_distribution.clone();
        sorted.sort_by(f64::total_cmp);
        (
            percentile_sorted(&sorted, 2.5),
            percentile_sorted(&sorted, 50.0),
            percentile_sorted(&sorted, 97.5),
        )
    }

    ///
    /// Whether the permuted ratio interval strictly contains 1.0, meaning the
    /// observed ratio is not distinguishable from what random labelling
    /// produces.
    ///
    pub fn straddles_unit_ratio(&self) -> bool {
        let (low, high) = self.ratio_interval;
        low < 1.0 && 1.0 < high
    }
}

///
/// Permutation test comparing the means of `a` and `b`.
///
/// The values of both samples are pooled; on each iteration the pool is
/// shuffled and split into groups of the original sizes, and the difference
/// of group means is recorded.
///
/// # Arguments
/// - a: first sample
/// - b: second sample
/// - num_permutations: number of shuffles, must be positive
/// - rng: random source; pass a seeded generator for reproducible output
pub fn permutation_test<R: Rng + ?Sized>(
    a: &DepthSample,
    b: &DepthSample,
    num_permutations: usize,
    rng: &mut R,
) -> Result<PermutationResult> {
    permutation_test_with_cancel(a, b, num_permutations, rng, None)
}

pub(crate) fn permutation_test_with_cancel<R: Rng + ?Sized>(
    a: &DepthSample,
    b: &DepthSample,
    num_permutations: usize,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> Result<PermutationResult> {
    check_iterations(num_permutations, "permutations")?;
    let mean_a = a.validated_mean()?;
    let mean_b = b.validated_mean()?;

    debug!(
        "Permutation test {} (n={}) vs {} (n={}), {} permutations",
        a.name(),
        a.len(),
        b.name(),
        b.len(),
        num_permutations
    );

    let observed_diff = mean_a - mean_b;
    let observed_ratio = mean_a / mean_b;

    let mut pooled: Vec<f64> = a.values().iter().chain(b.values()).copied().collect();
    let split = a.len();

    let mut null_distribution = Vec::with_capacity(num_permutations);
    let mut null_ratios = Vec::with_capacity(num_permutations);

    for i in 0..num_permutations {
        if i % CANCEL_POLL_INTERVAL == 0 {
            check_cancelled(cancel, i, num_permutations)?;
        }
        pooled.shuffle(rng);
        let (first, second) = pooled.split_at(split);
        let (m1, m2) = (mean(first), mean(second));
        null_distribution.push(m1 - m2);
        null_ratios.push(m1 / m2);
    }

    let n = num_permutations as f64;
    let p_low = null_distribution
        .iter()
        .filter(|&&d| d <= observed_diff)
        .count() as f64
        / n;
    let p_high = null_distribution
        .iter()
        .filter(|&&d| d >= observed_diff)
        .count() as f64
        / n;

    let (null_ratios, undefined_ratios) = retain_finite(null_ratios);
    if null_ratios.is_empty() {
        return Err(StatsError::DegenerateInput {
            sample: b.name().to_string(),
            reason: "every permuted group has a zero mean".to_string(),
        });
    }
    if undefined_ratios > 0 {
        warn!(
            "{} of {} permutations of {} vs {} had a zero-mean divisor",
            undefined_ratios,
            num_permutations,
            a.name(),
            b.name()
        );
    }

    let ratio_interval = (
        percentile(&null_ratios, 2.5) / observed_ratio,
        percentile(&null_ratios, 97.5) / observed_ratio,
    );

    Ok(PermutationResult {
        observed_diff,
        null_distribution,
        p_low,
        p_high,
        mean_a,
        mean_b,
        size_a: a.len(),
        size_b: b.len(),
        ratio_interval,
        undefined_ratios,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::*;

    use crate::errors::StatsError;

    #[fixture]
    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[rstest]
    fn test_separated_samples(mut rng: StdRng) {
        let a = DepthSample::new("a", vec![10.0; 4]);
        let b = DepthSample::new("b", vec![20.0; 4]);

        let result = permutation_test(&a, &b, 1000, &mut rng).unwrap();
        assert_eq!(result.observed_diff, -10.0);
        assert_eq!(result.null_distribution.len(), 1000);
        assert_eq!(result.p_high, 1.0);
        assert!(result.p_low < 0.05, "p_low = {}", result.p_low);
        assert_eq!(result.observed_ratio(), 0.5);
    }

    #[rstest]
    fn test_does_not_modify_inputs(mut rng: StdRng) {
        let a = DepthSample::new("a", vec![1.0, 2.0, 3.0]);
        let b = DepthSample::new("b", vec![4.0, 5.0]);
        let (a_before, b_before) = (a.clone(), b.clone());

        permutation_test(&a, &b, 50, &mut rng).unwrap();
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[rstest]
    #[case(3)]
    #[case(7)]
    #[case(19)]
    fn test_identical_samples(#[case] seed: u64) {
        let values: Vec<f64> = (0..40).map(|i| 20.0 + (i % 7) as f64).collect();
        let a = DepthSample::new("a", values.clone());
        let b = DepthSample::new("b", values);
        let mut rng = StdRng::seed_from_u64(seed);

        let result = permutation_test(&a, &b, 4000, &mut rng).unwrap();
        assert_eq!(result.observed_diff, 0.0);
        assert!((result.p_low - 0.5).abs() < 0.06, "p_low = {}", result.p_low);
        assert!((result.p_high - 0.5).abs() < 0.06, "p_high = {}", result.p_high);
        assert!(result.straddles_unit_ratio(), "{:?}", result.ratio_interval);
    }

    #[rstest]
    fn test_zero_mean_shuffles_are_left_out_of_ratio_interval(mut rng: StdRng) {
        let x = DepthSample::new("chrX", vec![0.0, 0.0, 0.0, 6.0]);
        let y = DepthSample::new("chrY", vec![0.0, 0.0, 0.0, 4.0]);

        let result = permutation_test(&x, &y, 2000, &mut rng).unwrap();
        assert_eq!(result.null_distribution.len(), 2000);
        assert!(result.undefined_ratios > 0);
        // finite permuted ratios are 0, 4/6 and 6/4; the observed ratio is 6/4
        assert_eq!(result.ratio_interval, (0.0, 1.0));
        assert!(!result.straddles_unit_ratio());
    }

    #[rstest]
    fn test_halved_sample_does_not_straddle_unit_ratio(mut rng: StdRng) {
        let autosome: Vec<f64> = (0..40).map(|i| 30.0 + (i % 5) as f64).collect();
        let x: Vec<f64> = autosome.iter().map(|v| v / 2.0).collect();
        let a = DepthSample::new("chr19", autosome);
        let b = DepthSample::new("chrX", x);

        let result = permutation_test(&a, &b, 2000, &mut rng).unwrap();
        assert!(!result.straddles_unit_ratio(), "{:?}", result.ratio_interval);
        assert_eq!(result.p_high, 0.0);
    }

    #[rstest]
    fn test_same_seed_same_result() {
        let a = DepthSample::new("a", vec![1.0, 5.0, 2.0, 8.0]);
        let b = DepthSample::new("b", vec![3.0, 3.5, 9.0]);

        let first = permutation_test(&a, &b, 100, &mut StdRng::seed_from_u64(11)).unwrap();
        let second = permutation_test(&a, &b, 100, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_rejects_degenerate_input(mut rng: StdRng) {
        let a = DepthSample::new("a", vec![1.0]);
        let empty = DepthSample::new("chrY", vec![]);
        let zeros = DepthSample::new("chrY", vec![0.0, 0.0]);

        assert!(matches!(
            permutation_test(&a, &empty, 10, &mut rng),
            Err(StatsError::DegenerateInput { .. })
        ));
        assert!(matches!(
            permutation_test(&a, &zeros, 10, &mut rng),
            Err(StatsError::DegenerateInput { .. })
        ));
        assert!(matches!(
            permutation_test(&a, &a, 0, &mut rng),
            Err(StatsError::InvalidParameter(_))
        ));
    }

    #[rstest]
    fn test_cancelled_before_start(mut rng: StdRng) {
        let a = DepthSample::new("a", vec![1.0, 2.0]);
        let b = DepthSample::new("b", vec![3.0, 4.0]);
        let flag = AtomicBool::new(true);

        let result = permutation_test_with_cancel(&a, &b, 10, &mut rng, Some(&flag));
        assert_eq!(
            result,
            Err(StatsError::Cancelled {
                completed: 0,
                requested: 10
            })
        );
    }
}
