//! Bootstrap confidence interval for the ratio of two sample means.
use std::sync::atomic::AtomicBool;

use log::{debug, warn};
use rand::Rng;
use serde::Serialize;

use crate::errors::{Result, StatsError};
use crate::models::DepthSample;
use crate::utils::{check_cancelled, check_iterations, percentile_sorted, retain_finite};

const CANCEL_POLL_INTERVAL: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapResult {
    /// `mean(a) / mean(b)` on the observed samples.
    pub point_estimate: f64,
    /// 2.5th percentile of the replicate ratios.
    pub lower_ci: f64,
    /// 97.5th percentile of the replicate ratios.
    pub upper_ci: f64,
    /// Finite replicate ratios, in draw order.
    pub replicates: Vec<f64>,
    /// Replicates left out because `b'` had a zero mean.
    pub undefined_replicates: usize,
}

impl BootstrapResult {
    pub fn contains(&self, ratio: f64) -> bool {
        self.lower_ci <= ratio && ratio <= self.upper_ci
    }
}

///
/// Resample `a` and `b` independently with replacement and record
/// `mean(a') / mean(b')` for each replicate.
///
/// A replicate of `b` drawn entirely from zero-valued windows has no ratio.
/// Such replicates are counted in `undefined_replicates` and left out of the
/// interval. If no replicate has a ratio the input is degenerate.
///
pub fn bootstrap_ratio<R: Rng + ?Sized>(
    a: &DepthSample,
    b: &DepthSample,
    num_bootstraps: usize,
    rng: &mut R,
) -> Result<BootstrapResult> {
    bootstrap_ratio_with_cancel(a, b, num_bootstraps, rng, None)
}

pub(crate) fn bootstrap_ratio_with_cancel<R: Rng + ?Sized>(
    a: &DepthSample,
    b: &DepthSample,
    num_bootstraps: usize,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> Result<BootstrapResult> {
    check_iterations(num_bootstraps, "bootstraps")?;
    let mean_a = a.validated_mean()?;
    let mean_b = b.validated_mean()?;

    debug!(
        "Bootstrap {} vs {}, {} replicates",
        a.name(),
        b.name(),
        num_bootstraps
    );

    let mut ratios = Vec::with_capacity(num_bootstraps);
    for i in 0..num_bootstraps {
        if i % CANCEL_POLL_INTERVAL == 0 {
            check_cancelled(cancel, i, num_bootstraps)?;
        }
        let ra = resampled_mean(a.values(), rng);
        let rb = resampled_mean(b.values(), rng);
        ratios.push(ra / rb);
    }

    let (replicates, undefined_replicates) = retain_finite(ratios);
    if replicates.is_empty() {
        return Err(StatsError::DegenerateInput {
            sample: b.name().to_string(),
            reason: "every bootstrap replicate has a zero mean".to_string(),
        });
    }
    if undefined_replicates > 0 {
        warn!(
            "{} of {} bootstrap replicates of {} vs {} had a zero-mean divisor",
            undefined_replicates,
            num_bootstraps,
            a.name(),
            b.name()
        );
    }

    let mut sorted = replicates.clone();
    sorted.sort_by(f64::total_cmp);

    Ok(BootstrapResult {
        point_estimate: mean_a / mean_b,
        lower_ci: percentile_sorted(&sorted, 2.5),
        upper_ci: percentile_sorted(&sorted, 97.5),
        replicates,
        undefined_replicates,
    })
}

fn resampled_mean<R: Rng + ?Sized>(values: &[f64], rng: &mut R) -> f64 {
    let n = values.len();
    let total: f64 = (0..n).map(|_| values[rng.random_range(0..n)]).sum();
    total / n as f64
}
