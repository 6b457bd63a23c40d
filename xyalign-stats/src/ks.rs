//! Two-sample Kolmogorov-Smirnov test.
use log::debug;
use serde::Serialize;

use crate::errors::Result;
use crate::models::DepthSample;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KsResult {
    /// Largest absolute gap between the two empirical CDFs.
    pub statistic: f64,
    /// Asymptotic two-sided p-value.
    pub p_value: f64,
}

///
/// Two-sample Kolmogorov-Smirnov test between `a` and `b`.
///
/// Deterministic: the same inputs always give the same result. Both samples
/// are validated the same way as for the resampling tests.
///
pub fn ks_2samp(a: &DepthSample, b: &DepthSample) -> Result<KsResult> {
    a.validated_mean()?;
    b.validated_mean()?;

    let mut xs = a.values().to_vec();
    let mut ys = b.values().to_vec();
    xs.sort_by(f64::total_cmp);
    ys.sort_by(f64::total_cmp);

    let statistic = ks_statistic(&xs, &ys);
    let (n, m) = (xs.len() as f64, ys.len() as f64);
    let en = (n * m / (n + m)).sqrt();
    let p_value = kolmogorov_q((en + 0.12 + 0.11 / en) * statistic);

    debug!(
        "KS test {} vs {}: D={:.4}, p={:.4e}",
        a.name(),
        b.name(),
        statistic,
        p_value
    );

    Ok(KsResult { statistic, p_value })
}

/// Supremum distance between the empirical CDFs of two sorted slices.
fn ks_statistic(xs: &[f64], ys: &[f64]) -> f64 {
    let (n, m) = (xs.len() as f64, ys.len() as f64);
    let (mut i, mut j) = (0, 0);
    let mut d: f64 = 0.0;

    while i < xs.len() && j < ys.len() {
        let x = xs[i].min(ys[j]);
        // step over ties on both sides before comparing
        while i < xs.len() && xs[i] <= x {
            i += 1;
        }
        while j < ys.len() && ys[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n - j as f64 / m).abs());
    }

    d
}

///
/// Kolmogorov survival function `Q(lambda) = 2 sum (-1)^(k-1) exp(-2 k^2 lambda^2)`.
///
/// Returns 1.0 when the series fails to converge, which only happens for
/// very small `lambda`.
///
fn kolmogorov_q(lambda: f64) -> f64 {
    const EPS1: f64 = 1e-3;
    const EPS2: f64 = 1e-8;

    let a2 = -2.0 * lambda * lambda;
    let mut fac = 2.0;
    let mut sum = 0.0;
    let mut previous = 0.0;

    for k in 1..=100 {
        let kf = k as f64;
        let term = fac * (a2 * kf * kf).exp();
        sum += term;
        if term.abs() <= EPS1 * previous || term.abs() <= EPS2 * sum {
            return sum.clamp(0.0, 1.0);
        }
        fac = -fac;
        previous = term.abs();
    }

    1.0
}
