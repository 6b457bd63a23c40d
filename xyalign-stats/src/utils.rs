use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::{Result, StatsError};

/// Arithmetic mean of a non-empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

///
/// Percentile of `values` using linear interpolation between closest ranks.
///
/// `q` is in `[0, 100]`. Returns NaN for an empty slice. The slice does not
/// need to be sorted.
///
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, q)
}

/// Same as [percentile] for an already sorted slice.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let (a, b) = (sorted[lo], sorted[hi]);

    // equal neighbours (including two infinities) need no interpolation
    if lo == hi || a == b {
        return a;
    }
    a + (b - a) * (rank - lo as f64)
}

/// Drop NaN and infinite values, returning the rest with the number dropped.
pub(crate) fn retain_finite(mut values: Vec<f64>) -> (Vec<f64>, usize) {
    let before = values.len();
    values.retain(|v| v.is_finite());
    let dropped = before - values.len();
    (values, dropped)
}

pub(crate) fn check_iterations(iterations: usize, what: &str) -> Result<()> {
    match iterations {
        0 => Err(StatsError::InvalidParameter(format!(
            "number of {} must be positive",
            what
        ))),
        _ => Ok(()),
    }
}

pub(crate) fn check_cancelled(
    cancel: Option<&AtomicBool>,
    completed: usize,
    requested: usize,
) -> Result<()> {
    match cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(StatsError::Cancelled {
            completed,
            requested,
        }),
        _ => Ok(()),
    }
}
