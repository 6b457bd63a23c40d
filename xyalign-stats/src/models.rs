use serde::Serialize;

use crate::bootstrap::BootstrapResult;
use crate::errors::{Result, StatsError};
use crate::ks::KsResult;
use crate::permutation::PermutationResult;

///
/// Per-window depth values collected for one chromosome.
///
/// A sample is immutable once built. Tests borrow it and never reorder or
/// modify its values.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthSample {
    name: String,
    values: Vec<f64>,
}

impl DepthSample {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        DepthSample {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic mean, or `None` for an empty sample.
    pub fn mean(&self) -> Option<f64> {
        match self.values.is_empty() {
            true => None,
            false => Some(self.values.iter().sum::<f64>() / self.values.len() as f64),
        }
    }

    ///
    /// Check that the sample can be used in a comparison and return its mean.
    ///
    /// Empty samples, samples holding NaN or infinite values, and samples
    /// whose mean is zero are rejected.
    ///
    pub fn validated_mean(&self) -> Result<f64> {
        let degenerate = |reason: &str| StatsError::DegenerateInput {
            sample: self.name.clone(),
            reason: reason.to_string(),
        };

        let mean = self.mean().ok_or_else(|| degenerate("sample is empty"))?;
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(degenerate("sample contains non-finite values"));
        }
        if mean == 0.0 {
            return Err(degenerate("sample mean is zero"));
        }

        Ok(mean)
    }
}

///
/// Outcome of any one of the supported two-sample procedures.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "test", rename_all = "snake_case")]
pub enum TestResult {
    Permutation(PermutationResult),
    Ks(KsResult),
    Bootstrap(BootstrapResult),
}

impl From<PermutationResult> for TestResult {
    fn from(value: PermutationResult) -> Self {
        TestResult::Permutation(value)
    }
}

impl From<KsResult> for TestResult {
    fn from(value: KsResult) -> Self {
        TestResult::Ks(value)
    }
}

impl From<BootstrapResult> for TestResult {
    fn from(value: BootstrapResult) -> Self {
        TestResult::Bootstrap(value)
    }
}
