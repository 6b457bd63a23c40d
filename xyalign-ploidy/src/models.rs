use std::collections::BTreeMap;

use serde::Serialize;

use xyalign_stats::{BootstrapResult, KsResult, PermutationResult, TestResult};

/// Names of the sex chromosomes in the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SexChromosomes {
    pub x: String,
    /// `None` when the reference (or the analysis) has no Y.
    pub y: Option<String>,
}

impl SexChromosomes {
    pub fn new(x: impl Into<String>, y: Option<impl Into<String>>) -> Self {
        SexChromosomes {
            x: x.into(),
            y: y.map(Into::into),
        }
    }

    pub fn is_sex_chromosome(&self, chrom: &str) -> bool {
        chrom == self.x || self.y.as_deref() == Some(chrom)
    }
}

/// Iteration counts and seed for the resampling tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InferenceSettings {
    pub num_permutations: usize,
    pub num_bootstraps: usize,
    pub seed: Option<u64>,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        InferenceSettings {
            num_permutations: 10_000,
            num_bootstraps: 10_000,
            seed: None,
        }
    }
}

///
/// All tests run for one pair of chromosomes.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub first: String,
    pub second: String,
    pub size_first: usize,
    pub size_second: usize,
    pub mean_first: Option<f64>,
    pub mean_second: Option<f64>,
    pub outcome: ComparisonOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    Conclusive { tests: Vec<TestResult> },
    Inconclusive { reason: String },
}

impl Comparison {
    /// `<first>_<second>`, also used to name result files.
    pub fn name(&self) -> String {
        comparison_name(&self.first, &self.second)
    }

    pub fn is_conclusive(&self) -> bool {
        matches!(self.outcome, ComparisonOutcome::Conclusive { .. })
    }

    fn tests(&self) -> &[TestResult] {
        match &self.outcome {
            ComparisonOutcome::Conclusive { tests } => tests,
            ComparisonOutcome::Inconclusive { .. } => &[],
        }
    }

    pub fn permutation(&self) -> Option<&PermutationResult> {
        self.tests().iter().find_map(|t| match t {
            TestResult::Permutation(p) => Some(p),
            _ => None,
        })
    }

    pub fn ks(&self) -> Option<&KsResult> {
        self.tests().iter().find_map(|t| match t {
            TestResult::Ks(k) => Some(k),
            _ => None,
        })
    }

    pub fn bootstrap(&self) -> Option<&BootstrapResult> {
        self.tests().iter().find_map(|t| match t {
            TestResult::Bootstrap(b) => Some(b),
            _ => None,
        })
    }
}

pub fn comparison_name(first: &str, second: &str) -> String {
    format!("{}_{}", first, second)
}

///
/// Final answer on whether the second sex chromosome is present.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PloidyCall {
    pub y_present: bool,
    /// Comparisons keyed by [Comparison::name]. Empty when overridden.
    pub evidence: BTreeMap<String, Comparison>,
    pub overridden: bool,
}

impl PloidyCall {
    pub fn overridden(y_present: bool) -> Self {
        PloidyCall {
            y_present,
            evidence: BTreeMap::new(),
            overridden: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_sex_chromosomes() {
        let sex = SexChromosomes::new("chrX", Some("chrY"));
        assert!(sex.is_sex_chromosome("chrX"));
        assert!(sex.is_sex_chromosome("chrY"));
        assert!(!sex.is_sex_chromosome("chr19"));

        let no_y = SexChromosomes::new("chrX", None::<String>);
        assert!(!no_y.is_sex_chromosome("chrY"));
    }

    #[rstest]
    fn test_inconclusive_comparison_has_no_tests() {
        let comparison = Comparison {
            first: "chrX".to_string(),
            second: "chrY".to_string(),
            size_first: 10,
            size_second: 0,
            mean_first: Some(15.0),
            mean_second: None,
            outcome: ComparisonOutcome::Inconclusive {
                reason: "empty".to_string(),
            },
        };
        assert_eq!(comparison.name(), "chrX_chrY");
        assert!(!comparison.is_conclusive());
        assert!(comparison.permutation().is_none());
        assert!(comparison.ks().is_none());
        assert!(comparison.bootstrap().is_none());
    }
}
