//! The Y-presence decision.
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use log::{info, warn};

use xyalign_stats::{DepthSample, Resampler, StatsError, TestResult, ks_2samp};

use crate::errors::{PloidyError, Result};
use crate::models::{
    Comparison, ComparisonOutcome, InferenceSettings, PloidyCall, SexChromosomes,
};

#[derive(Debug, Clone, PartialEq)]
pub enum DecisionState {
    AwaitingEvidence,
    Overridden(PloidyCall),
    Decided(PloidyCall),
}

///
/// Resolve the two presence flags into an optional override.
///
/// Setting both is a configuration error.
///
pub fn resolve_override(y_present: bool, y_absent: bool) -> Result<Option<bool>> {
    match (y_present, y_absent) {
        (true, true) => Err(PloidyError::Configuration(
            "y_present and y_absent are mutually exclusive".to_string(),
        )),
        (true, false) => Ok(Some(true)),
        (false, true) => Ok(Some(false)),
        (false, false) => Ok(None),
    }
}

///
/// Chromosome pairs to compare: every autosome against X, every autosome
/// against Y, then X against Y. Without a Y only the autosome x X pairs are
/// planned.
///
pub fn plan_comparisons(autosomes: &[String], sex: &SexChromosomes) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = autosomes
        .iter()
        .map(|a| (a.clone(), sex.x.clone()))
        .collect();

    if let Some(y) = &sex.y {
        pairs.extend(autosomes.iter().map(|a| (a.clone(), y.clone())));
        pairs.push((sex.x.clone(), y.clone()));
    }

    pairs
}

///
/// Decides whether the Y chromosome is present, once per run.
///
/// Starts in [DecisionState::AwaitingEvidence] and moves to either
/// [DecisionState::Overridden] (caller supplied the answer) or
/// [DecisionState::Decided] (statistics were run). Both are terminal.
///
/// The call is made from the X x Y permutation test alone: Y is present when
/// the 95% interval of permuted depth ratios, relative to the observed ratio,
/// contains 1.0. This is a simple heuristic and should be treated as
/// advisory. KS and bootstrap results are reported next to it.
///
pub struct PloidyDecisionMaker {
    sex: SexChromosomes,
    settings: InferenceSettings,
    cancel: Option<Arc<AtomicBool>>,
    state: DecisionState,
}

impl PloidyDecisionMaker {
    pub fn new(sex: SexChromosomes, settings: InferenceSettings) -> Self {
        PloidyDecisionMaker {
            sex,
            settings,
            cancel: None,
            state: DecisionState::AwaitingEvidence,
        }
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn state(&self) -> &DecisionState {
        &self.state
    }

    /// The call, once one has been made.
    pub fn call(&self) -> Option<&PloidyCall> {
        match &self.state {
            DecisionState::AwaitingEvidence => None,
            DecisionState::Overridden(call) | DecisionState::Decided(call) => Some(call),
        }
    }

    fn ensure_awaiting(&self) -> Result<()> {
        match self.state {
            DecisionState::AwaitingEvidence => Ok(()),
            _ => Err(PloidyError::AlreadyDecided),
        }
    }

    /// Skip the statistics and record the caller's answer.
    pub fn override_presence(&mut self, y_present: bool) -> Result<&PloidyCall> {
        self.ensure_awaiting()?;
        info!("Y presence set by override: {}", y_present);

        self.state = DecisionState::Overridden(PloidyCall::overridden(y_present));
        self.call().ok_or(PloidyError::AlreadyDecided)
    }

    ///
    /// Run every planned comparison and make the call.
    ///
    /// `samples` maps chromosome names to their passing-window depths;
    /// autosomes are all keys other than X and Y. A comparison whose samples
    /// are empty or have zero mean is recorded as inconclusive and the rest
    /// continue. An inconclusive X x Y comparison means Y is called absent.
    ///
    pub fn decide(&mut self, samples: &BTreeMap<String, DepthSample>) -> Result<&PloidyCall> {
        self.ensure_awaiting()?;

        let autosomes: Vec<String> = samples
            .keys()
            .filter(|c| !self.sex.is_sex_chromosome(c))
            .cloned()
            .collect();

        let mut resampler = Resampler::new(self.settings.seed);
        if let Some(flag) = &self.cancel {
            resampler = resampler.with_cancel_flag(flag.clone());
        }

        let mut evidence = BTreeMap::new();
        for (first, second) in plan_comparisons(&autosomes, &self.sex) {
            let a = sample_or_empty(samples, &first);
            let b = sample_or_empty(samples, &second);
            let comparison = compare(&a, &b, &self.settings, &mut resampler)?;
            evidence.insert(comparison.name(), comparison);
        }

        let y_present = match &self.sex.y {
            None => false,
            Some(y) => {
                let name = crate::models::comparison_name(&self.sex.x, y);
                match evidence.get(&name).and_then(Comparison::permutation) {
                    Some(perm) => perm.straddles_unit_ratio(),
                    None => {
                        warn!("{} comparison is inconclusive; calling Y absent", name);
                        false
                    }
                }
            }
        };
        info!("Y chromosome present: {}", y_present);

        self.state = DecisionState::Decided(PloidyCall {
            y_present,
            evidence,
            overridden: false,
        });
        self.call().ok_or(PloidyError::AlreadyDecided)
    }
}

fn sample_or_empty(samples: &BTreeMap<String, DepthSample>, chrom: &str) -> DepthSample {
    samples
        .get(chrom)
        .cloned()
        .unwrap_or_else(|| DepthSample::new(chrom, vec![]))
}

///
/// Permutation, KS and bootstrap tests for one pair. Degenerate samples give
/// an inconclusive comparison; any other failure is returned.
///
pub fn compare(
    a: &DepthSample,
    b: &DepthSample,
    settings: &InferenceSettings,
    resampler: &mut Resampler,
) -> Result<Comparison> {
    let run = |resampler: &mut Resampler| -> std::result::Result<Vec<TestResult>, StatsError> {
        Ok(vec![
            resampler
                .permutation_test(a, b, settings.num_permutations)?
                .into(),
            ks_2samp(a, b)?.into(),
            resampler
                .bootstrap_ratio(a, b, settings.num_bootstraps)?
                .into(),
        ])
    };

    let outcome = match run(resampler) {
        Ok(tests) => ComparisonOutcome::Conclusive { tests },
        Err(e @ StatsError::DegenerateInput { .. }) => {
            warn!("{} vs {} is inconclusive: {}", a.name(), b.name(), e);
            ComparisonOutcome::Inconclusive {
                reason: e.to_string(),
            }
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Comparison {
        first: a.name().to_string(),
        second: b.name().to_string(),
        size_first: a.len(),
        size_second: b.len(),
        mean_first: a.mean(),
        mean_second: b.mean(),
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn depths(base: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| base + (i % 5) as f64 * 0.2).collect()
    }

    fn samples(entries: &[(&str, Vec<f64>)]) -> BTreeMap<String, DepthSample> {
        entries
            .iter()
            .map(|(name, values)| (name.to_string(), DepthSample::new(*name, values.clone())))
            .collect()
    }

    #[fixture]
    fn settings() -> InferenceSettings {
        InferenceSettings {
            num_permutations: 500,
            num_bootstraps: 500,
            seed: Some(17),
        }
    }

    #[rstest]
    #[case(false, false, None)]
    #[case(true, false, Some(true))]
    #[case(false, true, Some(false))]
    fn test_resolve_override(#[case] present: bool, #[case] absent: bool, #[case] expected: Option<bool>) {
        assert_eq!(resolve_override(present, absent).unwrap(), expected);
    }

    #[rstest]
    fn test_resolve_override_conflict() {
        assert!(matches!(
            resolve_override(true, true),
            Err(PloidyError::Configuration(_))
        ));
    }

    #[rstest]
    fn test_plan_comparisons() {
        let autosomes = vec!["chr19".to_string(), "chr20".to_string()];
        let with_y = plan_comparisons(&autosomes, &SexChromosomes::new("chrX", Some("chrY")));
        let names: Vec<String> = with_y.iter().map(|(a, b)| format!("{}_{}", a, b)).collect();
        assert_eq!(
            names,
            vec!["chr19_chrX", "chr20_chrX", "chr19_chrY", "chr20_chrY", "chrX_chrY"]
        );

        let without_y = plan_comparisons(&autosomes, &SexChromosomes::new("chrX", None::<String>));
        assert_eq!(without_y.len(), 2);
    }

    #[rstest]
    fn test_override_is_terminal(settings: InferenceSettings) {
        let mut maker = PloidyDecisionMaker::new(SexChromosomes::new("chrX", Some("chrY")), settings);
        let call = maker.override_presence(true).unwrap().clone();
        assert!(call.y_present && call.overridden);
        assert!(call.evidence.is_empty());

        assert!(matches!(maker.override_presence(false), Err(PloidyError::AlreadyDecided)));
        assert!(matches!(maker.decide(&BTreeMap::new()), Err(PloidyError::AlreadyDecided)));
        assert_eq!(maker.state(), &DecisionState::Overridden(call));
    }

    #[rstest]
    fn test_equal_x_and_y_depth_calls_y_present(settings: InferenceSettings) {
        // one X and one Y copy: X and Y depths match
        let mut maker = PloidyDecisionMaker::new(SexChromosomes::new("chrX", Some("chrY")), settings);
        let input = samples(&[
            ("chr19", depths(30.0, 60)),
            ("chrX", depths(15.0, 60)),
            ("chrY", depths(15.0, 60)),
        ]);

        let call = maker.decide(&input).unwrap();
        assert!(call.y_present);
        assert!(!call.overridden);
        assert_eq!(
            call.evidence.keys().collect::<Vec<_>>(),
            vec!["chr19_chrX", "chr19_chrY", "chrX_chrY"]
        );
        assert!(call.evidence.values().all(Comparison::is_conclusive));
        assert!(matches!(maker.state(), DecisionState::Decided(_)));
    }

    #[rstest]
    fn test_empty_y_is_inconclusive_and_absent(settings: InferenceSettings) {
        let mut maker = PloidyDecisionMaker::new(SexChromosomes::new("chrX", Some("chrY")), settings);
        let input = samples(&[("chr19", depths(30.0, 60)), ("chrX", depths(30.0, 60))]);

        let call = maker.decide(&input).unwrap();
        assert!(!call.y_present);
        assert!(call.evidence["chr19_chrX"].is_conclusive());
        assert!(!call.evidence["chr19_chrY"].is_conclusive());
        assert!(!call.evidence["chrX_chrY"].is_conclusive());
    }

    #[rstest]
    fn test_without_y_only_autosome_x(settings: InferenceSettings) {
        let mut maker = PloidyDecisionMaker::new(SexChromosomes::new("chrX", None::<String>), settings);
        let input = samples(&[("chr19", depths(30.0, 40)), ("chrX", depths(15.0, 40))]);

        let call = maker.decide(&input).unwrap();
        assert!(!call.y_present);
        assert_eq!(call.evidence.len(), 1);
        let perm = call.evidence["chr19_chrX"].permutation().unwrap();
        assert!(perm.observed_diff > 0.0);
    }

    #[rstest]
    fn test_cancellation_aborts_decision(settings: InferenceSettings) {
        let flag = Arc::new(AtomicBool::new(true));
        let mut maker = PloidyDecisionMaker::new(SexChromosomes::new("chrX", None::<String>), settings)
            .with_cancel_flag(flag);
        let input = samples(&[("chr19", depths(30.0, 10)), ("chrX", depths(15.0, 10))]);

        assert!(matches!(
            maker.decide(&input),
            Err(PloidyError::Stats(StatsError::Cancelled { .. }))
        ));
        assert_eq!(maker.state(), &DecisionState::AwaitingEvidence);
    }
}
