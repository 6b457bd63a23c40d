use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use rstest::*;

use xyalign_ploidy::{
    InferenceSettings, PloidyDecisionMaker, SexChromosomes, resolve_override, write_call_json,
    write_call_results,
};
use xyalign_stats::DepthSample;

fn depth_sample(name: &str, base: f64, n: usize) -> DepthSample {
    DepthSample::new(name, (0..n).map(|i| base + ((i * 7) % 11) as f64 * 0.1).collect())
}

#[fixture]
fn settings() -> InferenceSettings {
    InferenceSettings {
        num_permutations: 1000,
        num_bootstraps: 1000,
        seed: Some(2018),
    }
}

#[fixture]
fn sex() -> SexChromosomes {
    SexChromosomes::new("chrX", Some("chrY"))
}

fn run(samples: Vec<DepthSample>, sex: SexChromosomes, settings: InferenceSettings) -> bool {
    let samples: BTreeMap<String, DepthSample> = samples
        .into_iter()
        .map(|s| (s.name().to_string(), s))
        .collect();
    let mut maker = PloidyDecisionMaker::new(sex, settings);
    maker.decide(&samples).unwrap().y_present
}

#[rstest]
fn test_xy_like_sample_has_y(sex: SexChromosomes, settings: InferenceSettings) {
    let samples = vec![
        depth_sample("chr19", 30.0, 100),
        depth_sample("chr20", 30.0, 100),
        depth_sample("chrX", 15.0, 100),
        depth_sample("chrY", 15.0, 100),
    ];
    assert!(run(samples, sex, settings));
}

#[rstest]
fn test_xx_like_sample_lacks_y(sex: SexChromosomes, settings: InferenceSettings) {
    // residual mismapped reads on Y at a fraction of X depth
    let samples = vec![
        depth_sample("chr19", 30.0, 100),
        depth_sample("chrX", 30.0, 100),
        depth_sample("chrY", 2.0, 100),
    ];
    assert!(!run(samples, sex, settings));
}

#[rstest]
fn test_same_seed_same_call(sex: SexChromosomes, settings: InferenceSettings) {
    let samples: BTreeMap<String, DepthSample> = [
        depth_sample("chr19", 30.0, 50),
        depth_sample("chrX", 15.0, 50),
        depth_sample("chrY", 14.0, 50),
    ]
    .into_iter()
    .map(|s| (s.name().to_string(), s))
    .collect();

    let mut first = PloidyDecisionMaker::new(sex.clone(), settings);
    let mut second = PloidyDecisionMaker::new(sex, settings);
    assert_eq!(
        first.decide(&samples).unwrap(),
        second.decide(&samples).unwrap()
    );
}

#[rstest]
fn test_override_then_write(sex: SexChromosomes, settings: InferenceSettings) {
    let y_present = resolve_override(false, true).unwrap().unwrap();
    let mut maker = PloidyDecisionMaker::new(sex, settings);
    let call = maker.override_presence(y_present).unwrap();

    let tempdir = tempfile::tempdir().unwrap();
    let results = tempdir.path().join("results");
    assert!(write_call_results(&results, call).unwrap().is_empty());

    let json = results.join("sample_ploidy.json");
    write_call_json(&json, call).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(value["overridden"], serde_json::json!(true));
    assert_eq!(value["y_present"], serde_json::json!(false));
}
