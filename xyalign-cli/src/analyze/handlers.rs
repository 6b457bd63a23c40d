use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{info, warn};

use xyalign_core::RegionSet;
use xyalign_coverage::{
    AlignmentSource, BamAlignmentSource, ChromosomeCoverage, ClassifiedRegions, CoverageError,
    ReadBalanceSites, ScanParams, analyze_chromosomes, write_window_table,
};
use xyalign_ploidy::{PloidyCall, PloidyDecisionMaker, write_call_json, write_call_results};
use xyalign_stats::DepthSample;

use crate::config::AnalysisConfig;

/// Where `analyze` puts its files, relative to the output directory.
pub struct OutputLayout {
    pub root: PathBuf,
    pub sample_id: String,
}

impl OutputLayout {
    pub fn new(config: &AnalysisConfig) -> Self {
        OutputLayout {
            root: config.output_dir.clone(),
            sample_id: config.sample_id.clone(),
        }
    }

    pub fn high_quality_bed(&self) -> PathBuf {
        self.root
            .join("bed")
            .join(format!("{}_highquality.bed", self.sample_id))
    }

    pub fn low_quality_bed(&self) -> PathBuf {
        self.root
            .join("bed")
            .join(format!("{}_lowquality.bed", self.sample_id))
    }

    pub fn window_table(&self, chrom: &str) -> PathBuf {
        self.root
            .join("windows")
            .join(format!("{}_{}_windows.tsv", self.sample_id, chrom))
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root.join("results")
    }

    pub fn ploidy_json(&self) -> PathBuf {
        self.results_dir()
            .join(format!("{}_ploidy.json", self.sample_id))
    }
}

pub fn run_analyze(matches: &ArgMatches) -> Result<()> {
    let config = AnalysisConfig::from_matches(matches).context("Failed to build configuration")?;
    let bam = config
        .bam
        .clone()
        .context("No BAM file given: pass --bam or set `bam` in the config file")?;

    // fail on a bad BAM before spawning any workers
    BamAlignmentSource::open(&bam).with_context(|| format!("Failed to open {}", bam.display()))?;

    run_pipeline(&config, || BamAlignmentSource::open(&bam))?;
    Ok(())
}

///
/// Scan, classify, write windows and bed files, then make and write the Y call.
///
/// # Arguments
/// - config: validated analysis configuration
/// - open_source: opens one alignment source per worker
pub fn run_pipeline<S, F>(config: &AnalysisConfig, open_source: F) -> Result<PloidyCall>
where
    S: AlignmentSource,
    F: Fn() -> Result<S, CoverageError> + Sync,
{
    let start = Instant::now();
    info!("Analyzing sample '{}'", config.sample_id);
    info!("Chromosomes: {}", config.chromosomes.join(", "));
    info!(
        "Window size: {:?}, target bed: {:?}, mapq cutoff: {}, depth filter: {}, cpus: {}",
        config.window_size,
        config.target_bed,
        config.mapq_cutoff,
        config.depth_filter,
        config.cpus
    );

    let layout = OutputLayout::new(config);
    let scan_params = build_scan_params(config)?;
    let sites = match &config.vcf {
        Some(vcf) => Some(
            ReadBalanceSites::from_vcf(vcf, config.variant_quality_cutoff)
                .with_context(|| format!("Failed to read variants from {}", vcf.display()))?,
        ),
        None => None,
    };

    let coverage = analyze_chromosomes(
        open_source,
        &config.chromosomes,
        &scan_params,
        &config.classify_params(),
        sites.as_ref(),
        config.cpus,
    )
    .context("Coverage scan failed")?;
    info!("Coverage scan finished in {:.2?}", start.elapsed());

    write_coverage_outputs(&layout, &coverage)?;

    let call = make_call(config, &coverage)?;
    let results_dir = layout.results_dir();
    write_call_results(&results_dir, &call)
        .with_context(|| format!("Failed to write results to {}", results_dir.display()))?;
    write_call_json(layout.ploidy_json(), &call).context("Failed to write ploidy call")?;

    info!(
        "Y chromosome {} ({}); finished in {:.2?}",
        if call.y_present { "present" } else { "absent" },
        if call.overridden { "override" } else { "inferred" },
        start.elapsed()
    );

    Ok(call)
}

fn build_scan_params(config: &AnalysisConfig) -> Result<ScanParams> {
    let params = match (&config.target_bed, config.window_size) {
        (Some(bed), _) => {
            let targets = RegionSet::try_from(bed.as_path())
                .with_context(|| format!("Failed to load target intervals from {}", bed.display()))?;
            ScanParams::targeted(targets)
        }
        (None, Some(size)) => ScanParams::fixed(size),
        (None, None) => ScanParams::default(),
    };
    let params = params.with_filter(config.read_filter());
    params.validate()?;
    Ok(params)
}

fn write_coverage_outputs(layout: &OutputLayout, coverage: &[ChromosomeCoverage]) -> Result<()> {
    for chrom in coverage {
        let path = layout.window_table(&chrom.chrom);
        write_window_table(&path, chrom.classified.windows())
            .with_context(|| format!("Failed to write {}", path.display()))?;

        if chrom.classified.passing().next().is_none() {
            warn!("No high-quality windows on {}", chrom.chrom);
        }
    }

    let per_chrom: Vec<ClassifiedRegions> = coverage.iter().map(|c| c.classified.regions()).collect();
    let regions = ClassifiedRegions::combine(&per_chrom);
    info!(
        "High-quality regions: {} intervals, {} bp; low-quality: {} intervals, {} bp",
        regions.passing.len(),
        regions.passing.nucleotides_length(),
        regions.failing.len(),
        regions.failing.nucleotides_length()
    );

    write_bed(&regions.passing, &layout.high_quality_bed())?;
    write_bed(&regions.failing, &layout.low_quality_bed())?;
    Ok(())
}

fn write_bed(regions: &RegionSet, path: &Path) -> Result<()> {
    regions
        .to_bed(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn make_call(config: &AnalysisConfig, coverage: &[ChromosomeCoverage]) -> Result<PloidyCall> {
    let mut maker = PloidyDecisionMaker::new(config.sex_chromosomes(), config.inference_settings());

    if let Some(present) = config.presence_override() {
        return Ok(maker.override_presence(present)?.clone());
    }

    let samples: BTreeMap<String, DepthSample> = coverage
        .iter()
        .map(|c| {
            let sample = DepthSample::new(c.chrom.as_str(), c.classified.passing_depths());
            (c.chrom.clone(), sample)
        })
        .collect();

    let start = Instant::now();
    let call = maker.decide(&samples)?.clone();
    info!(
        "Ran {} comparisons in {:.2?}",
        call.evidence.len(),
        start.elapsed()
    );
    Ok(call)
}
