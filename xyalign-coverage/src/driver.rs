//! Parallel scan-and-classify across chromosomes.
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use crate::classify::{ClassifiedWindows, ClassifyParams, classify};
use crate::errors::{CoverageError, Result};
use crate::read_balance::ReadBalanceSites;
use crate::scanner::{ScanParams, scan};
use crate::source::AlignmentSource;

///
/// Scan-and-classify result for one chromosome.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeCoverage {
    pub chrom: String,
    pub classified: ClassifiedWindows,
}

///
/// Scan and classify a single chromosome.
///
pub fn analyze_chromosome<S: AlignmentSource + ?Sized>(
    source: &mut S,
    chrom: &str,
    scan_params: &ScanParams,
    classify_params: &ClassifyParams,
    sites: Option<&ReadBalanceSites>,
) -> Result<ChromosomeCoverage> {
    let windows = scan(source, chrom, scan_params, sites)?.collect::<Result<Vec<_>>>()?;
    Ok(ChromosomeCoverage {
        chrom: chrom.to_string(),
        classified: classify(windows, classify_params),
    })
}

///
/// Run [analyze_chromosome] for every chromosome on a pool of `cpus` threads.
///
/// Each task opens its own alignment source through `open_source`, so
/// workers share nothing mutable. Results come back in the order of
/// `chroms`. The first failing chromosome fails the whole run.
///
/// # Arguments
/// - open_source: opens a fresh alignment source
/// - chroms: chromosomes to scan
/// - scan_params: window layout and read filter
/// - classify_params: pass/fail thresholds
/// - sites: optional read-balance evidence
/// - cpus: worker count
pub fn analyze_chromosomes<S, F>(
    open_source: F,
    chroms: &[String],
    scan_params: &ScanParams,
    classify_params: &ClassifyParams,
    sites: Option<&ReadBalanceSites>,
    cpus: usize,
) -> Result<Vec<ChromosomeCoverage>>
where
    S: AlignmentSource,
    F: Fn() -> Result<S> + Sync,
{
    scan_params.validate()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cpus.max(1))
        .build()
        .map_err(|e| CoverageError::Configuration(format!("Could not start thread pool: {}", e)))?;

    let bar = ProgressBar::new(chroms.len() as u64);
    if let Ok(style) =
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}/{len:3} {msg}")
    {
        bar.set_style(style.progress_chars("##-"));
    }

    let start = Instant::now();
    let results = pool.install(|| {
        chroms
            .par_iter()
            .map(|chrom| {
                let mut source = open_source()?;
                let result =
                    analyze_chromosome(&mut source, chrom, scan_params, classify_params, sites);
                bar.inc(1);
                result
            })
            .collect::<Result<Vec<ChromosomeCoverage>>>()
    });
    bar.finish_and_clear();

    info!(
        "Scanned {} chromosomes in {:.2?}",
        chroms.len(),
        start.elapsed()
    );

    results
}
