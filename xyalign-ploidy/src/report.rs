//! Writing comparison results and the final call to disk.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::Result;
use crate::models::{Comparison, ComparisonOutcome, PloidyCall};

fn create_writer(path: &Path) -> std::io::Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

fn write_summary_lines<W: Write>(writer: &mut W, comparison: &Comparison) -> std::io::Result<()> {
    let optional = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| "NA".to_string());

    writeln!(writer, "comparison\t{}", comparison.name())?;
    writeln!(writer, "first\t{}", comparison.first)?;
    writeln!(writer, "second\t{}", comparison.second)?;
    writeln!(writer, "size_first\t{}", comparison.size_first)?;
    writeln!(writer, "size_second\t{}", comparison.size_second)?;
    writeln!(writer, "mean_first\t{}", optional(comparison.mean_first))?;
    writeln!(writer, "mean_second\t{}", optional(comparison.mean_second))?;
    if let ComparisonOutcome::Inconclusive { reason } = &comparison.outcome {
        writeln!(writer, "status\tinconclusive")?;
        writeln!(writer, "reason\t{}", reason)?;
    }
    Ok(())
}

///
/// Write `<first>_<second>_permutation_results.txt`, `..._ks_results.txt` and
/// `..._bootstrap_results.txt` for one comparison into `dir`.
///
/// Each file is a list of `key<TAB>value` lines. An inconclusive comparison
/// still gets all three files, carrying the reason instead of statistics.
///
pub fn write_comparison_results<P: AsRef<Path>>(
    dir: P,
    comparison: &Comparison,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let name = comparison.name();
    let mut written = Vec::with_capacity(3);

    let path = dir.join(format!("{}_permutation_results.txt", name));
    let mut writer = create_writer(&path)?;
    write_summary_lines(&mut writer, comparison)?;
    if let Some(perm) = comparison.permutation() {
        let (q025, q50, q975) = perm.null_quantiles();
        writeln!(writer, "num_permutations\t{}", perm.null_distribution.len())?;
        writeln!(writer, "observed_diff\t{}", perm.observed_diff)?;
        writeln!(writer, "p_low\t{}", perm.p_low)?;
        writeln!(writer, "p_high\t{}", perm.p_high)?;
        writeln!(writer, "null_2.5\t{}", q025)?;
        writeln!(writer, "null_50\t{}", q50)?;
        writeln!(writer, "null_97.5\t{}", q975)?;
        writeln!(writer, "observed_ratio\t{}", perm.observed_ratio())?;
        writeln!(writer, "ratio_interval_low\t{}", perm.ratio_interval.0)?;
        writeln!(writer, "ratio_interval_high\t{}", perm.ratio_interval.1)?;
        writeln!(writer, "undefined_ratios\t{}", perm.undefined_ratios)?;
    }
    writer.flush()?;
    written.push(path);

    let path = dir.join(format!("{}_ks_results.txt", name));
    let mut writer = create_writer(&path)?;
    write_summary_lines(&mut writer, comparison)?;
    if let Some(ks) = comparison.ks() {
        writeln!(writer, "statistic\t{}", ks.statistic)?;
        writeln!(writer, "p_value\t{}", ks.p_value)?;
    }
    writer.flush()?;
    written.push(path);

    let path = dir.join(format!("{}_bootstrap_results.txt", name));
    let mut writer = create_writer(&path)?;
    write_summary_lines(&mut writer, comparison)?;
    if let Some(boot) = comparison.bootstrap() {
        writeln!(
            writer,
            "num_bootstraps\t{}",
            boot.replicates.len() + boot.undefined_replicates
        )?;
        writeln!(writer, "undefined_replicates\t{}", boot.undefined_replicates)?;
        writeln!(writer, "point_estimate\t{}", boot.point_estimate)?;
        writeln!(writer, "lower_ci\t{}", boot.lower_ci)?;
        writeln!(writer, "upper_ci\t{}", boot.upper_ci)?;
    }
    writer.flush()?;
    written.push(path);

    debug!("Wrote results for {} to {}", name, dir.display());
    Ok(written)
}

/// Write result files for every comparison in the call.
pub fn write_call_results<P: AsRef<Path>>(dir: P, call: &PloidyCall) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for comparison in call.evidence.values() {
        written.extend(write_comparison_results(dir.as_ref(), comparison)?);
    }
    Ok(written)
}

/// Serialize the full call, including null and replicate distributions, as JSON.
pub fn write_call_json<P: AsRef<Path>>(path: P, call: &PloidyCall) -> Result<()> {
    let mut writer = create_writer(path.as_ref())?;
    serde_json::to_writer_pretty(&mut writer, call)?;
    writer.flush()?;
    Ok(())
}
