use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use xyalign_core::RegionSet;
use xyalign_core::utils::merge_bed_files;

pub fn run_merge(matches: &ArgMatches) -> Result<()> {
    let beds: Vec<&String> = matches
        .get_many::<String>("beds")
        .context("At least one BED file is required")?
        .collect();

    let merged = merge_bed_files(&beds).context("Failed to merge BED files")?;
    info!("Merged {} files into {} intervals", beds.len(), merged.len());

    write_output(&merged, matches.get_one::<String>("output"))
}

pub(crate) fn write_output(rs: &RegionSet, output: Option<&String>) -> Result<()> {
    match output {
        Some(path) => rs
            .to_bed(path)
            .with_context(|| format!("Failed to write {}", path)),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            for region in &rs.regions {
                writeln!(handle, "{}", region.as_string())?;
            }
            Ok(())
        }
    }
}
