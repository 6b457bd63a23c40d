use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::ArgMatches;

use xyalign_core::utils::{chromosome_regions, get_chrom_sizes};
use xyalign_coverage::BamAlignmentSource;

use crate::merge::handlers::write_output;

pub fn run_chrom_bed(matches: &ArgMatches) -> Result<()> {
    let lengths: HashMap<String, u64> = match (
        matches.get_one::<String>("bam"),
        matches.get_one::<String>("chrom-sizes"),
    ) {
        (Some(bam), _) => BamAlignmentSource::open(bam)
            .with_context(|| format!("Failed to open {}", bam))?
            .chromosome_lengths()
            .clone(),
        (None, Some(sizes)) => {
            get_chrom_sizes(sizes).with_context(|| format!("Failed to read {}", sizes))?
        }
        (None, None) => anyhow::bail!("Either --bam or --chrom-sizes is required"),
    };

    let chromosomes: Vec<String> = matches
        .get_many::<String>("chromosomes")
        .context("--chromosomes is required")?
        .cloned()
        .collect();

    let regions = chromosome_regions(&lengths, &chromosomes)?;
    write_output(&regions, matches.get_one::<String>("output"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use xyalign_core::{Region, RegionSet};

    use crate::chrom_bed::cli::create_chrom_bed_cli;

    #[rstest]
    fn test_chrom_bed_from_sizes() {
        let tempdir = tempfile::tempdir().unwrap();
        let sizes = tempdir.path().join("hg38.chrom.sizes");
        let out = tempdir.path().join("sex_chroms.bed");
        std::fs::write(&sizes, "chr1\t248956422\nchrX\t156040895\nchrY\t57227415\n").unwrap();

        let matches = create_chrom_bed_cli().get_matches_from([
            "chrom-bed",
            "--chrom-sizes",
            sizes.to_str().unwrap(),
            "--chromosomes",
            "chrY",
            "chrX",
            "--output",
            out.to_str().unwrap(),
        ]);
        run_chrom_bed(&matches).unwrap();

        let rs = RegionSet::try_from(out.as_path()).unwrap();
        assert_eq!(
            rs.regions,
            vec![
                Region::new("chrX", 0, 156040895),
                Region::new("chrY", 0, 57227415),
            ]
        );
    }

    #[rstest]
    fn test_chrom_bed_unknown_chromosome() {
        let tempdir = tempfile::tempdir().unwrap();
        let sizes = tempdir.path().join("tiny.sizes");
        std::fs::write(&sizes, "chr1\t100\n").unwrap();

        let matches = create_chrom_bed_cli().get_matches_from([
            "chrom-bed",
            "--chrom-sizes",
            sizes.to_str().unwrap(),
            "--chromosomes",
            "chrX",
        ]);
        assert!(run_chrom_bed(&matches).is_err());
    }
}
