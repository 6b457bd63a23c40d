//! Per-site allelic read balance taken from a variant call file.
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use log::{debug, info};

use xyalign_core::utils::get_dynamic_reader;

use crate::errors::{CoverageError, Result};

///
/// Read-balance values (`variant reads / total reads`) keyed by chromosome
/// and 0-based position.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadBalanceSites {
    sites: HashMap<String, Vec<(u64, f64)>>,
}

impl ReadBalanceSites {
    ///
    /// Load sites from a VCF (plain or gzipped) that carries `TR` (reads
    /// supporting the variant) and `TC` (total coverage) INFO fields.
    ///
    /// Records below `quality_cutoff`, records without a numeric QUAL, and
    /// records whose `TR`/`TC` are missing, multi-allelic or zero are skipped.
    ///
    /// # Arguments
    /// - path: path to the VCF
    /// - quality_cutoff: minimum QUAL for a site to be kept
    pub fn from_vcf<P: AsRef<Path>>(path: P, quality_cutoff: f64) -> Result<Self> {
        let reader = get_dynamic_reader(path.as_ref())?;

        let mut sites: HashMap<String, Vec<(u64, f64)>> = HashMap::new();
        let mut skipped = 0usize;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            match parse_vcf_line(&line, index + 1, quality_cutoff)? {
                Some((chrom, position, ratio)) => {
                    sites.entry(chrom).or_default().push((position, ratio))
                }
                None => skipped += 1,
            }
        }

        for chrom_sites in sites.values_mut() {
            chrom_sites.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let kept: usize = sites.values().map(Vec::len).sum();
        info!(
            "Loaded {} read balance sites from {} ({} records skipped)",
            kept,
            path.as_ref().display(),
            skipped
        );

        Ok(ReadBalanceSites { sites })
    }

    /// Add one site. Sites for a chromosome are kept sorted by position.
    pub fn insert(&mut self, chrom: impl Into<String>, position: u64, ratio: f64) {
        let chrom_sites = self.sites.entry(chrom.into()).or_default();
        let index = chrom_sites.partition_point(|(p, _)| *p <= position);
        chrom_sites.insert(index, (position, ratio));
    }

    pub fn len(&self) -> usize {
        self.sites.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    ///
    /// Mean read balance over the sites in `[start, end)` on `chrom`, or
    /// `None` when the interval holds no sites.
    ///
    pub fn mean_in(&self, chrom: &str, start: u64, end: u64) -> Option<f64> {
        let chrom_sites = self.sites.get(chrom)?;
        let lo = chrom_sites.partition_point(|(p, _)| *p < start);
        let hi = chrom_sites.partition_point(|(p, _)| *p < end);
        let inside = &chrom_sites[lo..hi];

        match inside.is_empty() {
            true => None,
            false => Some(inside.iter().map(|(_, r)| r).sum::<f64>() / inside.len() as f64),
        }
    }
}

fn parse_vcf_line(
    line: &str,
    line_number: usize,
    quality_cutoff: f64,
) -> Result<Option<(String, u64, f64)>> {
    let parse_error = |reason: &str| CoverageError::VariantParse {
        line: line_number,
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 8 {
        return Err(parse_error("expected at least 8 tab-separated columns"));
    }

    let position = fields[1]
        .parse::<u64>()
        .map_err(|_| parse_error("POS is not an integer"))?;
    if position == 0 {
        return Err(parse_error("POS must be 1-based"));
    }

    let Ok(quality) = fields[5].parse::<f64>() else {
        debug!("Skipping line {}: QUAL '{}' is not numeric", line_number, fields[5]);
        return Ok(None);
    };
    if quality < quality_cutoff {
        return Ok(None);
    }

    let mut variant_reads = None;
    let mut total_reads = None;
    for entry in fields[7].split(';') {
        match entry.split_once('=') {
            Some(("TR", value)) => variant_reads = Some(value),
            Some(("TC", value)) => total_reads = Some(value),
            _ => {}
        }
    }

    let (Some(tr), Some(tc)) = (variant_reads, total_reads) else {
        return Ok(None);
    };
    if tr.contains(',') || tc.contains(',') {
        return Ok(None);
    }

    let tr = tr
        .parse::<f64>()
        .map_err(|_| parse_error("TR is not numeric"))?;
    let tc = tc
        .parse::<f64>()
        .map_err(|_| parse_error("TC is not numeric"))?;
    if tr == 0.0 || tc == 0.0 {
        return Ok(None);
    }

    Ok(Some((fields[0].to_string(), position - 1, tr / tc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn vcf_contents() -> &'static str {
        concat!(
            "##fileformat=VCFv4.1\n",
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n",
            "chrX\t101\t.\tA\tG\t50\tPASS\tTC=20;TR=10\n",
            "chrX\t51\t.\tC\tT\t60\tPASS\tTR=5;TC=20\n",
            "chrX\t201\t.\tC\tT\t5\tPASS\tTR=5;TC=20\n",
            "chrX\t301\t.\tC\tT,G\t60\tPASS\tTR=5,3;TC=20\n",
            "chrX\t401\t.\tC\tT\t60\tPASS\tTR=0;TC=20\n",
            "chr19\t11\t.\tC\tT\t.\tPASS\tTR=5;TC=10\n",
            "chr19\t21\t.\tC\tT\t99\tPASS\tTR=9;TC=10\n",
        )
    }

    #[rstest]
    fn test_from_vcf(vcf_contents: &str) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("calls.vcf");
        std::fs::write(&path, vcf_contents).unwrap();

        let sites = ReadBalanceSites::from_vcf(&path, 20.0).unwrap();
        assert_eq!(sites.len(), 3);
        assert_eq!(sites.mean_in("chrX", 0, 100), Some(0.25));
        assert_eq!(sites.mean_in("chrX", 0, 101), Some(0.375));
        assert_eq!(sites.mean_in("chrX", 101, 1000), None);
        assert_eq!(sites.mean_in("chr19", 0, 100), Some(0.9));
        assert_eq!(sites.mean_in("chrY", 0, 100), None);
    }

    #[rstest]
    fn test_from_vcf_rejects_bad_position() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("bad.vcf");
        std::fs::write(&path, "chrX\tabc\t.\tA\tG\t50\tPASS\tTR=1;TC=2\n").unwrap();

        assert!(matches!(
            ReadBalanceSites::from_vcf(&path, 20.0),
            Err(CoverageError::VariantParse { line: 1, .. })
        ));
    }

    #[rstest]
    fn test_insert_keeps_order() {
        let mut sites = ReadBalanceSites::default();
        sites.insert("chr1", 50, 1.0);
        sites.insert("chr1", 10, 0.0);
        assert_eq!(sites.mean_in("chr1", 0, 20), Some(0.0));
        assert_eq!(sites.mean_in("chr1", 0, 60), Some(0.5));
    }
}
