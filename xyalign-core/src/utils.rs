use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::{RegionSetError, Result};
use crate::models::{Region, RegionSet};
use crate::ranges::IntervalRanges;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)
        .map_err(|e| RegionSetError::FileReadError(format!("{}: {}", path.display(), e)))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Is this a BED header/comment line rather than a region?
pub fn is_bed_header(line: &str) -> bool {
    line.starts_with("browser") || line.starts_with("track") || line.starts_with('#')
}

///
/// Parse one BED line into a [Region]. Columns past the third are ignored.
///
/// Returns `Ok(None)` for blank lines and header lines.
///
pub fn parse_bed_line(line: &str) -> Result<Option<Region>> {
    let trimmed = line.trim_end();
    if trimmed.is_empty() || is_bed_header(trimmed) {
        return Ok(None);
    }

    let mut fields = trimmed.split('\t');
    let chr = fields
        .next()
        .ok_or_else(|| RegionSetError::RegionParseError(trimmed.to_string()))?;
    let start = fields
        .next()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .ok_or_else(|| {
            RegionSetError::RegionParseError(format!("Error in parsing start position: {}", trimmed))
        })?;
    let end = fields
        .next()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .ok_or_else(|| {
            RegionSetError::RegionParseError(format!("Error in parsing end position: {}", trimmed))
        })?;

    if end <= start {
        return Err(RegionSetError::InvalidRegion {
            chr: chr.to_string(),
            start,
            end,
        });
    }

    Ok(Some(Region::new(chr, start, end)))
}

///
/// Read a two-column `chrom<TAB>length` sizes file.
///
pub fn get_chrom_sizes<T: AsRef<Path>>(path: T) -> Result<HashMap<String, u64>> {
    let reader = get_dynamic_reader(path.as_ref())?;
    let mut chrom_sizes: HashMap<String, u64> = HashMap::new();

    for line in reader.lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let (Some(chrom), Some(size)) = (parts.next(), parts.next()) else {
            continue;
        };
        let size = size.parse::<u64>().map_err(|_| {
            RegionSetError::RegionParseError(format!("Invalid chromosome size line: {}", line))
        })?;
        chrom_sizes.insert(chrom.to_string(), size);
    }

    Ok(chrom_sizes)
}

///
/// Build a region set with one `chrom 0 length` interval per requested chromosome.
///
/// Chromosomes missing from `chrom_sizes` are reported as an error, since a
/// silently dropped chromosome would change every downstream comparison.
///
pub fn chromosome_regions(
    chrom_sizes: &HashMap<String, u64>,
    chromosomes: &[String],
) -> Result<RegionSet> {
    let mut regions = Vec::with_capacity(chromosomes.len());
    for chrom in chromosomes {
        let length = chrom_sizes.get(chrom).ok_or_else(|| {
            RegionSetError::RegionParseError(format!(
                "Chromosome '{}' has no known length",
                chrom
            ))
        })?;
        regions.push(Region::new(chrom.as_str(), 0, *length));
    }

    let mut rs = RegionSet::from(regions);
    rs.sort();
    Ok(rs)
}

///
/// Concatenate any number of BED files and merge the result.
///
/// # Arguments
/// - paths: BED (or BED.gz) files to combine
pub fn merge_bed_files<P: AsRef<Path>>(paths: &[P]) -> Result<RegionSet> {
    let mut sets = Vec::with_capacity(paths.len());
    for path in paths {
        sets.push(RegionSet::try_from(path.as_ref())?);
    }
    Ok(RegionSet::concat(&sets).merge())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;

    #[rstest]
    fn test_parse_bed_line_ignores_extra_columns() {
        let region = parse_bed_line("chr1\t5\t10\tname\t0\t+").unwrap().unwrap();
        assert_eq!(region, Region::new("chr1", 5, 10));
    }

    #[rstest]
    #[case("")]
    #[case("# comment")]
    #[case("track name=foo")]
    #[case("browser position chr1:1-100")]
    fn test_parse_bed_line_skips_headers(#[case] line: &str) {
        assert!(parse_bed_line(line).unwrap().is_none());
    }

    #[rstest]
    #[case("chr1\tfoo\t10")]
    #[case("chr1\t5")]
    #[case("chr1\t10\t10")]
    fn test_parse_bed_line_rejects_bad_lines(#[case] line: &str) {
        assert!(parse_bed_line(line).is_err());
    }

    #[rstest]
    fn test_chrom_sizes_and_chromosome_regions() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("genome.sizes");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "chrY\t57227415").unwrap();
        writeln!(file, "chrX\t156040895").unwrap();
        writeln!(file, "chr19\t58617616").unwrap();

        let sizes = get_chrom_sizes(&path).unwrap();
        assert_eq!(sizes.len(), 3);

        let rs = chromosome_regions(&sizes, &["chrX".to_string(), "chr19".to_string()]).unwrap();
        assert_eq!(rs.regions[0], Region::new("chr19", 0, 58617616));
        assert_eq!(rs.regions[1], Region::new("chrX", 0, 156040895));
    }

    #[rstest]
    fn test_chromosome_regions_unknown_chrom() {
        let sizes: HashMap<String, u64> = [("chr1".to_string(), 100)].into_iter().collect();
        assert!(chromosome_regions(&sizes, &["chr2".to_string()]).is_err());
    }

    #[rstest]
    fn test_merge_bed_files() {
        let tempdir = tempfile::tempdir().unwrap();
        let first = tempdir.path().join("a.bed");
        let second = tempdir.path().join("b.bed");
        std::fs::write(&first, "chr1\t0\t10\nchr1\t40\t50\n").unwrap();
        std::fs::write(&second, "chr1\t10\t20\nchr2\t0\t5\n").unwrap();

        let merged = merge_bed_files(&[first, second]).unwrap();
        assert_eq!(
            merged.regions,
            vec![
                Region::new("chr1", 0, 20),
                Region::new("chr1", 40, 50),
                Region::new("chr2", 0, 5),
            ]
        );
    }
}
