use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fmt::{self, Display};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::errors::{RegionSetError, Result};
use crate::models::Region;
use crate::utils::{get_dynamic_reader, is_bed_header, parse_bed_line};

///
/// RegionSet struct, the representation of an interval file such as a bed file.
///
/// After [crate::ranges::IntervalRanges::merge] the regions are sorted by
/// `(chr, start)` and pairwise non-overlapping and non-adjacent.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    pub header: Option<String>,
    pub path: Option<PathBuf>,
}

impl TryFrom<&Path> for RegionSet {
    type Error = RegionSetError;

    ///
    /// Create a new [RegionSet] from a bed file.
    ///
    /// An empty file yields an empty set; an empty interval set is a valid
    /// outcome of classification and must survive a write/read cycle.
    ///
    /// # Arguments:
    /// - value: path to bed file on disk.
    fn try_from(value: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(value)?;

        let mut regions: Vec<Region> = Vec::new();
        let mut header = String::new();

        for line in reader.lines() {
            let line = line?;
            if is_bed_header(&line) {
                header.push_str(&line);
                continue;
            }
            if let Some(region) = parse_bed_line(&line)? {
                regions.push(region);
            }
        }

        let mut rs = RegionSet {
            regions,
            header: match header.is_empty() {
                true => None,
                false => Some(header),
            },
            path: Some(value.to_owned()),
        };
        rs.sort();

        Ok(rs)
    }
}

impl TryFrom<&str> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: &str) -> Result<Self> {
        RegionSet::try_from(Path::new(value))
    }
}

impl TryFrom<PathBuf> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: PathBuf) -> Result<Self> {
        RegionSet::try_from(value.as_path())
    }
}

impl From<Vec<Region>> for RegionSet {
    fn from(regions: Vec<Region>) -> Self {
        RegionSet {
            regions,
            header: None,
            path: None,
        }
    }
}

impl FromIterator<Region> for RegionSet {
    fn from_iter<T: IntoIterator<Item = Region>>(iter: T) -> Self {
        RegionSet::from(iter.into_iter().collect::<Vec<Region>>())
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

impl RegionSet {
    ///
    /// Concatenate several region sets into one, keeping input order.
    /// Nothing is sorted or merged here.
    ///
    pub fn concat<'a>(sets: impl IntoIterator<Item = &'a RegionSet>) -> RegionSet {
        sets.into_iter()
            .flat_map(|rs| rs.regions.iter().cloned())
            .collect()
    }

    ///
    /// Save a regionset to disk as a bed file. Paths ending in `.gz` are
    /// gzip-compressed.
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    pub fn to_bed<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()> {
        let path = path.as_ref();
        if path.extension() == Some(OsStr::new("gz")) {
            return self.to_bed_gz(path);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        for region in &self.regions {
            writeln!(writer, "{}", region.as_string())?;
        }
        writer.flush()
    }

    ///
    /// Save a regionset to disk as bed.gz file
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    pub fn to_bed_gz<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::best());

        for region in &self.regions {
            writeln!(encoder, "{}", region.as_string())?;
        }

        encoder.finish()?.flush()
    }

    ///
    /// Unique chromosomes in the set, in lexicographic order
    ///
    pub fn iter_chroms(&self) -> impl Iterator<Item = &String> {
        let unique_chroms: BTreeSet<&String> = self.regions.iter().map(|r| &r.chr).collect();
        unique_chroms.into_iter()
    }

    ///
    /// Iterate through regions located on specific Chromosome in RegionSet
    ///
    /// # Arguments
    /// - chr: chromosome name
    ///
    pub fn iter_chr_regions<'a>(&'a self, chr: &'a str) -> impl Iterator<Item = &'a Region> {
        self.regions.iter().filter(move |r| r.chr == chr)
    }

    ///
    /// Sort regions by `(chr, start, end)` in place
    ///
    pub fn sort(&mut self) {
        self.regions.sort();
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    ///
    /// Get total nucleotide count
    ///
    pub fn nucleotides_length(&self) -> u64 {
        self.regions.iter().map(Region::width).sum()
    }

    ///
    /// Check the merged-set invariant: sorted, and every consecutive pair on
    /// the same chromosome separated by at least one base.
    ///
    pub fn is_merged(&self) -> bool {
        self.regions.windows(2).all(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            a.chr < b.chr || (a.chr == b.chr && a.end < b.start)
        })
    }
}

impl Display for RegionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionSet with {} regions.", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn write_dummy_bed(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[fixture]
    fn dummy_bed_contents() -> &'static str {
        "track name=dummy\nchr2\t5\t9\nchr1\t2\t6\nchr1\t4\t7\n"
    }

    #[rstest]
    fn test_open_from_path(dummy_bed_contents: &str) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = write_dummy_bed(tempdir.path(), "dummy.bed", dummy_bed_contents);

        let rs = RegionSet::try_from(path.as_path()).unwrap();
        assert_eq!(rs.len(), 3);
        assert_eq!(rs.header.as_deref(), Some("track name=dummy"));
        assert_eq!(rs.regions[0], Region::new("chr1", 2, 6));
        assert_eq!(rs.path.unwrap(), path);
    }

    #[rstest]
    fn test_open_empty_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = write_dummy_bed(tempdir.path(), "empty.bed", "");

        let rs = RegionSet::try_from(path.as_path()).unwrap();
        assert!(rs.is_empty());
    }

    #[rstest]
    fn test_open_missing_file() {
        assert!(matches!(
            RegionSet::try_from("/definitely/not/here.bed"),
            Err(RegionSetError::FileReadError(_))
        ));
    }

    #[rstest]
    fn test_save_bed_and_bed_gz(dummy_bed_contents: &str) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = write_dummy_bed(tempdir.path(), "dummy.bed", dummy_bed_contents);
        let rs = RegionSet::try_from(path.as_path()).unwrap();

        let plain = tempdir.path().join("out/plain.bed");
        let gzipped = tempdir.path().join("out/compressed.bed.gz");
        rs.to_bed(&plain).unwrap();
        rs.to_bed(&gzipped).unwrap();

        let from_plain = RegionSet::try_from(plain.as_path()).unwrap();
        let from_gz = RegionSet::try_from(gzipped.as_path()).unwrap();
        assert_eq!(from_plain.regions, rs.regions);
        assert_eq!(from_gz.regions, rs.regions);
    }

    #[rstest]
    fn test_iter_chroms_sorted(dummy_bed_contents: &str) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = write_dummy_bed(tempdir.path(), "dummy.bed", dummy_bed_contents);
        let rs = RegionSet::try_from(path.as_path()).unwrap();

        let chroms: Vec<&String> = rs.iter_chroms().collect();
        assert_eq!(chroms, vec!["chr1", "chr2"]);
        assert_eq!(rs.iter_chr_regions("chr1").count(), 2);
    }

    #[rstest]
    fn test_nucleotides_length() {
        let rs = RegionSet::from(vec![Region::new("chr1", 0, 10), Region::new("chr2", 5, 8)]);
        assert_eq!(rs.nucleotides_length(), 13);
    }

    #[rstest]
    #[case(vec![("chr1", 0, 10), ("chr1", 11, 20)], true)]
    #[case(vec![("chr1", 0, 10), ("chr1", 10, 20)], false)]
    #[case(vec![("chr1", 5, 10), ("chr1", 0, 3)], false)]
    #[case(vec![("chr1", 0, 10), ("chr2", 0, 10)], true)]
    fn test_is_merged(#[case] regions: Vec<(&str, u64, u64)>, #[case] expected: bool) {
        let rs: RegionSet = regions
            .into_iter()
            .map(|(chr, start, end)| Region::new(chr, start, end))
            .collect();
        assert_eq!(rs.is_merged(), expected);
    }

    #[rstest]
    fn test_concat_keeps_order() {
        let a = RegionSet::from(vec![Region::new("chr2", 0, 1)]);
        let b = RegionSet::from(vec![Region::new("chr1", 0, 1)]);
        let joined = RegionSet::concat([&a, &b]);
        assert_eq!(joined.regions[0].chr, "chr2");
        assert_eq!(joined.len(), 2);
    }
}
