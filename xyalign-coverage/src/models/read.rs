///
/// One aligned read as seen by the scanner.
///
/// Coordinates are 0-based half-open: the read covers `[position, end)` on
/// the reference.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRead {
    pub position: u64,
    pub end: u64,
    pub mapping_quality: u8,
    pub is_paired: bool,
    pub is_secondary: bool,
    pub is_supplementary: bool,
    pub is_duplicate: bool,
    pub is_unmapped: bool,
}

impl AlignedRead {
    /// A mapped primary read covering `[position, end)`.
    pub fn new(position: u64, end: u64, mapping_quality: u8) -> Self {
        AlignedRead {
            position,
            end,
            mapping_quality,
            is_paired: false,
            is_secondary: false,
            is_supplementary: false,
            is_duplicate: false,
            is_unmapped: false,
        }
    }

    /// Aligned bases falling inside `[start, end)`.
    pub fn overlap_len(&self, start: u64, end: u64) -> u64 {
        self.end.min(end).saturating_sub(self.position.max(start))
    }
}

///
/// Which reads contribute to window statistics.
///
/// Unmapped and supplementary reads are never counted. Duplicates and
/// secondary alignments are dropped unless explicitly admitted.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadFilter {
    pub include_duplicates: bool,
    pub include_secondary: bool,
}

impl ReadFilter {
    pub fn admits(&self, read: &AlignedRead) -> bool {
        !(read.is_unmapped
            || read.is_supplementary
            || (read.is_duplicate && !self.include_duplicates)
            || (read.is_secondary && !self.include_secondary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_default_filter() {
        let filter = ReadFilter::default();
        let read = AlignedRead::new(0, 100, 60);
        assert!(filter.admits(&read));

        for flagged in [
            AlignedRead { is_unmapped: true, ..read.clone() },
            AlignedRead { is_supplementary: true, ..read.clone() },
            AlignedRead { is_duplicate: true, ..read.clone() },
            AlignedRead { is_secondary: true, ..read.clone() },
        ] {
            assert!(!filter.admits(&flagged), "{:?}", flagged);
        }
    }

    #[rstest]
    #[case(true, false, true)]
    #[case(false, true, false)]
    fn test_include_duplicates(
        #[case] include_duplicates: bool,
        #[case] include_secondary: bool,
        #[case] expected: bool,
    ) {
        let filter = ReadFilter {
            include_duplicates,
            include_secondary,
        };
        let duplicate = AlignedRead {
            is_duplicate: true,
            ..AlignedRead::new(5, 10, 30)
        };
        assert_eq!(filter.admits(&duplicate), expected);
    }

    #[rstest]
    #[case(0, 100, 50)]
    #[case(0, 25, 15)]
    #[case(30, 40, 10)]
    #[case(60, 80, 0)]
    #[case(0, 10, 0)]
    fn test_overlap_len(#[case] start: u64, #[case] end: u64, #[case] expected: u64) {
        assert_eq!(AlignedRead::new(10, 60, 0).overlap_len(start, end), expected);
    }
}
