use std::fmt::{self, Display};

use xyalign_core::Region;

///
/// A genomic interval annotated with summary statistics of the reads over it.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub chrom: String,
    pub start: u64,
    pub stop: u64,
    /// Mean aligned bases per position.
    pub depth: f64,
    /// Mean mapping quality of overlapping reads; 0 when no reads overlap.
    pub mapq: f64,
    /// Mean allelic ratio of variant sites inside the window, if any.
    pub read_balance: Option<f64>,
}

impl Window {
    pub fn width(&self) -> u64 {
        self.stop - self.start
    }

    pub fn region(&self) -> Region {
        Region::new(self.chrom.as_str(), self.start, self.stop)
    }

    /// Tab-separated row: `chrom start stop depth mapq read_balance`.
    /// A missing read balance is written as `NA`.
    pub fn as_row(&self) -> String {
        let read_balance = match self.read_balance {
            Some(rb) => rb.to_string(),
            None => "NA".to_string(),
        };
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom, self.start, self.stop, self.depth, self.mapq, read_balance
        )
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_row())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_as_row() {
        let window = Window {
            chrom: "chrX".to_string(),
            start: 0,
            stop: 25,
            depth: 10.0,
            mapq: 30.5,
            read_balance: None,
        };
        assert_eq!(window.as_row(), "chrX\t0\t25\t10\t30.5\tNA");
        assert_eq!(window.width(), 25);
        assert_eq!(window.region(), Region::new("chrX", 0, 25));

        let with_balance = Window {
            read_balance: Some(0.5),
            ..window
        };
        assert!(with_balance.as_row().ends_with("\t0.5"));
    }
}
