//! Alignment stream providers.
use std::collections::HashMap;

use crate::errors::{CoverageError, Result};
use crate::models::AlignedRead;

/// A coordinate-sorted, finite stream of reads for one chromosome.
pub type ReadStream<'a> = Box<dyn Iterator<Item = Result<AlignedRead>> + 'a>;

///
/// Anything that can hand out the reads aligned to a chromosome.
///
pub trait AlignmentSource {
    /// Length of `chrom` in bases, or `None` if the source does not know it.
    fn chromosome_length(&self, chrom: &str) -> Option<u64>;

    ///
    /// Reads overlapping `chrom`, optionally restricted to the 0-based
    /// half-open `bounds`, in coordinate order.
    ///
    fn fetch<'a>(&'a mut self, chrom: &str, bounds: Option<(u64, u64)>) -> Result<ReadStream<'a>>;
}

///
/// An [AlignmentSource] backed by owned vectors of reads.
///
#[derive(Debug, Clone, Default)]
pub struct InMemoryAlignments {
    lengths: HashMap<String, u64>,
    reads: HashMap<String, Vec<AlignedRead>>,
}

impl InMemoryAlignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chromosome and its reads. Reads are kept in the given order
    /// so that unsorted input can be fed to the scanner deliberately.
    pub fn with_chromosome(
        mut self,
        chrom: impl Into<String>,
        length: u64,
        reads: Vec<AlignedRead>,
    ) -> Self {
        let chrom = chrom.into();
        self.lengths.insert(chrom.clone(), length);
        self.reads.insert(chrom, reads);
        self
    }
}

impl AlignmentSource for InMemoryAlignments {
    fn chromosome_length(&self, chrom: &str) -> Option<u64> {
        self.lengths.get(chrom).copied()
    }

    fn fetch<'a>(&'a mut self, chrom: &str, bounds: Option<(u64, u64)>) -> Result<ReadStream<'a>> {
        let reads = self
            .reads
            .get(chrom)
            .ok_or_else(|| CoverageError::UnknownChromosome(chrom.to_string()))?;

        let (lo, hi) = bounds.unwrap_or((0, u64::MAX));
        Ok(Box::new(
            reads
                .iter()
                .filter(move |r| r.position < hi && r.end > lo)
                .cloned()
                .map(Ok),
        ))
    }
}
