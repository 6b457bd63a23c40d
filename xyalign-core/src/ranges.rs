//! Interval set operations on genomic region sets.
//!
//! All operations use 0-based half-open coordinates (BED convention), are
//! strand-unaware, and return new `RegionSet` instances.

use std::collections::HashMap;

use crate::models::{Region, RegionSet};

pub trait IntervalRanges {
    /// Merge overlapping and adjacent intervals per chromosome.
    ///
    /// Sorts by (chr, start), then sweeps to merge intervals where
    /// `next.start <= current.end`. The result is independent of input order
    /// and merging a merged set returns it unchanged.
    fn merge(&self) -> RegionSet;

    /// Clamp regions to chromosome boundaries.
    ///
    /// Regions are trimmed to `[0, chrom_size)`. Regions on chromosomes not
    /// present in `chrom_sizes`, and regions left empty by clamping, are dropped.
    fn trim(&self, chrom_sizes: &HashMap<String, u64>) -> RegionSet;
}

impl IntervalRanges for RegionSet {
    fn merge(&self) -> RegionSet {
        merge_regions(self.regions.iter().cloned())
    }

    fn trim(&self, chrom_sizes: &HashMap<String, u64>) -> RegionSet {
        self.regions
            .iter()
            .filter_map(|r| {
                let chrom_size = *chrom_sizes.get(&r.chr)?;
                let end = r.end.min(chrom_size);
                if r.start >= end {
                    None
                } else {
                    Some(Region::new(r.chr.as_str(), r.start, end))
                }
            })
            .collect()
    }
}

///
/// Sort and merge any collection of regions into a merged [RegionSet].
///
pub fn merge_regions(regions: impl IntoIterator<Item = Region>) -> RegionSet {
    let mut sorted: Vec<Region> = regions.into_iter().collect();
    sorted.sort_unstable();

    let mut merged: Vec<Region> = Vec::with_capacity(sorted.len());
    for r in sorted {
        match merged.last_mut() {
            // Overlapping or adjacent -- extend
            Some(current) if current.touches(&r) => {
                current.end = current.end.max(r.end);
            }
            _ => merged.push(r),
        }
    }

    RegionSet::from(merged)
}
