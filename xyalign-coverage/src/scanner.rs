//! Single-pass windowed depth and mapping-quality scanning.
use std::collections::VecDeque;

use log::debug;

use xyalign_core::{IntervalRanges, Region, RegionSet};

use crate::errors::{CoverageError, Result};
use crate::models::{AlignedRead, ReadFilter, Window};
use crate::read_balance::ReadBalanceSites;
use crate::source::{AlignmentSource, ReadStream};

///
/// How a chromosome is split into windows, and which reads count.
///
/// Exactly one of `window_size` and `targets` must be set.
///
#[derive(Debug, Clone, Default)]
pub struct ScanParams {
    pub window_size: Option<u64>,
    pub targets: Option<RegionSet>,
    pub filter: ReadFilter,
}

impl ScanParams {
    pub fn fixed(window_size: u64) -> Self {
        ScanParams {
            window_size: Some(window_size),
            ..Default::default()
        }
    }

    pub fn targeted(targets: RegionSet) -> Self {
        ScanParams {
            targets: Some(targets),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: ReadFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Check the window layout options without touching any alignments.
    pub fn validate(&self) -> Result<()> {
        match (self.window_size, &self.targets) {
            (Some(_), Some(_)) => Err(CoverageError::Configuration(
                "window_size and target intervals are mutually exclusive".to_string(),
            )),
            (None, None) => Err(CoverageError::Configuration(
                "one of window_size or target intervals is required".to_string(),
            )),
            (Some(0), None) => Err(CoverageError::Configuration(
                "window_size must be positive".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Window spans for a chromosome of `length` bases.
    fn spans(&self, chrom: &str, length: u64) -> Result<Vec<(u64, u64)>> {
        self.validate()?;

        if let Some(width) = self.window_size {
            return Ok((0..length.div_ceil(width))
                .map(|i| (i * width, ((i + 1) * width).min(length)))
                .collect());
        }

        let targets = self.targets.as_ref().map(|t| {
            t.iter_chr_regions(chrom)
                .filter(|r| r.start < length)
                .map(|r| Region::new(chrom, r.start, r.end.min(length)))
                .collect::<RegionSet>()
                .merge()
        });

        Ok(targets
            .map(|t| t.regions.iter().map(|r| (r.start, r.end)).collect())
            .unwrap_or_default())
    }
}

///
/// Scan the reads of one chromosome into windows.
///
/// Returns a lazy iterator: reads are pulled from `source` only as windows
/// are requested, and the whole chromosome is read in a single forward pass.
/// A read that overlaps several windows contributes to each of them.
///
/// # Arguments
/// - source: alignment provider
/// - chrom: chromosome to scan
/// - params: window layout and read filter
/// - sites: optional read-balance evidence
pub fn scan<'a, S: AlignmentSource + ?Sized>(
    source: &'a mut S,
    chrom: &str,
    params: &ScanParams,
    sites: Option<&'a ReadBalanceSites>,
) -> Result<WindowScanner<'a>> {
    let length = source
        .chromosome_length(chrom)
        .ok_or_else(|| CoverageError::UnknownChromosome(chrom.to_string()))?;
    let spans = params.spans(chrom, length)?;

    debug!(
        "Scanning {} ({} bp) in {} windows",
        chrom,
        length,
        spans.len()
    );

    // in target mode only the stretch between the first and last target is read
    let bounds = match (params.targets.is_some(), spans.first(), spans.last()) {
        (true, Some(first), Some(last)) => Some((first.0, last.1)),
        _ => None,
    };
    let reads: ReadStream<'a> = match spans.is_empty() {
        true => Box::new(std::iter::empty()),
        false => source.fetch(chrom, bounds)?,
    };

    Ok(WindowScanner {
        chrom: chrom.to_string(),
        reads,
        spans: spans.into_iter(),
        filter: params.filter,
        sites,
        pending: VecDeque::new(),
        lookahead: None,
        last_position: 0,
        failed: false,
    })
}

///
/// Iterator over the windows of one chromosome; see [scan].
///
/// Holds only the reads overlapping the current window, plus at most one
/// read of lookahead.
///
pub struct WindowScanner<'a> {
    chrom: String,
    reads: ReadStream<'a>,
    spans: std::vec::IntoIter<(u64, u64)>,
    filter: ReadFilter,
    sites: Option<&'a ReadBalanceSites>,
    pending: VecDeque<AlignedRead>,
    lookahead: Option<AlignedRead>,
    last_position: u64,
    failed: bool,
}

impl WindowScanner<'_> {
    fn next_read(&mut self) -> Option<Result<AlignedRead>> {
        match self.lookahead.take() {
            Some(read) => Some(Ok(read)),
            None => self.reads.next(),
        }
    }

    /// Move every read starting before `end` into the pending buffer.
    fn fill(&mut self, start: u64, end: u64) -> Result<()> {
        while let Some(read) = self.next_read() {
            let read = read?;
            if read.is_unmapped {
                continue;
            }
            if read.position < self.last_position {
                return Err(CoverageError::stream(
                    &self.chrom,
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!(
                            "reads are not coordinate-sorted: {} follows {}",
                            read.position, self.last_position
                        ),
                    ),
                ));
            }
            if read.position >= end {
                self.lookahead = Some(read);
                break;
            }
            self.last_position = read.position;

            if self.filter.admits(&read) && read.end > start {
                self.pending.push_back(read);
            }
        }
        Ok(())
    }

    fn summarize(&self, start: u64, end: u64) -> Window {
        let mut bases = 0u64;
        let mut mapq_sum = 0u64;
        let mut count = 0u64;

        for read in &self.pending {
            let overlap = read.overlap_len(start, end);
            if overlap > 0 {
                bases += overlap;
                mapq_sum += read.mapping_quality as u64;
                count += 1;
            }
        }

        Window {
            chrom: self.chrom.clone(),
            start,
            stop: end,
            depth: bases as f64 / (end - start) as f64,
            mapq: match count {
                0 => 0.0,
                n => mapq_sum as f64 / n as f64,
            },
            read_balance: self
                .sites
                .and_then(|sites| sites.mean_in(&self.chrom, start, end)),
        }
    }
}

impl Iterator for WindowScanner<'_> {
    type Item = Result<Window>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (start, end) = self.spans.next()?;

        // reads ending at or before this window can no longer contribute
        self.pending.retain(|r| r.end > start);

        if let Err(e) = self.fill(start, end) {
            self.failed = true;
            return Some(Err(e));
        }

        Some(Ok(self.summarize(start, end)))
    }
}
