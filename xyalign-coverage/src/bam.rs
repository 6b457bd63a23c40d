//! Indexed BAM files as an [AlignmentSource].
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use log::debug;
use noodles::bam;
use noodles::bgzf::Reader;
use noodles::core::{Position, Region};
use noodles::sam;
use noodles::sam::alignment::Record as SamRecord;

use crate::errors::{CoverageError, Result};
use crate::models::AlignedRead;
use crate::source::{AlignmentSource, ReadStream};

///
/// Reads alignments from a coordinate-sorted BAM with a `.bai` index next to it.
///
/// The header is read once on open. Each [AlignmentSource::fetch] runs an
/// index query, so a source can be reused for several chromosomes, but it
/// cannot be shared between threads: open one per worker.
///
pub struct BamAlignmentSource {
    reader: bam::io::IndexedReader<Reader<File>>,
    header: sam::Header,
    lengths: HashMap<String, u64>,
}

impl BamAlignmentSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |source: io::Error| CoverageError::Open {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = bam::io::indexed_reader::Builder::default()
            .build_from_path(path)
            .map_err(open_error)?;
        let header = reader.read_header().map_err(open_error)?;

        let lengths: HashMap<String, u64> = header
            .reference_sequences()
            .iter()
            .map(|(name, reference_sequence)| {
                (name.to_string(), reference_sequence.length().get() as u64)
            })
            .collect();

        debug!(
            "Opened {} with {} reference sequences",
            path.display(),
            lengths.len()
        );

        Ok(BamAlignmentSource {
            reader,
            header,
            lengths,
        })
    }

    /// Lengths of every reference sequence named in the header.
    pub fn chromosome_lengths(&self) -> &HashMap<String, u64> {
        &self.lengths
    }

    fn query_region(chrom: &str, bounds: Option<(u64, u64)>) -> Result<Region> {
        let invalid = |(start, end): (u64, u64)| CoverageError::InvalidRegion {
            chrom: chrom.to_string(),
            start,
            end,
        };

        match bounds {
            None => chrom.parse::<Region>().map_err(|_| invalid((0, 0))),
            Some((start, end)) => {
                // noodles positions are 1-based and inclusive
                let first = Position::new(start as usize + 1);
                let last = Position::new(end as usize);
                match (first, last) {
                    (Some(first), Some(last)) if start < end => Ok(Region::new(chrom, first..=last)),
                    _ => Err(invalid((start, end))),
                }
            }
        }
    }
}

impl AlignmentSource for BamAlignmentSource {
    fn chromosome_length(&self, chrom: &str) -> Option<u64> {
        self.lengths.get(chrom).copied()
    }

    fn fetch<'a>(&'a mut self, chrom: &str, bounds: Option<(u64, u64)>) -> Result<ReadStream<'a>> {
        if !self.lengths.contains_key(chrom) {
            return Err(CoverageError::UnknownChromosome(chrom.to_string()));
        }

        let region = Self::query_region(chrom, bounds)?;
        let records = self
            .reader
            .query(&self.header, &region)
            .map_err(|e| CoverageError::stream(chrom, e))?;

        let chrom = chrom.to_string();
        Ok(Box::new(records.map(move |result| {
            result
                .and_then(|record| to_aligned_read(&record))
                .map_err(|e| CoverageError::stream(&chrom, e))
        })))
    }
}

fn to_aligned_read(record: &bam::Record) -> io::Result<AlignedRead> {
    let flags = record.flags();

    let position = match record.alignment_start() {
        Some(start) => start?.get() as u64 - 1,
        None => 0,
    };
    let end = match SamRecord::alignment_end(record) {
        Some(end) => end?.get() as u64,
        None => position,
    };

    Ok(AlignedRead {
        position,
        end,
        mapping_quality: record.mapping_quality().map(|q| q.get()).unwrap_or(0),
        is_paired: flags.is_segmented(),
        is_secondary: flags.is_secondary(),
        is_supplementary: flags.is_supplementary(),
        is_duplicate: flags.is_duplicate(),
        is_unmapped: flags.is_unmapped(),
    })
}
