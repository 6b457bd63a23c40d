use std::path::PathBuf;

use thiserror::Error;

use xyalign_core::RegionSetError;

#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to read alignments for {chrom}: {source}")]
    StreamRead {
        chrom: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open alignments {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Chromosome '{0}' not found in the alignment header")]
    UnknownChromosome(String),

    #[error("Invalid region {chrom}:{start}-{end}")]
    InvalidRegion { chrom: String, start: u64, end: u64 },

    #[error("Could not parse variant record on line {line}: {reason}")]
    VariantParse { line: usize, reason: String },

    #[error(transparent)]
    RegionSet(#[from] RegionSetError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoverageError {
    pub(crate) fn stream(chrom: &str, source: std::io::Error) -> Self {
        CoverageError::StreamRead {
            chrom: chrom.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoverageError>;
