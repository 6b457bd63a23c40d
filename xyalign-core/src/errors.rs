use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegionSetError {
    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error("Error parsing region: {0}")]
    RegionParseError(String),

    #[error("Invalid region {chr}:{start}-{end}: start must be smaller than end")]
    InvalidRegion { chr: String, start: u64, end: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RegionSetError>;
