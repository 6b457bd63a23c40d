use thiserror::Error;

use xyalign_stats::StatsError;

#[derive(Error, Debug)]
pub enum PloidyError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("A ploidy call has already been made for this run")]
    AlreadyDecided,

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PloidyError>;
