use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Degenerate input for sample '{sample}': {reason}")]
    DegenerateInput { sample: String, reason: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resampling cancelled after {completed} of {requested} iterations")]
    Cancelled { completed: usize, requested: usize },
}

pub type Result<T> = std::result::Result<T, StatsError>;
