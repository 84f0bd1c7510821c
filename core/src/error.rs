use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type MetricsResult<T> = Result<T, MetricsError>;
