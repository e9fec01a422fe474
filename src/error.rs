use thiserror::Error;

#[derive(Error, Debug)]
pub enum LotoError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Invalid draw: {0}")]
    InvalidDraw(String),

    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),

    #[error("Not enough candidate numbers: need {needed}, only {available} available")]
    InsufficientCandidates { needed: usize, available: usize },

    #[error("No historical data: {0}")]
    NoData(String),

    #[error("Worker Error: {0}")]
    Worker(String),
}

impl LotoError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type LfResult<T> = Result<T, LotoError>;
