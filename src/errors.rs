// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Invalid job type: '{0}'. Must be one of: prime, bcrypt, sort")]
    InvalidJobType(String),

    #[error("Failed to parse JSON body: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Job submission failed with status {status}: {body}")]
    SubmissionFailure { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LoadError {
    /// The HTTP status carried by this error, if the server answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            LoadError::SubmissionFailure { status, .. } => Some(*status),
            LoadError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
