//! Error types for the nfe-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the nfe library.
#[derive(Error, Debug)]
pub enum NfeError {
    /// Mapping of extracted JSON into the record failed.
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// The extraction reply could not be read or parsed.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// The only failure surfaced across the mapping boundary.
///
/// Missing keys are never an error here; they become absent values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// The top-level input was not a JSON object.
    #[error("input must be a mapping")]
    NotAMapping,

    /// Any other fault hit while traversing the input, with its description.
    #[error("unexpected error during mapping: {0}")]
    Fault(String),
}

/// Errors related to reading and decoding an extraction reply.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The reply file does not exist.
    #[error("response file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Failed to read the reply.
    #[error("failed to read response: {0}")]
    Io(#[from] std::io::Error),

    /// The reply was empty after cleaning.
    #[error("model response is empty")]
    EmptyResponse,

    /// The reply is not valid JSON.
    #[error("model response is not valid JSON: {message}")]
    InvalidJson {
        /// Parser diagnostic.
        message: String,
        /// The reply as received, before cleaning.
        raw: String,
    },
}

/// Result type for the nfe library.
pub type Result<T> = std::result::Result<T, NfeError>;
