//! Extraction client seam.
//!
//! The vision-model call itself lives outside this crate. What it hands back
//! is a text reply holding JSON; this module turns such replies into
//! `serde_json::Value` for the mapper.

mod response;

pub use response::{clean_response, parse_response, ResponseFileExtractor};

use std::path::Path;

use serde_json::Value;

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for sources of extracted invoice data.
pub trait InvoiceExtractor {
    /// Produce the semi-structured mapping for one invoice.
    fn extract(&self, source: &Path) -> Result<Value>;
}
