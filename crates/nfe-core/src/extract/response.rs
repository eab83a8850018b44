//! Decoding of saved vision-model replies.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{InvoiceExtractor, Result};
use crate::error::ExtractionError;

/// Strip the Markdown code fences models like to wrap JSON in.
pub fn clean_response(text: &str) -> String {
    text.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse a model reply into JSON.
pub fn parse_response(text: &str, strip_code_fences: bool) -> Result<Value> {
    let cleaned = if strip_code_fences {
        clean_response(text)
    } else {
        text.trim().to_string()
    };

    if cleaned.is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    serde_json::from_str(&cleaned).map_err(|e| {
        warn!("Model response is not valid JSON: {}", e);
        ExtractionError::InvalidJson {
            message: e.to_string(),
            raw: text.to_string(),
        }
    })
}

/// Reads a model reply saved to disk.
#[derive(Debug, Clone)]
pub struct ResponseFileExtractor {
    strip_code_fences: bool,
}

impl ResponseFileExtractor {
    /// Create an extractor that strips code fences.
    pub fn new() -> Self {
        Self {
            strip_code_fences: true,
        }
    }

    /// Set whether Markdown code fences are stripped before parsing.
    pub fn with_code_fence_stripping(mut self, strip: bool) -> Self {
        self.strip_code_fences = strip;
        self
    }
}

impl Default for ResponseFileExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceExtractor for ResponseFileExtractor {
    fn extract(&self, source: &Path) -> Result<Value> {
        info!("Reading extraction response: {}", source.display());

        let text = fs::read_to_string(source).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ExtractionError::NotFound(source.to_path_buf()),
            _ => ExtractionError::Io(e),
        })?;

        debug!("Response has {} characters", text.len());
        parse_response(&text, self.strip_code_fences)
    }
}
