//! Configuration structures for the NF-e pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::NfeError;

/// Main configuration for the nfe pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NfeConfig {
    /// Extraction reply handling.
    pub extraction: ExtractionConfig,

    /// Post-mapping validation.
    pub validation: ValidationConfig,

    /// Output rendering.
    pub output: OutputConfig,
}

/// Extraction reply handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Remove Markdown code fences the model wraps around its JSON.
    pub strip_code_fences: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strip_code_fences: true,
        }
    }
}

/// Post-mapping validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Check CNPJ/CPF check digits.
    pub validate_cnpj: bool,

    /// Check the access key length and check digit.
    pub validate_access_key: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_cnpj: true,
            validate_access_key: true,
        }
    }
}

/// Output rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format when none is given on the command line.
    pub format: String,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: true,
        }
    }
}

impl NfeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, NfeError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| NfeError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), NfeError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| NfeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
