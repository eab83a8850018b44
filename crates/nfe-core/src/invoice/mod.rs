//! Mapping of extracted JSON into the NF-e record, plus validation.

mod mapper;
pub mod rules;
mod validator;

pub use mapper::{JsonToNfeMapper, ACCESS_KEY_PREFIX};
pub use validator::NfeValidator;

use serde_json::Value;

use crate::error::MappingError;
use crate::models::nfe::Nfe;

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;

/// Trait for mappers turning extraction output into an NF-e record.
pub trait InvoiceMapper {
    /// Build a fresh record from the extraction output.
    fn map(&self, input: &Value) -> Result<Nfe>;
}
