//! Core library for Brazilian electronic invoice (NF-e) processing.
//!
//! This crate provides:
//! - Parsing of vision-model extraction replies into JSON
//! - Mapping of the extracted JSON into a typed NF-e record tree
//! - Brazilian fiscal identifier rules (CNPJ, CPF, access key)
//! - Post-mapping validation of the record

pub mod error;
pub mod extract;
pub mod invoice;
pub mod models;

pub use error::{ExtractionError, MappingError, NfeError, Result};
pub use extract::{InvoiceExtractor, ResponseFileExtractor};
pub use invoice::{InvoiceMapper, JsonToNfeMapper, NfeValidator, ACCESS_KEY_PREFIX};
pub use models::field::FieldValue;
pub use models::nfe::{Det, Dest, Emit, Ide, InfNfe, Nfe, Total, Transp};
