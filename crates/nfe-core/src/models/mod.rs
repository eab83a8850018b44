//! Data models: the NF-e record tree, leaf values and configuration.

pub mod config;
pub mod field;
pub mod nfe;
