//! Configuration management for the market opportunity analyzer
//!
//! Supports loading configuration from:
//! - TOML files
//! - Environment variables (MARKETLENS_ prefix)
//! - Runtime overrides
//!
//! The business-type family table lives here too: it is static domain
//! data, not tunable per deployment, but callers may still swap it out.

pub mod families;
pub mod settings;

pub use families::TypeFamilies;
pub use settings::{
    load_settings, GenerativeSettings, GeocodingSettings, SearchSettings, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
