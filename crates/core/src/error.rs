//! Error taxonomy shared across the workspace.

use thiserror::Error;

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
///
/// Component crates define their own error enums and convert into this one
/// at the orchestrator boundary. Geocoding failures never reach this type:
/// the geocoder always degrades to an estimate.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad request parameters, rejected before any I/O
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Store query failure (non-fatal for the search path, which yields
    /// an empty competitor set instead)
    #[error("Store error: {0}")]
    Store(String),

    /// Generative backend failure after retry exhaustion
    #[error("Generative backend error: {0}")]
    Generative(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}
