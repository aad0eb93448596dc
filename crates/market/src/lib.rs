//! Market metric engine
//!
//! Scores located competitors, aggregates the market summary, derives
//! opportunity metrics and strategic insights. All rules here are
//! deterministic; the generative layer builds on top of this output
//! but never feeds back into it.

pub mod analyzer;
pub mod insights;
pub mod metrics;
pub mod summary;

pub use analyzer::MarketAnalyzer;
