//! Core types and traits for the market opportunity analyzer
//!
//! This crate provides foundational types used across all other crates:
//! - Business records as produced by the directory scraper
//! - Analysis request/result types
//! - Market metric and insight types
//! - The store query boundary (`BusinessStore`)
//! - Error types

pub mod analysis;
pub mod business;
pub mod error;
pub mod market;
pub mod store;

pub use business::{
    AnalysisDepth, BusinessRecord, BusinessRequest, Competitor, MarketPosition, ThreatLevel,
};
pub use error::{Error, Result};
pub use market::{
    EntryDifficulty, GeographicAdvantage, MarketAnalysis, MarketDensity, MarketSummary,
    OpportunityMetrics, QualityGap, QualityLevel, SaturationLevel, StrategicInsights,
};
pub use analysis::{
    AnalysisResult, ComponentStatus, ConfidenceLevel, GenerativeAnalysis, GenerativeOutcome,
    GenerativePerformance, HealthReport, PerformanceMetrics, QualityRating, Recommendations,
    SystemStatus, UsageStats,
};
pub use store::BusinessStore;
