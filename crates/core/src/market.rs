//! Market aggregate types
//!
//! All classifications here are deterministic step functions over
//! competitor count, average rating and proximity counts; the thresholds
//! live in `marketlens-market`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::business::Competitor;

/// Competitor density classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketDensity {
    /// 0 competitors
    Empty,
    /// <= 3
    Low,
    /// <= 8
    Moderate,
    /// <= 15
    High,
    Saturated,
}

impl std::fmt::Display for MarketDensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Empty => "Empty",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Saturated => "Saturated",
        };
        f.write_str(label)
    }
}

/// Overall market quality from average rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    /// avg rating >= 4.2
    VeryHigh,
    /// >= 3.8
    High,
    /// >= 3.2
    Adequate,
    Low,
    /// No rated competitors
    Unknown,
}

impl std::fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::VeryHigh => "Very high",
            Self::High => "High",
            Self::Adequate => "Adequate",
            Self::Low => "Low",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Market saturation classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaturationLevel {
    None,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl std::fmt::Display for SaturationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very high",
        };
        f.write_str(label)
    }
}

/// Room left for a higher-quality entrant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityGap {
    Significant,
    Moderate,
    Low,
    /// No rated competitors to compare against
    InsufficientData,
    /// Empty market
    NotAssessable,
}

impl std::fmt::Display for QualityGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Significant => "Significant",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
            Self::InsufficientData => "Insufficient data",
            Self::NotAssessable => "Not assessable",
        };
        f.write_str(label)
    }
}

/// Geographic advantage of the target location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeographicAdvantage {
    VeryHigh,
    High,
    Moderate,
    Low,
}

impl std::fmt::Display for GeographicAdvantage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::VeryHigh => "Very high",
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
        };
        f.write_str(label)
    }
}

/// Difficulty of entering the market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryDifficulty {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl std::fmt::Display for EntryDifficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very high",
        };
        f.write_str(label)
    }
}

/// Aggregate statistics over one competitor set. Derived, ephemeral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSummary {
    /// Competitors analyzed
    pub total_competitors: usize,
    /// Mean rating over rated competitors, 0.0 when none are rated
    pub avg_rating: f64,
    /// Median rating over rated competitors
    pub median_rating: f64,
    /// Mean review count
    pub avg_review_count: f64,
    /// Mean success score
    pub avg_success_score: f64,
    /// Mean distance to target in km
    pub avg_distance_km: f64,
    /// Density classification
    pub market_density: MarketDensity,
    /// Quality classification
    pub quality_level: QualityLevel,
    /// Count per market position label
    pub position_distribution: HashMap<String, usize>,
    /// Count per threat level label
    pub threat_distribution: HashMap<String, usize>,
}

impl MarketSummary {
    /// Summary for a market with no competitors
    pub fn empty() -> Self {
        Self {
            total_competitors: 0,
            avg_rating: 0.0,
            median_rating: 0.0,
            avg_review_count: 0.0,
            avg_success_score: 0.0,
            avg_distance_km: 0.0,
            market_density: MarketDensity::Empty,
            quality_level: QualityLevel::Unknown,
            position_distribution: HashMap::new(),
            threat_distribution: HashMap::new(),
        }
    }
}

/// Derived opportunity metrics for one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityMetrics {
    /// Overall opportunity score in [0, 100]
    pub opportunity_score: u8,
    /// Saturation classification
    pub market_saturation: SaturationLevel,
    /// Quality gap classification
    pub quality_gap: QualityGap,
    /// Geographic advantage classification
    pub geographic_advantage: GeographicAdvantage,
    /// Entry difficulty classification
    pub entry_difficulty: EntryDifficulty,
    /// Competitors with success score >= 7
    pub high_performers_count: usize,
    /// Competitors with success score <= 4
    pub weak_performers_count: usize,
    /// Competitors within 1 km
    pub close_competitors_count: usize,
    /// Rule-based positioning advice
    pub positioning_advice: Vec<String>,
}

/// Qualitative strategic insights. Rule-based, no learning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategicInsights {
    pub main_opportunities: Vec<String>,
    pub key_risks: Vec<String>,
    pub success_factors: Vec<String>,
    pub differentiation_potential: Vec<String>,
}

/// The full local-market analysis bundle handed to the generative client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketAnalysis {
    /// Ranked competitors, capped for prompt budget
    pub competitors: Vec<Competitor>,
    pub market_summary: MarketSummary,
    pub opportunity_metrics: OpportunityMetrics,
    pub strategic_insights: StrategicInsights,
}
