//! Analysis result types
//!
//! `GenerativeAnalysis` is the strict output contract of the text-generation
//! backend. Its wire field names stay French: the model is prompted in
//! French and must answer with exactly these keys.

use serde::{Deserialize, Serialize};

use crate::business::BusinessRequest;
use crate::market::MarketAnalysis;

/// Model confidence in its own assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConfidenceLevel {
    Faible,
    #[default]
    Moyen,
    #[serde(rename = "Élevé")]
    Eleve,
}

impl ConfidenceLevel {
    /// Parse one of the three literal levels
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Faible" => Some(Self::Faible),
            "Moyen" => Some(Self::Moyen),
            "Élevé" => Some(Self::Eleve),
            _ => None,
        }
    }

    /// The wire literal
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Faible => "Faible",
            Self::Moyen => "Moyen",
            Self::Eleve => "Élevé",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, normalized structured output of the generative backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerativeAnalysis {
    /// Success score in [0, 100]
    pub score_succes: u8,
    /// Confidence level
    pub niveau_confiance: ConfidenceLevel,
    /// Main strength, one short sentence
    pub atout_principal: String,
    /// Main risk, one short sentence
    pub risque_principal: String,
    /// First concrete action to take
    pub action_prioritaire: String,
    /// Recommended positioning strategy
    pub positionnement_conseille: String,
}

/// Latency counters for the generative call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerativePerformance {
    /// This call's latency in seconds
    pub response_time: f64,
    /// Rolling average latency over the client lifetime
    pub avg_response_time: f64,
    /// Rolling success rate in percent
    pub success_rate: f64,
}

/// Outcome of one generative analysis call
///
/// `analysis` is only populated when the raw response passed every
/// validation rule; the violated rules are otherwise listed in
/// `validation_errors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerativeOutcome {
    pub success: bool,
    pub analysis: Option<GenerativeAnalysis>,
    /// The backend's raw text, kept for diagnosis
    pub raw_response: String,
    pub validation_errors: Vec<String>,
    pub performance: GenerativePerformance,
}

impl GenerativeOutcome {
    /// A terminal failure carrying a single reason
    pub fn failure(reason: impl Into<String>, response_time: f64) -> Self {
        Self {
            success: false,
            analysis: None,
            raw_response: String::new(),
            validation_errors: vec![reason.into()],
            performance: GenerativePerformance {
                response_time,
                ..Default::default()
            },
        }
    }
}

/// Actionable recommendations merged from market rules and the
/// generative analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recommendations {
    pub priority_actions: Vec<String>,
    pub strategic_advice: Vec<String>,
    pub risk_mitigation: Vec<String>,
    pub success_factors: Vec<String>,
    pub next_steps: Vec<String>,
}

/// Qualitative rating of one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityRating {
    /// High confidence, answered within 15s
    Excellent,
    /// Medium-or-better confidence within 30s
    Good,
    /// Generative pass succeeded but slowly or with low confidence
    Acceptable,
    /// Generative pass failed
    Failed,
}

impl std::fmt::Display for QualityRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Acceptable => "Acceptable",
            Self::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// Timing and quality metrics attached to every response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Elapsed wall time for this analysis in seconds
    pub analysis_time: f64,
    /// Mean analysis time over the orchestrator lifetime
    pub avg_analysis_time: f64,
    /// Orchestrator-lifetime success rate in percent
    pub success_rate: f64,
    pub quality_rating: QualityRating,
    /// The generative client's own latency counters
    #[serde(default)]
    pub generative: GenerativePerformance,
}

/// Unified result of one analysis call
///
/// Component failures never escape as errors: a failed run is an
/// `AnalysisResult` with `success == false` and the reason in `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub business_request: Option<BusinessRequest>,
    pub market_analysis: Option<MarketAnalysis>,
    pub generative_analysis: Option<GenerativeOutcome>,
    pub recommendations: Option<Recommendations>,
    pub performance_metrics: PerformanceMetrics,
}

/// Health of one probed component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum ComponentStatus {
    Operational,
    Error(String),
}

impl ComponentStatus {
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Operational)
    }
}

/// Overall system status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    Healthy,
    Degraded,
}

/// Health-check report over the store and generative backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_status: SystemStatus,
    pub store: ComponentStatus,
    pub generative_backend: ComponentStatus,
    /// Generative self-test latency in seconds, when the probe ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generative_response_time: Option<f64>,
    /// Operator hints for degraded components
    pub recommendations: Vec<String>,
}

/// Process-lifetime usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_analyses: u64,
    pub successful_analyses: u64,
    /// Percent of analyses whose generative pass succeeded
    pub success_rate: f64,
    /// Mean wall time per analysis in seconds
    pub avg_analysis_time: f64,
}
