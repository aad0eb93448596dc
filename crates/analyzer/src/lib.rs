//! Business opportunity analyzer
//!
//! The top-level orchestrator: request validation, deterministic market
//! analysis, generative analysis, recommendation merging and process
//! counters. Component failures degrade the result, they never abort
//! it: callers always receive a structured `AnalysisResult`.

pub mod recommend;

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use marketlens_config::{Settings, TypeFamilies};
use marketlens_core::{
    AnalysisDepth, AnalysisResult, BusinessRequest, BusinessStore, ComponentStatus,
    GenerativeOutcome, GenerativePerformance, HealthReport, PerformanceMetrics, QualityRating,
    Result, SystemStatus, UsageStats,
};
use marketlens_geo::{CompetitorLocator, Geocoder};
use marketlens_llm::{ChatBackend, GenerativeClient};
use marketlens_market::MarketAnalyzer;

use crate::recommend::generate_recommendations;

const MIN_FIELD_CHARS: usize = 3;

#[derive(Debug, Default)]
struct ProcessStats {
    analysis_count: u64,
    total_analysis_time: f64,
    success_count: u64,
}

/// Usage and generative counters for one analyzer instance
#[derive(Debug, Clone)]
pub struct SystemStats {
    pub usage: UsageStats,
    pub generative: GenerativePerformance,
}

/// Combines market search and generative analysis behind one interface
pub struct BusinessAnalyzer {
    store: Arc<dyn BusinessStore>,
    market: MarketAnalyzer,
    generative: GenerativeClient,
    stats: Mutex<ProcessStats>,
}

impl BusinessAnalyzer {
    /// Build the full pipeline over a record store and a chat backend
    pub fn new(
        store: Arc<dyn BusinessStore>,
        backend: Arc<dyn ChatBackend>,
        settings: Settings,
    ) -> Result<Self> {
        let geocoder = Geocoder::new(settings.geocoding.clone())?;
        let locator = CompetitorLocator::new(
            Arc::clone(&store),
            geocoder,
            TypeFamilies::default(),
            settings.search.clone(),
        );
        let market = MarketAnalyzer::new(locator, settings.search.clone());
        let generative = GenerativeClient::new(backend);

        tracing::info!("business analyzer initialized");

        Ok(Self {
            store,
            market,
            generative,
            stats: Mutex::new(ProcessStats::default()),
        })
    }

    /// Run the full analysis for one business project
    pub async fn analyze_business_opportunity(
        &self,
        business_type: &str,
        location: &str,
        radius_km: f64,
        analysis_depth: AnalysisDepth,
    ) -> AnalysisResult {
        tracing::info!(business_type, location, "business analysis");
        let start = Instant::now();

        if let Err(message) = validate_request(business_type, location) {
            return self.error_response(message, 0.0);
        }

        let request = BusinessRequest::new(business_type, location, radius_km, analysis_depth);

        let market_analysis = self.market.analyze(&request).await;
        let generative_analysis = self.generative.analyze(&market_analysis, &request).await;

        let recommendations = generate_recommendations(&market_analysis, &generative_analysis);

        let analysis_time = start.elapsed().as_secs_f64();
        let performance_metrics = {
            let mut stats = self.stats.lock();
            stats.analysis_count += 1;
            stats.total_analysis_time += analysis_time;
            if generative_analysis.success {
                stats.success_count += 1;
            }
            build_performance_metrics(&stats, analysis_time, &generative_analysis)
        };

        tracing::info!(elapsed_s = format!("{analysis_time:.1}"), "analysis complete");

        AnalysisResult {
            success: true,
            error: None,
            business_request: Some(request),
            market_analysis: Some(market_analysis),
            generative_analysis: Some(generative_analysis),
            recommendations: Some(recommendations),
            performance_metrics,
        }
    }

    /// Fast evaluation with a tight radius and the terse prompt
    pub async fn quick_evaluation(&self, business_type: &str, location: &str) -> AnalysisResult {
        self.analyze_business_opportunity(business_type, location, 3.0, AnalysisDepth::Quick)
            .await
    }

    /// Probe the store and the generative backend
    pub async fn test_system_health(&self) -> HealthReport {
        tracing::info!("system health check");

        let store_status = if self.store.ping().await {
            ComponentStatus::Operational
        } else {
            ComponentStatus::Error("store unreachable".to_string())
        };

        let self_test = self.generative.self_test().await;
        let (generative_status, generative_response_time) = if self_test.success {
            (ComponentStatus::Operational, Some(self_test.response_time))
        } else {
            (ComponentStatus::Error(self_test.message), None)
        };

        let mut recommendations = Vec::new();
        if !store_status.is_operational() {
            recommendations.push("Vérifier la connexion au stockage".to_string());
        }
        if !generative_status.is_operational() {
            recommendations.push("Vérifier la connexion au backend génératif".to_string());
        }

        let overall_status = if recommendations.is_empty() {
            SystemStatus::Healthy
        } else {
            SystemStatus::Degraded
        };

        tracing::info!(?overall_status, "health check complete");

        HealthReport {
            overall_status,
            store: store_status,
            generative_backend: generative_status,
            generative_response_time,
            recommendations,
        }
    }

    /// Process-lifetime usage statistics
    pub fn get_system_stats(&self) -> SystemStats {
        let stats = self.stats.lock();
        let analyses = stats.analysis_count.max(1) as f64;

        SystemStats {
            usage: UsageStats {
                total_analyses: stats.analysis_count,
                successful_analyses: stats.success_count,
                success_rate: round1(stats.success_count as f64 / analyses * 100.0),
                avg_analysis_time: round2(stats.total_analysis_time / analyses),
            },
            generative: self.generative.performance_stats(),
        }
    }

    fn error_response(&self, message: String, analysis_time: f64) -> AnalysisResult {
        tracing::warn!(error = %message, "request rejected");

        let stats = self.stats.lock();
        AnalysisResult {
            success: false,
            error: Some(message),
            business_request: None,
            market_analysis: None,
            generative_analysis: None,
            recommendations: None,
            performance_metrics: PerformanceMetrics {
                analysis_time: round2(analysis_time),
                avg_analysis_time: round2(
                    stats.total_analysis_time / stats.analysis_count.max(1) as f64,
                ),
                success_rate: round1(
                    stats.success_count as f64 / stats.analysis_count.max(1) as f64 * 100.0,
                ),
                quality_rating: QualityRating::Failed,
                generative: GenerativePerformance::default(),
            },
        }
    }
}

/// Reject blank or too-short request fields before any I/O happens
fn validate_request(business_type: &str, location: &str) -> std::result::Result<(), String> {
    let business_type = business_type.trim();
    let location = location.trim();

    if business_type.is_empty() {
        return Err("Type de business requis".to_string());
    }
    if location.is_empty() {
        return Err("Localisation requise".to_string());
    }
    if business_type.chars().count() < MIN_FIELD_CHARS {
        return Err("Type de business trop court (min 3 caractères)".to_string());
    }
    if location.chars().count() < MIN_FIELD_CHARS {
        return Err("Localisation trop courte (min 3 caractères)".to_string());
    }
    Ok(())
}

fn build_performance_metrics(
    stats: &ProcessStats,
    analysis_time: f64,
    generative: &GenerativeOutcome,
) -> PerformanceMetrics {
    let quality_rating = if generative.success {
        let confidence = generative
            .analysis
            .as_ref()
            .map(|a| a.niveau_confiance)
            .unwrap_or_default();

        use marketlens_core::ConfidenceLevel::{Eleve, Moyen};
        if confidence == Eleve && analysis_time <= 15.0 {
            QualityRating::Excellent
        } else if (confidence == Eleve || confidence == Moyen) && analysis_time <= 30.0 {
            QualityRating::Good
        } else {
            QualityRating::Acceptable
        }
    } else {
        QualityRating::Failed
    };

    PerformanceMetrics {
        analysis_time: round2(analysis_time),
        avg_analysis_time: round2(
            stats.total_analysis_time / stats.analysis_count.max(1) as f64,
        ),
        success_rate: round1(
            stats.success_count as f64 / stats.analysis_count.max(1) as f64 * 100.0,
        ),
        quality_rating,
        generative: generative.performance.clone(),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
