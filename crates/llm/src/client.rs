//! Generative analysis client
//!
//! Orchestrates prompt construction, the backend call and the
//! sanitize / extract / validate / normalize pipeline. Failures never
//! escape as errors: the caller always gets a `GenerativeOutcome` with
//! the violated rules listed.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use marketlens_core::{
    BusinessRequest, GenerativeOutcome, GenerativePerformance, MarketAnalysis,
};

use crate::backend::ChatBackend;
use crate::extract::extract_json;
use crate::prompt::PromptBuilder;
use crate::sanitize::sanitize;
use crate::validate::{normalize, validate};

#[derive(Debug, Default)]
struct ClientStats {
    request_count: u64,
    total_response_time: f64,
    error_count: u64,
}

impl ClientStats {
    fn record(&mut self, response_time: f64, success: bool) {
        self.request_count += 1;
        self.total_response_time += response_time;
        if !success {
            self.error_count += 1;
        }
    }

    fn performance(&self, response_time: f64) -> GenerativePerformance {
        let requests = self.request_count.max(1) as f64;
        GenerativePerformance {
            response_time: round2(response_time),
            avg_response_time: round2(self.total_response_time / requests),
            success_rate: round1((requests - self.error_count as f64) / requests * 100.0),
        }
    }
}

/// Outcome of the connectivity self-test
#[derive(Debug, Clone)]
pub struct SelfTestReport {
    pub success: bool,
    pub response_time: f64,
    pub message: String,
}

/// Client over a chat backend with lifetime performance counters
pub struct GenerativeClient {
    backend: Arc<dyn ChatBackend>,
    prompts: PromptBuilder,
    stats: Mutex<ClientStats>,
}

impl GenerativeClient {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            prompts: PromptBuilder::new(),
            stats: Mutex::new(ClientStats::default()),
        }
    }

    /// Run the generative analysis for one request
    pub async fn analyze(
        &self,
        analysis: &MarketAnalysis,
        request: &BusinessRequest,
    ) -> GenerativeOutcome {
        tracing::info!(model = self.backend.model_name(), "generative analysis");
        let start = Instant::now();

        let messages = self.prompts.build(analysis, request);

        let raw_response = match self.backend.complete(&messages).await {
            Ok(content) => content,
            Err(e) => {
                let elapsed = start.elapsed().as_secs_f64();
                self.stats.lock().record(elapsed, false);
                tracing::error!(error = %e, "generative call failed");
                return GenerativeOutcome::failure(format!("Erreur système: {e}"), round2(elapsed));
            }
        };

        let (parsed, errors) = self.parse_and_validate(&raw_response);

        let elapsed = start.elapsed().as_secs_f64();
        let success = errors.is_empty();

        let performance = {
            let mut stats = self.stats.lock();
            stats.record(elapsed, success);
            stats.performance(elapsed)
        };

        if success {
            tracing::info!(elapsed_s = round2(elapsed), "generative analysis succeeded");
        } else {
            tracing::warn!(?errors, "generative analysis failed validation");
        }

        GenerativeOutcome {
            success,
            analysis: if success { parsed.as_ref().map(normalize) } else { None },
            raw_response,
            validation_errors: errors,
            performance,
        }
    }

    fn parse_and_validate(&self, raw: &str) -> (Option<serde_json::Value>, Vec<String>) {
        let cleaned = sanitize(raw);

        let Some(json_content) = extract_json(&cleaned) else {
            return (
                None,
                vec!["Aucun JSON valide trouvé dans la réponse".to_string()],
            );
        };

        let parsed: serde_json::Value = match serde_json::from_str(&json_content) {
            Ok(value) => value,
            Err(e) => return (None, vec![format!("JSON invalide: {e}")]),
        };

        let errors = validate(&parsed);
        (Some(parsed), errors)
    }

    /// Probe the backend with a fixed-output prompt
    pub async fn self_test(&self) -> SelfTestReport {
        let start = Instant::now();

        let raw = match self.backend.probe(&self.prompts.self_test()).await {
            Ok(content) => content,
            Err(e) => {
                return SelfTestReport {
                    success: false,
                    response_time: 0.0,
                    message: format!("Erreur connexion: {e}"),
                };
            }
        };

        let response_time = round2(start.elapsed().as_secs_f64());
        let cleaned = sanitize(&raw);

        match serde_json::from_str::<serde_json::Value>(cleaned.trim()) {
            Ok(parsed) if parsed.get("test").and_then(|v| v.as_str()) == Some("ok") => {
                SelfTestReport {
                    success: true,
                    response_time,
                    message: "Connexion backend opérationnelle".to_string(),
                }
            }
            Ok(parsed) => SelfTestReport {
                success: false,
                response_time,
                message: format!("Le modèle ne respecte pas les instructions. Reçu: {parsed}"),
            },
            Err(e) => SelfTestReport {
                success: false,
                response_time,
                message: format!("Le modèle ne retourne pas du JSON valide: {e}"),
            },
        }
    }

    /// Whether the backend currently answers
    pub async fn is_available(&self) -> bool {
        self.backend.is_available().await
    }

    /// Lifetime performance counters
    pub fn performance_stats(&self) -> GenerativePerformance {
        let stats = self.stats.lock();
        if stats.request_count == 0 {
            return GenerativePerformance::default();
        }
        stats.performance(0.0)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
