//! Market analysis facade

use marketlens_config::SearchSettings;
use marketlens_core::{
    BusinessRequest, Competitor, EntryDifficulty, GeographicAdvantage, MarketAnalysis,
    MarketSummary, OpportunityMetrics, QualityGap, SaturationLevel,
};
use marketlens_geo::CompetitorLocator;

use crate::insights::{opportunity_metrics, pioneer_insights, strategic_insights};
use crate::metrics::score_candidate;
use crate::summary::summarize;

/// Fixed opportunity score for a market with no competition
const PIONEER_SCORE: u8 = 90;

/// Runs the deterministic market analysis for one request
pub struct MarketAnalyzer {
    locator: CompetitorLocator,
    search: SearchSettings,
}

impl MarketAnalyzer {
    pub fn new(locator: CompetitorLocator, search: SearchSettings) -> Self {
        Self { locator, search }
    }

    /// Analyze the local market around the requested location
    ///
    /// Summary, metrics and insights are computed over the full scored
    /// set; the returned competitor list is then truncated to keep the
    /// generative prompt within budget.
    pub async fn analyze(&self, request: &BusinessRequest) -> MarketAnalysis {
        tracing::info!(
            business_type = %request.business_type,
            address = %request.address,
            "market analysis"
        );

        let (_target, candidates) = self
            .locator
            .locate(request, self.search.max_competitors)
            .await;

        if candidates.is_empty() {
            tracing::info!("no competitors found, pioneer market");
            return Self::pioneer_analysis();
        }

        let mut competitors: Vec<Competitor> = candidates
            .into_iter()
            .map(|candidate| score_candidate(candidate, &request.business_type))
            .collect();

        competitors.sort_by(|a, b| {
            b.relevance()
                .partial_cmp(&a.relevance())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let market_summary = summarize(&competitors);
        let metrics = opportunity_metrics(&competitors);
        let insights = strategic_insights(&competitors, &market_summary, &metrics);

        tracing::info!(
            competitors = competitors.len(),
            opportunity_score = metrics.opportunity_score,
            "market analysis complete"
        );

        competitors.truncate(self.search.prompt_competitors);

        MarketAnalysis {
            competitors,
            market_summary,
            opportunity_metrics: metrics,
            strategic_insights: insights,
        }
    }

    /// Fixed analysis for a market with no competitors
    fn pioneer_analysis() -> MarketAnalysis {
        MarketAnalysis {
            competitors: Vec::new(),
            market_summary: MarketSummary::empty(),
            opportunity_metrics: OpportunityMetrics {
                opportunity_score: PIONEER_SCORE,
                market_saturation: SaturationLevel::None,
                quality_gap: QualityGap::NotAssessable,
                geographic_advantage: GeographicAdvantage::VeryHigh,
                entry_difficulty: EntryDifficulty::Low,
                high_performers_count: 0,
                weak_performers_count: 0,
                close_competitors_count: 0,
                positioning_advice: vec!["Marché vierge - Positionnement libre".to_string()],
            },
            strategic_insights: pioneer_insights(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use marketlens_config::{GeocodingSettings, TypeFamilies};
    use marketlens_core::{AnalysisDepth, BusinessRecord, BusinessStore, MarketDensity, Result};
    use marketlens_geo::Geocoder;
    use serde_json::json;
    use std::sync::Arc;

    struct FixedStore(Vec<BusinessRecord>);

    #[async_trait]
    impl BusinessStore for FixedStore {
        async fn find_by_type_patterns(
            &self,
            _patterns: &[String],
            limit: usize,
        ) -> Result<Vec<BusinessRecord>> {
            Ok(self.0.iter().take(limit).cloned().collect())
        }

        async fn ping(&self) -> bool {
            true
        }
    }

    fn analyzer(records: Vec<BusinessRecord>) -> MarketAnalyzer {
        let geocoder = Geocoder::new(GeocodingSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            rate_limit_ms: 0,
            ..GeocodingSettings::default()
        })
        .unwrap();
        let search = SearchSettings::default();
        let locator = CompetitorLocator::new(
            Arc::new(FixedStore(records)),
            geocoder,
            TypeFamilies::default(),
            search.clone(),
        );
        MarketAnalyzer::new(locator, search)
    }

    fn record(name: &str, rating: f64, lat: f64, lon: f64) -> BusinessRecord {
        serde_json::from_value(json!({
            "name": name,
            "type": "Restaurant",
            "note_moyenne": rating,
            "nombre_avis": 20,
            "lat": lat,
            "lon": lon
        }))
        .unwrap()
    }

    fn request() -> BusinessRequest {
        BusinessRequest::new("Restaurant", "75001 Paris", 5.0, AnalysisDepth::Standard)
    }

    #[tokio::test]
    async fn test_empty_market_is_pioneer() {
        let analysis = analyzer(Vec::new()).analyze(&request()).await;
        assert!(analysis.competitors.is_empty());
        assert_eq!(analysis.opportunity_metrics.opportunity_score, PIONEER_SCORE);
        assert_eq!(analysis.market_summary.market_density, MarketDensity::Empty);
        assert_eq!(
            analysis.strategic_insights.main_opportunities,
            vec!["Marché pionnier sans concurrence".to_string()]
        );
    }

    #[tokio::test]
    async fn test_competitors_ranked_by_relevance() {
        // Same type, different quality and proximity
        let records = vec![
            record("Loin et moyen", 3.0, 48.8800, 2.3900),
            record("Proche et fort", 4.8, 48.8570, 2.3530),
        ];
        let analysis = analyzer(records).analyze(&request()).await;
        assert_eq!(analysis.competitors.len(), 2);
        assert_eq!(analysis.competitors[0].record.name, "Proche et fort");
        assert!(analysis.competitors[0].relevance() >= analysis.competitors[1].relevance());
    }

    #[tokio::test]
    async fn test_summary_covers_full_set_output_is_truncated() {
        let records: Vec<_> = (0..20)
            .map(|i| {
                record(
                    &format!("R{i}"),
                    4.0,
                    48.8566 + 0.0002 * i as f64,
                    2.3522,
                )
            })
            .collect();
        let analysis = analyzer(records).analyze(&request()).await;
        assert_eq!(analysis.market_summary.total_competitors, 20);
        assert_eq!(analysis.competitors.len(), 15);
    }
}
