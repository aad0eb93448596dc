//! Competitor locator
//!
//! Turns a business request into the set of in-radius store records.
//! Scoring lives in the metric engine; this stage only resolves the
//! target, expands the type into query patterns and applies the
//! geographic filter.

use std::sync::Arc;

use marketlens_config::{SearchSettings, TypeFamilies};
use marketlens_core::{BusinessRecord, BusinessRequest, BusinessStore};

use crate::distance::haversine_distance;
use crate::geocoder::Geocoder;

/// A store record that passed the geographic filter
#[derive(Debug, Clone)]
pub struct Candidate {
    pub record: BusinessRecord,
    /// Distance to the analysis target, rounded to 2 decimals
    pub distance_km: f64,
}

/// Locates in-radius competitors for an analysis request
pub struct CompetitorLocator {
    store: Arc<dyn BusinessStore>,
    geocoder: Geocoder,
    families: TypeFamilies,
    search: SearchSettings,
}

impl CompetitorLocator {
    pub fn new(
        store: Arc<dyn BusinessStore>,
        geocoder: Geocoder,
        families: TypeFamilies,
        search: SearchSettings,
    ) -> Self {
        Self {
            store,
            geocoder,
            families,
            search,
        }
    }

    /// Find up to `max_results` competitors within the request radius
    ///
    /// Returns the resolved target coordinates alongside the candidates.
    /// Store failures and malformed records degrade to fewer results,
    /// never to an error: an empty market is an answerable question.
    pub async fn locate(
        &self,
        request: &BusinessRequest,
        max_results: usize,
    ) -> ((f64, f64), Vec<Candidate>) {
        tracing::info!(
            business_type = %request.business_type,
            address = %request.address,
            radius_km = request.radius_km,
            "locating competitors"
        );

        let target = self.geocoder.resolve(&request.address).await;

        let patterns = self.families.patterns_for(&request.business_type);
        let fetch_limit = max_results * self.search.candidate_multiplier;

        let records = match self.store.find_by_type_patterns(&patterns, fetch_limit).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "store query failed");
                return (target, Vec::new());
            }
        };

        let mut candidates = Vec::new();
        for record in records {
            let Some((lat, lon)) = record.coords() else {
                tracing::warn!(name = %record.name, "record without usable coordinates");
                continue;
            };

            let distance = haversine_distance(target.0, target.1, lat, lon);
            if distance > request.radius_km {
                continue;
            }

            let mut record = record;
            record.lat = Some(lat);
            record.lon = Some(lon);
            candidates.push(Candidate {
                record,
                distance_km: (distance * 100.0).round() / 100.0,
            });

            if candidates.len() >= max_results {
                break;
            }
        }

        tracing::info!(count = candidates.len(), "competitors located");
        (target, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use marketlens_config::GeocodingSettings;
    use marketlens_core::{AnalysisDepth, Error, Result};
    use serde_json::json;

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

    struct FailingStore;

    #[async_trait]
    impl BusinessStore for FailingStore {
        async fn find_by_type_patterns(
            &self,
            _patterns: &[String],
            _limit: usize,
        ) -> Result<Vec<BusinessRecord>> {
            Err(Error::Store("connection refused".into()))
        }

        async fn ping(&self) -> bool {
            false
        }
    }

    fn offline_geocoder() -> Geocoder {
        let settings = GeocodingSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            rate_limit_ms: 0,
            ..GeocodingSettings::default()
        };
        Geocoder::new(settings).unwrap()
    }

    fn record(name: &str, lat: f64, lon: f64) -> BusinessRecord {
        serde_json::from_value(json!({
            "name": name,
            "type": "Restaurant",
            "note_moyenne": 4.0,
            "lat": lat,
            "lon": lon
        }))
        .unwrap()
    }

    fn request() -> BusinessRequest {
        // 75001 estimates to Paris center offline
        BusinessRequest::new("Restaurant", "75001 Paris", 2.0, AnalysisDepth::Standard)
    }

    #[tokio::test]
    async fn test_filters_by_radius() {
        let store = Arc::new(FixedStore(vec![
            record("Proche", 48.8570, 2.3530),
            record("Lyonnais", 45.7579, 4.8340),
        ]));
        let locator = CompetitorLocator::new(
            store,
            offline_geocoder(),
            TypeFamilies::default(),
            SearchSettings::default(),
        );

        let (target, candidates) = locator.locate(&request(), 10).await;
        assert_eq!(target, (48.8566, 2.3522));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].record.name, "Proche");
        assert!(candidates[0].distance_km < 2.0);
    }

    #[tokio::test]
    async fn test_skips_records_without_coordinates() {
        let bare: BusinessRecord =
            serde_json::from_value(json!({ "name": "Sans position", "type": "Restaurant" }))
                .unwrap();
        let store = Arc::new(FixedStore(vec![bare, record("Ok", 48.8570, 2.3530)]));
        let locator = CompetitorLocator::new(
            store,
            offline_geocoder(),
            TypeFamilies::default(),
            SearchSettings::default(),
        );

        let (_, candidates) = locator.locate(&request(), 10).await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].record.name, "Ok");
    }

    #[tokio::test]
    async fn test_store_failure_yields_empty_market() {
        let locator = CompetitorLocator::new(
            Arc::new(FailingStore),
            offline_geocoder(),
            TypeFamilies::default(),
            SearchSettings::default(),
        );

        let (_, candidates) = locator.locate(&request(), 10).await;
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_caps_at_max_results() {
        let records: Vec<_> = (0..8)
            .map(|i| record(&format!("R{i}"), 48.8566 + 0.0001 * i as f64, 2.3522))
            .collect();
        let locator = CompetitorLocator::new(
            Arc::new(FixedStore(records)),
            offline_geocoder(),
            TypeFamilies::default(),
            SearchSettings::default(),
        );

        let (_, candidates) = locator.locate(&request(), 5).await;
        assert_eq!(candidates.len(), 5);
    }
}
