//! Address geocoding with layered fallbacks
//!
//! Resolution order: in-process cache, then the Nominatim-compatible
//! service, then postal-code estimation. The last layer cannot fail, so
//! geocoding always yields coordinates. Every resolution is cached,
//! fallback estimates included, so an address is only looked up once
//! per process.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::Deserialize;

use marketlens_config::GeocodingSettings;
use marketlens_core::{Error, Result};

use crate::postal::estimate_by_postal_code;

/// One hit from the Nominatim search endpoint
#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

/// Geocoder over a Nominatim-compatible HTTP service
pub struct Geocoder {
    client: reqwest::Client,
    settings: GeocodingSettings,
    cache: Mutex<HashMap<String, (f64, f64)>>,
}

impl Geocoder {
    pub fn new(settings: GeocodingSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| Error::Internal(format!("failed to build geocoding client: {e}")))?;

        Ok(Self {
            client,
            settings,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Resolve an address to coordinates. Infallible by design of the
    /// fallback chain.
    pub async fn resolve(&self, address: &str) -> (f64, f64) {
        if let Some(&coords) = self.cache.lock().get(address) {
            return coords;
        }

        let coords = match self.query_service(address).await {
            Ok(Some(coords)) => {
                tracing::info!(address, ?coords, "geocoded");
                coords
            }
            Ok(None) => {
                tracing::warn!(address, "geocoding returned no match");
                estimate_by_postal_code(address)
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "geocoding failed");
                estimate_by_postal_code(address)
            }
        };

        self.cache.lock().insert(address.to_string(), coords);
        coords
    }

    async fn query_service(&self, address: &str) -> Result<Option<(f64, f64)>> {
        // Courtesy delay for the service's rate limits
        tokio::time::sleep(self.settings.rate_limit_delay()).await;

        let url = format!("{}/search", self.settings.base_url.trim_end_matches('/'));
        let hits: Vec<NominatimHit> = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| Error::Internal(format!("geocoding request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Internal(format!("geocoding service error: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Internal(format!("geocoding response invalid: {e}")))?;

        let Some(hit) = hits.first() else {
            return Ok(None);
        };

        let lat: f64 = hit
            .lat
            .parse()
            .map_err(|_| Error::Internal(format!("unparseable latitude: {}", hit.lat)))?;
        let lon: f64 = hit
            .lon
            .parse()
            .map_err(|_| Error::Internal(format!("unparseable longitude: {}", hit.lon)))?;

        Ok(Some((lat, lon)))
    }

    /// Number of cached addresses
    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }
}
