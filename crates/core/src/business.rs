//! Business records and analysis requests
//!
//! `BusinessRecord` mirrors the loosely-typed documents the directory
//! scraper writes to the store: most fields are optional and French wire
//! names (`note_moyenne`, `nombre_avis`, `horaire`) are preserved through
//! serde renames. Raw maps never cross into the metric engine; this is the
//! typed boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requested analysis depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    /// Market snapshot plus a terse generative pass
    Quick,
    /// Default depth
    #[default]
    Standard,
    /// Full comparison-oriented analysis
    Detailed,
}

/// A single analysis request. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRequest {
    /// Business type, e.g. "Restaurant", "Coiffeur"
    #[serde(rename = "type")]
    pub business_type: String,
    /// Target location, e.g. "Paris 75001", "Lyon"
    pub address: String,
    /// Search radius in kilometers
    pub radius_km: f64,
    /// Analysis depth
    #[serde(default)]
    pub analysis_depth: AnalysisDepth,
}

impl BusinessRequest {
    /// Create a request with trimmed fields
    pub fn new(
        business_type: impl Into<String>,
        address: impl Into<String>,
        radius_km: f64,
        analysis_depth: AnalysisDepth,
    ) -> Self {
        Self {
            business_type: business_type.into().trim().to_string(),
            address: address.into().trim().to_string(),
            radius_km,
            analysis_depth,
        }
    }
}

/// A raw store record for one listed business
///
/// All optional fields default so that partially-scraped documents
/// deserialize without error; the metric engine applies the documented
/// defaults on top.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BusinessRecord {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Listed business type
    #[serde(default, rename = "type")]
    pub business_type: String,
    /// Postal address as scraped
    #[serde(default)]
    pub address: Option<String>,
    /// Certified-professional flag; the scraper emits the strings
    /// "true"/"false" rather than booleans
    #[serde(default)]
    pub professional: Option<String>,
    /// Average rating out of 5, 0.0 when unrated
    #[serde(default, rename = "note_moyenne")]
    pub rating: f64,
    /// Number of reviews
    #[serde(default, rename = "nombre_avis")]
    pub review_count: u32,
    /// Opening hours; shape varies by scraper version so it is kept opaque
    #[serde(default, rename = "horaire")]
    pub hours: Option<serde_json::Value>,
    /// Latitude when stored as a separate field
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude when stored as a separate field
    #[serde(default)]
    pub lon: Option<f64>,
    /// Combined coordinate field: "(lat, lon)", "lat,lon" or [lat, lon]
    #[serde(default)]
    pub coordinates: Option<serde_json::Value>,
    /// Scrape timestamp when present
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
}

impl BusinessRecord {
    /// Whether the record carries a rating
    pub fn is_rated(&self) -> bool {
        self.rating > 0.0
    }

    /// Whether the business is flagged as a certified professional
    pub fn is_professional(&self) -> bool {
        self.professional.as_deref() == Some("true")
    }

    /// Whether an address was scraped
    pub fn has_address(&self) -> bool {
        self.address.as_deref().is_some_and(|a| !a.trim().is_empty())
    }

    /// Whether opening hours were scraped
    pub fn has_hours(&self) -> bool {
        match &self.hours {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Array(items)) => !items.is_empty(),
            Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
            Some(serde_json::Value::Object(map)) => !map.is_empty(),
            Some(_) => true,
        }
    }

    /// Parse the record's coordinates, supporting both the separate
    /// `lat`/`lon` fields and the combined `coordinates` form.
    ///
    /// Returns `None` when no usable pair is present; callers skip such
    /// records rather than failing the whole query.
    pub fn coords(&self) -> Option<(f64, f64)> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Some((lat, lon));
        }

        match self.coordinates.as_ref()? {
            serde_json::Value::String(s) => parse_coordinate_pair(s),
            serde_json::Value::Array(items) if items.len() >= 2 => {
                let lat = items[0].as_f64()?;
                let lon = items[1].as_f64()?;
                Some((lat, lon))
            }
            _ => None,
        }
    }
}

/// Parse "(lat, lon)", "[lat, lon]" or "lat,lon" into a coordinate pair
fn parse_coordinate_pair(raw: &str) -> Option<(f64, f64)> {
    let trimmed = raw.trim().trim_matches(|c| "()[]".contains(c));
    let mut parts = trimmed.split(',');
    let lat: f64 = parts.next()?.trim().parse().ok()?;
    let lon: f64 = parts.next()?.trim().parse().ok()?;
    Some((lat, lon))
}

/// Competitive position in the local market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    /// success >= 8 and rating >= 4.5
    Leader,
    /// success >= 6 and rating >= 4.0
    Established,
    /// success >= 4
    Moderate,
    Weak,
}

impl std::fmt::Display for MarketPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Leader => "Leader",
            Self::Established => "Established",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
        };
        f.write_str(label)
    }
}

/// Competitive threat toward the requested project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLevel {
    /// similarity >= 80 within 1 km
    VeryHigh,
    /// similarity >= 60 within 2 km
    High,
    /// similarity >= 40
    Moderate,
    Low,
}

impl std::fmt::Display for ThreatLevel {
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

/// A store record materialized as a competitor for one analysis
///
/// Built per query, scored by the metric engine, discarded after the
/// analysis. Never written back to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competitor {
    /// The underlying store record
    #[serde(flatten)]
    pub record: BusinessRecord,
    /// Great-circle distance to the analysis target. Always within the
    /// requested radius.
    pub distance_km: f64,
    /// Success score in [0, 10]
    pub success_score: f64,
    /// Similarity to the requested business type in [0, 100]
    pub similarity_score: f64,
    /// Market position classification
    pub market_position: MarketPosition,
    /// Threat classification
    pub threat_level: ThreatLevel,
}

impl Competitor {
    /// Relevance key used to rank competitors for output:
    /// similarity + success - distance, descending.
    pub fn relevance(&self) -> f64 {
        self.similarity_score + self.success_score - self.distance_km
    }
}
