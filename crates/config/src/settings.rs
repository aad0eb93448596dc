//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Generative backend configuration
    #[serde(default)]
    pub generative: GenerativeSettings,

    /// Geocoding service configuration
    #[serde(default)]
    pub geocoding: GeocodingSettings,

    /// Competitor search configuration
    #[serde(default)]
    pub search: SearchSettings,
}

/// Chat-completion backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerativeSettings {
    /// Backend base URL
    #[serde(default = "default_generative_base_url")]
    pub base_url: String,
    /// Model name/ID
    #[serde(default = "default_generative_model")]
    pub model: String,
    /// Chat-completions endpoint path
    #[serde(default = "default_chat_endpoint")]
    pub chat_endpoint: String,
    /// Models-listing endpoint path, used by availability probes
    #[serde(default = "default_models_endpoint")]
    pub models_endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_generative_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Top-p sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Additional attempts after the first failed call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_generative_base_url() -> String {
    "http://localhost:1234".to_string()
}

fn default_generative_model() -> String {
    "qwen/qwen3-8b".to_string()
}

fn default_chat_endpoint() -> String {
    "/v1/chat/completions".to_string()
}

fn default_models_endpoint() -> String {
    "/v1/models".to_string()
}

fn default_generative_timeout_secs() -> u64 {
    90
}

fn default_max_tokens() -> u32 {
    800
}

fn default_temperature() -> f32 {
    0.2
}

fn default_top_p() -> f32 {
    0.8
}

fn default_max_retries() -> u32 {
    2
}

impl Default for GenerativeSettings {
    fn default() -> Self {
        Self {
            base_url: default_generative_base_url(),
            model: default_generative_model(),
            chat_endpoint: default_chat_endpoint(),
            models_endpoint: default_models_endpoint(),
            timeout_secs: default_generative_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_retries: default_max_retries(),
        }
    }
}

impl GenerativeSettings {
    /// Full URL for the chat-completions endpoint
    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.chat_endpoint)
    }

    /// Full URL for the models-listing endpoint
    pub fn models_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.models_endpoint)
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingSettings {
    /// Geocoding service base URL (Nominatim-compatible)
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// User-Agent sent to the service, required by Nominatim usage policy
    #[serde(default = "default_geocoding_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout_secs")]
    pub timeout_secs: u64,
    /// Delay before each external call, for service rate limits
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_geocoding_user_agent() -> String {
    "marketlens".to_string()
}

fn default_geocoding_timeout_secs() -> u64 {
    10
}

fn default_rate_limit_ms() -> u64 {
    100
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            user_agent: default_geocoding_user_agent(),
            timeout_secs: default_geocoding_timeout_secs(),
            rate_limit_ms: default_rate_limit_ms(),
        }
    }
}

impl GeocodingSettings {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Rate-limit delay as a `Duration`
    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

/// Competitor search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Default search radius in km
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    /// Maximum competitors retained per analysis
    #[serde(default = "default_max_competitors")]
    pub max_competitors: usize,
    /// Store candidates fetched per kept result, to leave room for the
    /// geographic filter
    #[serde(default = "default_candidate_multiplier")]
    pub candidate_multiplier: usize,
    /// Competitors forwarded to the generative prompt
    #[serde(default = "default_prompt_competitors")]
    pub prompt_competitors: usize,
}

fn default_radius_km() -> f64 {
    5.0
}

fn default_max_competitors() -> usize {
    20
}

fn default_candidate_multiplier() -> usize {
    3
}

fn default_prompt_competitors() -> usize {
    15
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            max_competitors: default_max_competitors(),
            candidate_multiplier: default_candidate_multiplier(),
            prompt_competitors: default_prompt_competitors(),
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.default_radius_km <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "search.default_radius_km".to_string(),
                message: format!("Must be positive, got {}", self.search.default_radius_km),
            });
        }

        if self.search.max_competitors == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.max_competitors".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.search.candidate_multiplier == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.candidate_multiplier".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&self.generative.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "generative.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.generative.temperature),
            });
        }

        if !(0.0..=1.0).contains(&self.generative.top_p) {
            return Err(ConfigError::InvalidValue {
                field: "generative.top_p".to_string(),
                message: format!("Must be between 0.0 and 1.0, got {}", self.generative.top_p),
            });
        }

        if self.generative.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "generative.timeout_secs".to_string(),
                message: "Must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }
}

/// Load settings from an optional TOML file plus environment overrides
///
/// Environment variables use the `MARKETLENS_` prefix with `__` as the
/// section separator, e.g. `MARKETLENS_GENERATIVE__BASE_URL`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        builder = builder.add_source(File::from(path));
    }

    builder = builder.add_source(
        Environment::with_prefix("MARKETLENS")
            .separator("__")
            .try_parsing(true),
    );

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;

    tracing::debug!(
        model = %settings.generative.model,
        base_url = %settings.generative.base_url,
        "settings loaded"
    );

    Ok(settings)
}
