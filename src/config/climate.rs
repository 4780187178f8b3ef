//! Climate provider configuration.

use crate::services::resilient_client::ResilientClientConfig;
use std::env;

/// Daily variables requested from the provider. The order is irrelevant because
/// the response is keyed by variable name.
pub const DAILY_VARIABLES: &[&str] = &[
    "temperature_2m_mean",
    "temperature_2m_max",
    "temperature_2m_min",
    "relative_humidity_2m_mean",
    "relative_humidity_2m_max",
    "relative_humidity_2m_min",
    "wind_speed_10m_mean",
    "wind_speed_10m_max",
    "cloud_cover_mean",
    "shortwave_radiation_sum",
    "rain_sum",
    "snowfall_sum",
];

/// Configuration for the outbound climate API
#[derive(Debug, Clone)]
pub struct ClimateApiConfig {
    pub base_url: String,
    /// Climate model identifier passed as `models=`
    pub model: String,
    /// Lifetime of cached upstream responses
    pub cache_ttl_seconds: u64,
    pub client: ResilientClientConfig,
}

impl Default for ClimateApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://climate-api.open-meteo.com/v1".to_string(),
            model: "EC_Earth3P_HR".to_string(),
            cache_ttl_seconds: 3600,
            client: ResilientClientConfig::default(),
        }
    }
}

impl ClimateApiConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = env::var("CLIMATE_API_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let model = env::var("CLIMATE_API_MODEL").unwrap_or(defaults.model);

        let cache_ttl_seconds = env::var("CLIMATE_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.cache_ttl_seconds);

        Self {
            base_url,
            model,
            cache_ttl_seconds,
            client: ResilientClientConfig::from_env(),
        }
    }

    /// Configuration pointing at a different provider host, e.g. a local stand-in
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
