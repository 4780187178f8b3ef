//! Climate provider client with a cache-aside TTL cache.
//!
//! Fetches daily series from the Open-Meteo climate API through the
//! [`ResilientClient`]. Responses are cached per (rounded coordinates, date
//! range); entries never change once written and are dropped after the TTL.

use crate::config::{ClimateApiConfig, DAILY_VARIABLES};
use crate::models::DailyClimateSample;
use crate::services::metrics::AppMetrics;
use crate::services::resilient_client::{
    ResilientClient, ResilientClientError, ResilientClientMetrics,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Open-Meteo climate API response
#[derive(Debug, Deserialize)]
struct ClimateApiResponse {
    daily: Option<DailyBlock>,
}

/// Column-oriented daily values; nulls mark missing data
#[derive(Debug, Default, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_mean: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
    #[serde(default)]
    cloud_cover_mean: Vec<Option<f64>>,
    #[serde(default)]
    shortwave_radiation_sum: Vec<Option<f64>>,
    #[serde(default)]
    rain_sum: Vec<Option<f64>>,
    #[serde(default)]
    snowfall_sum: Vec<Option<f64>>,
}

/// Error body returned by Open-Meteo on 4xx
#[derive(Debug, Deserialize)]
struct ProviderError {
    reason: Option<String>,
}

fn value_at(column: &[Option<f64>], index: usize) -> f64 {
    column.get(index).copied().flatten().unwrap_or(f64::NAN)
}

impl DailyBlock {
    fn into_samples(self) -> Vec<DailyClimateSample> {
        self.time
            .iter()
            .enumerate()
            .map(|(i, date)| DailyClimateSample {
                date: date.clone(),
                temperature_mean: value_at(&self.temperature_2m_mean, i),
                temperature_max: value_at(&self.temperature_2m_max, i),
                temperature_min: value_at(&self.temperature_2m_min, i),
                relative_humidity_mean: value_at(&self.relative_humidity_2m_mean, i),
                relative_humidity_max: value_at(&self.relative_humidity_2m_max, i),
                relative_humidity_min: value_at(&self.relative_humidity_2m_min, i),
                wind_speed_mean: value_at(&self.wind_speed_10m_mean, i),
                wind_speed_max: value_at(&self.wind_speed_10m_max, i),
                cloud_cover_mean: value_at(&self.cloud_cover_mean, i),
                shortwave_radiation_sum: value_at(&self.shortwave_radiation_sum, i),
                rain_sum: value_at(&self.rain_sum, i),
                snowfall_sum: value_at(&self.snowfall_sum, i),
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClimateClientError {
    #[error("failed to build provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("provider request failed: {0}")]
    Request(#[from] ResilientClientError),

    #[error("provider returned status {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("provider response carried no daily data")]
    MissingDaily,
}

impl ClimateClientError {
    /// Message safe to return to API callers
    pub fn user_message(&self) -> String {
        match self {
            ClimateClientError::Request(e) => {
                format!("Climate provider unavailable: {}", e.user_message())
            }
            ClimateClientError::Status { status, reason } => {
                format!("Climate provider rejected the request ({status}): {reason}")
            }
            ClimateClientError::InvalidUrl(_) | ClimateClientError::Decode(_) => {
                "Climate provider returned an unusable response".to_string()
            }
            ClimateClientError::MissingDaily => {
                "Climate provider returned no daily data".to_string()
            }
        }
    }
}

struct CacheEntry {
    samples: Arc<Vec<DailyClimateSample>>,
    expires_at: Instant,
}

/// Outbound climate client shared by all requests
#[derive(Clone)]
pub struct ClimateClient {
    client: ResilientClient,
    config: ClimateApiConfig,
    cache: Arc<RwLock<HashMap<String, CacheEntry>>>,
    metrics: Option<AppMetrics>,
}

impl ClimateClient {
    /// Create a client; with `metrics`, outbound and cache metrics are registered on its registry
    pub fn new(config: ClimateApiConfig, metrics: Option<AppMetrics>) -> Result<Self, String> {
        let client_metrics = match &metrics {
            Some(app) => Some(
                ResilientClientMetrics::new(&app.registry)
                    .map_err(|e| format!("Failed to register client metrics: {e}"))?,
            ),
            None => None,
        };

        let client = ResilientClient::new(config.client.clone(), client_metrics)
            .map_err(|e| format!("Failed to create HTTP client: {e}"))?;

        Ok(Self {
            client,
            config,
            cache: Arc::new(RwLock::new(HashMap::new())),
            metrics,
        })
    }

    /// Cache key from coordinates rounded to 2 decimals and the date range
    fn cache_key(lat: f64, lon: f64, start: NaiveDate, end: NaiveDate) -> String {
        format!("{lat:.2},{lon:.2}:{start}:{end}")
    }

    fn ttl(&self) -> Duration {
        Duration::from_secs(self.config.cache_ttl_seconds)
    }

    /// Daily samples for `start..=end` at the given coordinates
    pub async fn fetch_daily(
        &self,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Arc<Vec<DailyClimateSample>>, ClimateClientError> {
        let key = Self::cache_key(lat, lon, start, end);

        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&key)
                && entry.expires_at > Instant::now()
            {
                debug!(key = %key, "Climate cache hit");
                self.record_cache("hit");
                return Ok(Arc::clone(&entry.samples));
            }
        }
        self.record_cache("miss");

        let samples = Arc::new(self.request(lat, lon, start, end).await?);

        {
            let mut cache = self.cache.write().await;
            let now = Instant::now();
            cache.retain(|_, entry| entry.expires_at > now);
            cache.insert(
                key,
                CacheEntry {
                    samples: Arc::clone(&samples),
                    expires_at: now + self.ttl(),
                },
            );
        }

        Ok(samples)
    }

    fn build_url(
        &self,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<url::Url, url::ParseError> {
        let endpoint = format!("{}/climate", self.config.base_url.trim_end_matches('/'));
        url::Url::parse_with_params(
            &endpoint,
            &[
                ("latitude", format!("{lat:.4}")),
                ("longitude", format!("{lon:.4}")),
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
                ("models", self.config.model.clone()),
                ("daily", DAILY_VARIABLES.join(",")),
            ],
        )
    }

    async fn request(
        &self,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClimateSample>, ClimateClientError> {
        let url = self.build_url(lat, lon, start, end)?;
        let response = self.client.get(url.as_str()).await?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .json::<ProviderError>()
                .await
                .ok()
                .and_then(|body| body.reason)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            warn!(status = status.as_u16(), reason = %reason, "Climate provider rejected request");
            return Err(ClimateClientError::Status {
                status: status.as_u16(),
                reason,
            });
        }

        let body: ClimateApiResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                warn!("Climate provider stalled while sending the response body");
                ClimateClientError::Request(ResilientClientError::Timeout)
            } else {
                ClimateClientError::Decode(e.to_string())
            }
        })?;

        let daily = body.daily.ok_or(ClimateClientError::MissingDaily)?;
        Ok(daily.into_samples())
    }

    fn record_cache(&self, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_cache_lookup(outcome);
        }
    }

    #[cfg(test)]
    async fn prime_cache(
        &self,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
        samples: Vec<DailyClimateSample>,
        ttl: Duration,
    ) {
        self.cache.write().await.insert(
            Self::cache_key(lat, lon, start, end),
            CacheEntry {
                samples: Arc::new(samples),
                expires_at: Instant::now() + ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::resilient_client::{ResilientClientConfig, RetryConfig};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// A client pointed at a closed local port with retries disabled
    fn unreachable_client() -> ClimateClient {
        let config = ClimateApiConfig {
            client: ResilientClientConfig {
                request_timeout_seconds: 2,
                connect_timeout_seconds: 1,
                retry: RetryConfig {
                    max_retries: 0,
                    ..RetryConfig::default()
                },
                enable_detailed_logging: false,
            },
            ..ClimateApiConfig::with_base_url("http://127.0.0.1:9")
        };
        ClimateClient::new(config, None).unwrap()
    }

    #[test]
    fn test_cache_key_rounds_coordinates() {
        let start = date("2025-06-01");
        let end = date("2025-06-07");
        assert_eq!(
            ClimateClient::cache_key(40.471926, -3.56264, start, end),
            "40.47,-3.56:2025-06-01:2025-06-07"
        );
        assert_eq!(
            ClimateClient::cache_key(40.4712, -3.5649, start, end),
            ClimateClient::cache_key(40.4702, -3.5631, start, end)
        );
    }

    #[test]
    fn test_build_url() {
        let client = unreachable_client();
        let url = client
            .build_url(51.47, -0.46, date("2025-06-01"), date("2025-06-07"))
            .unwrap();
        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

        assert_eq!(url.path(), "/climate");
        assert_eq!(params["latitude"], "51.4700");
        assert_eq!(params["start_date"], "2025-06-01");
        assert_eq!(params["end_date"], "2025-06-07");
        assert_eq!(params["models"], "EC_Earth3P_HR");
        assert!(params["daily"].contains("rain_sum"));
    }

    #[test]
    fn test_daily_block_nulls_become_nan() {
        let block: DailyBlock = serde_json::from_str(
            r#"{
                "time": ["2025-06-01", "2025-06-02"],
                "temperature_2m_mean": [18.5, null],
                "rain_sum": [0.0]
            }"#,
        )
        .unwrap();
        let samples = block.into_samples();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].temperature_mean, 18.5);
        assert!(samples[1].temperature_mean.is_nan());
        assert!(samples[1].rain_sum.is_nan());
        assert!(samples[0].snowfall_sum.is_nan());
    }

    #[tokio::test]
    async fn test_cached_entry_is_served_without_upstream() {
        let client = unreachable_client();
        let (start, end) = (date("2025-06-01"), date("2025-06-02"));
        client
            .prime_cache(
                40.47,
                -3.56,
                start,
                end,
                vec![DailyClimateSample::empty("2025-06-01")],
                Duration::from_secs(60),
            )
            .await;

        // Nearby coordinates round to the same key
        let samples = client.fetch_daily(40.4712, -3.5621, start, end).await.unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_goes_upstream() {
        let client = unreachable_client();
        let (start, end) = (date("2025-06-01"), date("2025-06-02"));
        client
            .prime_cache(40.47, -3.56, start, end, vec![], Duration::ZERO)
            .await;

        let err = client.fetch_daily(40.47, -3.56, start, end).await.unwrap_err();
        assert!(matches!(err, ClimateClientError::Request(_)));
        assert!(err.user_message().contains("unavailable"));
    }
}
