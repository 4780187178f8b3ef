//! Resilient HTTP client with bounded timeouts and exponential-backoff retries.
//!
//! Every attempt is wrapped in its own timeout, and the same bound applies to
//! reading the response body. Network errors, timeouts and
//! configured status codes (429, 5xx, ...) are retried with doubling delays and
//! jitter until the retry budget is spent; anything else is returned at once.

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{error, info, warn};

/// Configuration for the resilient HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilientClientConfig {
    /// Timeout for a single attempt, from sending the request until the body is read (seconds)
    pub request_timeout_seconds: u64,

    /// Connection timeout (seconds)
    pub connect_timeout_seconds: u64,

    pub retry: RetryConfig,

    /// Log every attempt, not only the final outcome
    pub enable_detailed_logging: bool,
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt; 0 disables retrying
    pub max_retries: usize,

    /// Delay before the first retry; doubles on each further retry
    pub initial_delay_ms: u64,

    /// Upper bound for a single delay
    pub max_delay_ms: u64,

    /// HTTP status codes that trigger a retry
    pub retry_on_status: Vec<u16>,
}

impl Default for ResilientClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 10,
            connect_timeout_seconds: 3,
            retry: RetryConfig::default(),
            enable_detailed_logging: true,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 200,
            max_delay_ms: 5000,
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Delay sequence between attempts: initial, 2x initial, 4x initial, ... capped and jittered
    fn strategy(&self) -> impl Iterator<Item = Duration> + use<> {
        ExponentialBackoff::from_millis(2)
            .factor((self.initial_delay_ms / 2).max(1))
            .max_delay(Duration::from_millis(self.max_delay_ms))
            .map(jitter)
            .take(self.max_retries)
    }
}

/// Metrics for outbound HTTP calls
#[derive(Clone)]
pub struct ResilientClientMetrics {
    /// Completed calls by destination and final outcome
    pub http_requests_total: CounterVec,

    /// Wall-clock duration of a call including all retries
    pub http_request_duration_seconds: HistogramVec,

    /// Retries by destination and reason
    pub retry_attempts_total: CounterVec,

    /// Timed out attempts by destination
    pub timeouts_total: CounterVec,
}

impl ResilientClientMetrics {
    /// Create and register the outbound metrics on the given registry
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let http_requests_total = CounterVec::new(
            Opts::new(
                "upstream_http_requests_total",
                "Total outbound HTTP calls by destination and outcome",
            ),
            &["destination", "outcome"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "upstream_http_request_duration_seconds",
                "Duration of outbound HTTP calls including retries",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["destination"],
        )?;

        let retry_attempts_total = CounterVec::new(
            Opts::new(
                "upstream_http_retry_attempts_total",
                "Total outbound retry attempts by destination and reason",
            ),
            &["destination", "reason"],
        )?;

        let timeouts_total = CounterVec::new(
            Opts::new(
                "upstream_http_timeouts_total",
                "Total outbound attempts that timed out",
            ),
            &["destination"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(retry_attempts_total.clone()))?;
        registry.register(Box::new(timeouts_total.clone()))?;

        Ok(Self {
            http_requests_total,
            http_request_duration_seconds,
            retry_attempts_total,
            timeouts_total,
        })
    }
}

/// HTTP client wrapper applying timeouts and retries to every GET
#[derive(Clone)]
pub struct ResilientClient {
    client: Client,
    config: ResilientClientConfig,
    metrics: Option<ResilientClientMetrics>,
}

impl ResilientClient {
    /// Create a new resilient HTTP client
    pub fn new(
        config: ResilientClientConfig,
        metrics: Option<ResilientClientMetrics>,
    ) -> Result<Self, reqwest::Error> {
        // Covers body reads too, which happen after `get` has returned
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            metrics,
        })
    }

    pub fn config(&self) -> &ResilientClientConfig {
        &self.config
    }

    /// Execute a GET request with timeouts and retries.
    ///
    /// Non-retryable responses (including 4xx other than 408/429) are returned
    /// as `Ok` so the caller can inspect them.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, ResilientClientError> {
        let destination = extract_destination(url);
        let started = Instant::now();
        let attempts = AtomicUsize::new(0);
        let timeout = Duration::from_secs(self.config.request_timeout_seconds);

        let result = RetryIf::spawn(
            self.config.retry.strategy(),
            || {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                self.attempt(url, &destination, attempt, timeout)
            },
            |err: &ResilientClientError| {
                let retry = err.is_retryable();
                if retry {
                    self.record_retry(&destination, err.reason());
                }
                retry
            },
        )
        .await;

        let attempts = attempts.load(Ordering::SeqCst);
        let outcome = match &result {
            Ok(response) => {
                info!(
                    destination = %destination,
                    status = response.status().as_u16(),
                    attempts,
                    duration_ms = started.elapsed().as_millis(),
                    "Outbound request completed"
                );
                "success"
            }
            Err(err) => {
                error!(
                    destination = %destination,
                    error = %err,
                    attempts,
                    duration_ms = started.elapsed().as_millis(),
                    "Outbound request failed"
                );
                err.reason()
            }
        };
        self.record_request(&destination, outcome, started.elapsed());

        result
    }

    /// A single attempt, bounded by `timeout`
    async fn attempt(
        &self,
        url: &str,
        destination: &str,
        attempt: usize,
        timeout: Duration,
    ) -> Result<reqwest::Response, ResilientClientError> {
        let start = Instant::now();
        let detailed = self.config.enable_detailed_logging;

        match tokio::time::timeout(timeout, self.client.get(url).send()).await {
            Ok(Ok(response)) => {
                let status = response.status().as_u16();
                if is_retry_status(status, &self.config.retry.retry_on_status) {
                    if detailed {
                        warn!(
                            destination = %destination,
                            attempt,
                            status,
                            duration_ms = start.elapsed().as_millis(),
                            "Request failed with retryable status"
                        );
                    }
                    Err(ResilientClientError::RetryableStatus(status))
                } else {
                    Ok(response)
                }
            }
            Ok(Err(e)) => {
                if detailed {
                    warn!(
                        destination = %destination,
                        attempt,
                        error = %e,
                        duration_ms = start.elapsed().as_millis(),
                        "Request failed with network error"
                    );
                }
                Err(ResilientClientError::NetworkError(e))
            }
            Err(_) => {
                if detailed {
                    warn!(
                        destination = %destination,
                        attempt,
                        timeout_seconds = timeout.as_secs(),
                        "Request timed out"
                    );
                }
                if let Some(metrics) = &self.metrics {
                    metrics.timeouts_total.with_label_values(&[destination]).inc();
                }
                Err(ResilientClientError::Timeout)
            }
        }
    }

    fn record_request(&self, destination: &str, outcome: &str, duration: Duration) {
        if let Some(metrics) = &self.metrics {
            metrics
                .http_requests_total
                .with_label_values(&[destination, outcome])
                .inc();
            metrics
                .http_request_duration_seconds
                .with_label_values(&[destination])
                .observe(duration.as_secs_f64());
        }
    }

    fn record_retry(&self, destination: &str, reason: &str) {
        if let Some(metrics) = &self.metrics {
            metrics
                .retry_attempts_total
                .with_label_values(&[destination, reason])
                .inc();
        }
    }
}

/// Host part of a URL, used as the metrics label
fn extract_destination(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|_| "invalid_url".to_string())
}

fn is_retry_status(status: u16, retry_statuses: &[u16]) -> bool {
    retry_statuses.contains(&status)
}

/// Errors that can occur with the resilient client
#[derive(Debug, thiserror::Error)]
pub enum ResilientClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Retryable status code: {0}")]
    RetryableStatus(u16),
}

impl ResilientClientError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            // A malformed URL or request will fail the same way every time
            ResilientClientError::NetworkError(e) => !e.is_builder(),
            ResilientClientError::Timeout | ResilientClientError::RetryableStatus(_) => true,
        }
    }

    /// Short label for logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            ResilientClientError::NetworkError(_) => "network_error",
            ResilientClientError::Timeout => "timeout",
            ResilientClientError::RetryableStatus(_) => "http_status",
        }
    }

    /// Get a user-friendly error message for API responses
    pub fn user_message(&self) -> String {
        match self {
            ResilientClientError::NetworkError(_) => {
                "Service temporarily unavailable due to network issues".to_string()
            }
            ResilientClientError::Timeout => {
                "Service temporarily unavailable due to timeout".to_string()
            }
            ResilientClientError::RetryableStatus(status) => {
                format!("Service returned error status {status}, please try again")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ResilientClientConfig::default();
        assert_eq!(config.request_timeout_seconds, 10);
        assert_eq!(config.retry.max_retries, 5);
        assert!(config.enable_detailed_logging);
    }

    #[test]
    fn test_metrics_creation() {
        let registry = Registry::new();
        assert!(ResilientClientMetrics::new(&registry).is_ok());
        // Registering the same families twice is rejected by prometheus
        assert!(ResilientClientMetrics::new(&registry).is_err());
    }

    #[test]
    fn test_extract_destination() {
        assert_eq!(
            extract_destination("https://climate-api.open-meteo.com/v1/climate?latitude=1"),
            "climate-api.open-meteo.com"
        );
        assert_eq!(extract_destination("not a url"), "invalid_url");
    }

    #[test]
    fn test_retry_status() {
        let retry_statuses = vec![429, 500, 503];
        assert!(is_retry_status(429, &retry_statuses));
        assert!(is_retry_status(503, &retry_statuses));
        assert!(!is_retry_status(404, &retry_statuses));
        assert!(!is_retry_status(200, &retry_statuses));
    }

    #[test]
    fn test_strategy_is_bounded() {
        let retry = RetryConfig {
            max_retries: 3,
            initial_delay_ms: 200,
            max_delay_ms: 500,
            retry_on_status: vec![],
        };
        let delays: Vec<Duration> = retry.strategy().collect();
        assert_eq!(delays.len(), 3);
        assert!(delays.iter().all(|d| *d <= Duration::from_millis(500)));

        let disabled = RetryConfig {
            max_retries: 0,
            ..RetryConfig::default()
        };
        assert_eq!(disabled.strategy().count(), 0);
    }

    #[test]
    fn test_error_classification() {
        assert!(ResilientClientError::Timeout.is_retryable());
        assert!(ResilientClientError::RetryableStatus(503).is_retryable());
        assert_eq!(ResilientClientError::Timeout.reason(), "timeout");
        assert!(ResilientClientError::Timeout.user_message().contains("timeout"));
        assert!(
            ResilientClientError::RetryableStatus(502)
                .user_message()
                .contains("502")
        );
    }
}
