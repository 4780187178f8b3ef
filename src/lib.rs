//! Flight Track API - flight destinations enriched with travel context
//!
//! An Actix Web and Paperclip service that serves a static flight-destination
//! dataset and enriches it with:
//! - destination details and trip length per flight
//! - travel advisories and visa requirements by country
//! - climate summaries for the travel window, computed from the Open-Meteo
//!   climate projection API with a TTL cache in front of it
//!
//! ## Architecture
//!
//! The codebase is organized into focused modules:
//! - `models/` - Data structures and request/response models
//! - `handlers/` - HTTP request handlers and the app factory
//! - `middleware/` - CORS, request IDs and metrics collection
//! - `services/` - Reference data, lookups, climate aggregation and the outbound client
//! - `utils/` - Request inspection helpers
//! - `config/` - Configuration structures and environment loading
//!
//! ## Quick Start
//!
//! ```no_run
//! use actix_web::HttpServer;
//! use flight_track_api::{AppConfig, AppState, create_app};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = AppConfig::from_env();
//!     let state = AppState::from_config(&config).map_err(std::io::Error::other)?;
//!     let bind = config.server.bind_address();
//!     HttpServer::new(move || create_app(state.clone(), &config))
//!         .bind(bind)?
//!         .run()
//!         .await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

pub use config::{AppConfig, ClimateApiConfig, CorsConfig, DataConfig, ServerConfig};
pub use error::{ApiError, ErrorBody};
pub use handlers::{AppState, create_app, create_openapi_spec};
pub use middleware::{MetricsMiddleware, RequestId, RequestIdMiddleware, cors_middleware};
pub use services::{
    AppMetrics, ClimateClient, ClimateClientError, ClimateError, LookupService, ReferenceData,
    ResilientClient, ResilientClientConfig, ResilientClientError, ResilientClientMetrics,
    RetryConfig, summarize,
};
