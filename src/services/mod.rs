//! Business logic and core services.
//!
//! Reference data loading, identifier lookups, the climate aggregator and the
//! outbound climate client.

pub mod climate;
pub mod climate_client;
pub mod lookup;
pub mod metrics;
pub mod reference_data;
pub mod resilient_client;

pub use climate::{ClimateError, classify_day, classify_wind, summarize};
pub use climate_client::{ClimateClient, ClimateClientError};
pub use lookup::{
    FlightFilter, LookupService, UNKNOWN_REQUIREMENT, compute_trip_days, filter_flights,
    parse_code_list, parse_date,
};
pub use metrics::AppMetrics;
pub use reference_data::{ReferenceData, ReferenceDataError};
pub use resilient_client::{
    ResilientClient, ResilientClientConfig, ResilientClientError, ResilientClientMetrics,
    RetryConfig,
};
