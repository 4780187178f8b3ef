//! Configuration structures and loading utilities.
//!
//! Every structure has a `Default` and a `from_env()` constructor that reads
//! environment variables and falls back to the defaults.

pub mod climate;
pub mod cors;
pub mod data;
pub mod resilient_client;
pub mod server;

pub use climate::*;
pub use cors::*;
pub use data::*;
pub use server::*;

/// Aggregate configuration for the whole service
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub climate: ClimateApiConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    /// Load every configuration section from the environment
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            data: DataConfig::from_env(),
            climate: ClimateApiConfig::from_env(),
            cors: CorsConfig::from_env(),
        }
    }
}
