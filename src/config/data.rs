//! Reference data file locations.

use std::env;
use std::path::PathBuf;

/// Where the static JSON datasets live on disk
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub flights_file: String,
    pub advisory_file: String,
    pub visa_file: String,
    pub airports_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            flights_file: "flights.json".to_string(),
            advisory_file: "countries-advisory.json".to_string(),
            visa_file: "visa-countries.json".to_string(),
            airports_file: "airports.json".to_string(),
        }
    }
}

impl DataConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            flights_file: env::var("FLIGHTS_FILE").unwrap_or(defaults.flights_file),
            advisory_file: env::var("ADVISORY_FILE").unwrap_or(defaults.advisory_file),
            visa_file: env::var("VISA_FILE").unwrap_or(defaults.visa_file),
            airports_file: env::var("AIRPORTS_FILE").unwrap_or(defaults.airports_file),
        }
    }

    /// Configuration rooted at a specific directory with the default file names
    pub fn with_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn flights_path(&self) -> PathBuf {
        self.data_dir.join(&self.flights_file)
    }

    pub fn advisory_path(&self) -> PathBuf {
        self.data_dir.join(&self.advisory_file)
    }

    pub fn visa_path(&self) -> PathBuf {
        self.data_dir.join(&self.visa_file)
    }

    pub fn airports_path(&self) -> PathBuf {
        self.data_dir.join(&self.airports_file)
    }
}
