//! Static reference datasets loaded once at start-up.
//!
//! Each dataset is optional: a missing or malformed file is logged and leaves
//! the dataset absent so the matching endpoints answer 404 while the rest of
//! the service keeps working.

use crate::config::DataConfig;
use crate::models::{AirportInfo, FlightDataset, FlightRecord, VisaRequirements};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Errors raised while reading a dataset file
#[derive(Debug, thiserror::Error)]
pub enum ReferenceDataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Immutable in-memory copy of every dataset
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    /// Keyed by uppercase IATA code
    airports: HashMap<String, AirportInfo>,
    /// Keyed by lowercase ISO code
    advisories: Option<HashMap<String, String>>,
    /// Keyed by uppercase passport ISO code
    visas: Option<HashMap<String, VisaRequirements>>,
    /// `None` when the file is missing or holds no records
    flights: Option<Vec<FlightRecord>>,
}

impl ReferenceData {
    /// Load every dataset named by `config`
    pub fn load(config: &DataConfig) -> Self {
        let airports: Vec<AirportInfo> =
            optional(read_json(&config.airports_path()), "airports").unwrap_or_default();

        let advisories: Option<HashMap<String, String>> =
            optional(read_json(&config.advisory_path()), "advisories");

        let visas: Option<HashMap<String, VisaRequirements>> =
            optional(read_json(&config.visa_path()), "visas");

        let flights = optional::<FlightDataset>(read_json(&config.flights_path()), "flights")
            .map(|dataset| dataset.data);

        let data = Self::from_parts(airports, advisories, visas, flights);
        info!(
            airports = data.airports.len(),
            advisories = data.advisories.as_ref().map_or(0, HashMap::len),
            visas = data.visas.as_ref().map_or(0, HashMap::len),
            flights = data.flights.as_ref().map_or(0, Vec::len),
            "Reference data loaded"
        );
        data
    }

    /// Build from in-memory datasets, normalizing key case
    pub fn from_parts(
        airports: Vec<AirportInfo>,
        advisories: Option<HashMap<String, String>>,
        visas: Option<HashMap<String, VisaRequirements>>,
        flights: Option<Vec<FlightRecord>>,
    ) -> Self {
        let airports = airports
            .into_iter()
            .map(|airport| (airport.iata_code.to_uppercase(), airport))
            .collect();

        let advisories = advisories.map(|table| {
            table
                .into_iter()
                .map(|(code, text)| (code.to_lowercase(), text))
                .collect()
        });

        let visas = visas.map(|table| {
            table
                .into_iter()
                .map(|(code, requirements)| (code.to_uppercase(), requirements))
                .collect()
        });

        let flights = flights.filter(|records| !records.is_empty());

        Self {
            airports,
            advisories,
            visas,
            flights,
        }
    }

    pub fn airport(&self, iata_code: &str) -> Option<&AirportInfo> {
        self.airports.get(&iata_code.trim().to_uppercase())
    }

    pub fn airport_count(&self) -> usize {
        self.airports.len()
    }

    pub fn advisories(&self) -> Option<&HashMap<String, String>> {
        self.advisories.as_ref()
    }

    pub fn visas(&self) -> Option<&HashMap<String, VisaRequirements>> {
        self.visas.as_ref()
    }

    pub fn flights(&self) -> Option<&[FlightRecord]> {
        self.flights.as_deref()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ReferenceDataError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ReferenceDataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ReferenceDataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn optional<T>(result: Result<T, ReferenceDataError>, dataset: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(dataset, error = %e, "Reference dataset unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(iata: &str, iso: &str) -> AirportInfo {
        AirportInfo {
            iata_code: iata.to_string(),
            name: String::new(),
            city: "City".to_string(),
            country_name: "Country".to_string(),
            iso_country_code: iso.to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    #[test]
    fn test_from_parts_normalizes_keys() {
        let advisories = HashMap::from([("ES".to_string(), "Take care".to_string())]);
        let visas = HashMap::from([("gb".to_string(), VisaRequirements::new())]);
        let data = ReferenceData::from_parts(
            vec![airport("mad", "ES")],
            Some(advisories),
            Some(visas),
            None,
        );

        assert!(data.airport("MAD").is_some());
        assert!(data.airport(" mad ").is_some());
        assert!(data.advisories().unwrap().contains_key("es"));
        assert!(data.visas().unwrap().contains_key("GB"));
        assert!(data.flights().is_none());
    }

    #[test]
    fn test_empty_flight_list_counts_as_missing() {
        let data = ReferenceData::from_parts(vec![], None, None, Some(vec![]));
        assert!(data.flights().is_none());
    }

    #[test]
    fn test_load_bundled_data() {
        let config = DataConfig::with_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
        let data = ReferenceData::load(&config);

        assert!(data.airport_count() > 0);
        assert!(data.flights().is_some_and(|f| !f.is_empty()));
        assert!(data.advisories().is_some());
        assert!(data.visas().is_some());
    }

    #[test]
    fn test_load_missing_directory_is_not_fatal() {
        let data = ReferenceData::load(&DataConfig::with_dir("/nonexistent/flight-track"));
        assert_eq!(data.airport_count(), 0);
        assert!(data.flights().is_none());
        assert!(data.advisories().is_none());
        assert!(data.visas().is_none());
    }
}
