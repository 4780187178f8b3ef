//! Reference entries: airports, advisories and visa requirements.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static airport reference entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct AirportInfo {
    pub iata_code: String,
    #[serde(default)]
    pub name: String,
    pub city: String,
    pub country_name: String,
    pub iso_country_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Response model for `GET /advisory/{countryCode}`
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct AdvisoryResponse {
    /// Lowercase ISO 3166-1 alpha-2 code
    pub country_code: String,
    pub advisory: String,
}

/// Query for the batched visa lookup
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VisaBatchQuery {
    #[serde(rename = "countryCodes", alias = "country_codes")]
    pub country_codes: Option<String>,
}

/// Destination ISO -> requirement, for one passport country
pub type VisaRequirements = BTreeMap<String, String>;

/// Response model for `GET /visa?countryCodes=...`
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VisaBatchResponse {
    /// Explicit null for codes absent from the visa table
    pub requirements: BTreeMap<String, Option<VisaRequirements>>,
    pub total_requested: usize,
    pub found: usize,
}

/// Advisory attached to one flight destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct DestinationAdvisory {
    pub iso_code: String,
    pub country_name: String,
    pub advisory: String,
}

/// Response model for `GET /destinations/advisory`
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct DestinationAdvisoriesResponse {
    /// Keyed by destination IATA code
    pub advisories: BTreeMap<String, DestinationAdvisory>,
    /// Destinations without a known country or without an advisory
    pub unmatched: Vec<String>,
    pub total_destinations: usize,
}
