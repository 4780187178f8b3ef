//! Flight records and their enriched API representation.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk wrapper of the flight dataset: `{"data": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct FlightDataset {
    #[serde(default)]
    pub data: Vec<FlightRecord>,
}

/// A round trip from the flight-destination dataset.
///
/// Dates stay as strings until a trip length is derived so that a malformed
/// record only fails the requests that touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<FlightPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct FlightPrice {
    pub total: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Equality filters for the flight list; `None` passes everything
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct FlightQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
    #[serde(rename = "departureDate", alias = "departure_date")]
    pub departure_date: Option<String>,
    /// Comma-separated passport ISO codes; adds visa requirements per flight
    pub passports: Option<String>,
}

/// Where a flight lands. Every field is null when the IATA code is unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct DestinationInfo {
    pub city_name: Option<String>,
    pub country_name: Option<String>,
    pub iso_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A flight joined with destination metadata and derived trip length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct EnrichedFlight {
    pub origin: String,
    pub destination: String,
    #[serde(rename = "departureDate")]
    pub departure_date: String,
    #[serde(rename = "returnDate")]
    pub return_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<FlightPrice>,
    pub destination_info: DestinationInfo,
    pub trip_days: i64,
    /// Passport ISO -> requirement for the destination country
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visa_requirements: Option<BTreeMap<String, String>>,
}
