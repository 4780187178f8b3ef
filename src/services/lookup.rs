//! Identifier resolution and flight enrichment over the reference data.

use crate::error::ApiError;
use crate::models::{
    AirportInfo, DestinationAdvisoriesResponse, DestinationAdvisory, DestinationInfo,
    EnrichedFlight, FlightRecord, VisaBatchResponse, VisaRequirements,
};
use crate::services::reference_data::ReferenceData;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Requirement reported when the visa table has no entry for a pair
pub const UNKNOWN_REQUIREMENT: &str = "Unknown";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Equality filters applied with AND semantics
#[derive(Debug, Clone, Default)]
pub struct FlightFilter<'a> {
    pub origin: Option<&'a str>,
    pub destination: Option<&'a str>,
    pub departure_date: Option<&'a str>,
}

impl FlightFilter<'_> {
    fn matches(&self, record: &FlightRecord) -> bool {
        self.origin.is_none_or(|o| record.origin == o)
            && self.destination.is_none_or(|d| record.destination == d)
            && self.departure_date.is_none_or(|d| record.departure_date == d)
    }
}

/// Keep the records passing every present filter, in their original order
pub fn filter_flights(records: &[FlightRecord], filter: &FlightFilter<'_>) -> Vec<FlightRecord> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

/// Parse a `YYYY-MM-DD` date, naming the offending field on failure
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ApiError::validation(format!(
            "Invalid {field} '{value}': expected a date formatted as YYYY-MM-DD"
        ))
    })
}

/// Calendar days between departure and return
pub fn compute_trip_days(record: &FlightRecord) -> Result<i64, ApiError> {
    let departure = parse_date("departureDate", &record.departure_date)?;
    let return_date = parse_date("returnDate", &record.return_date)?;

    let days = (return_date - departure).num_days();
    if days < 0 {
        return Err(ApiError::validation(format!(
            "returnDate {} precedes departureDate {} for {} -> {}",
            record.return_date, record.departure_date, record.origin, record.destination
        )));
    }
    Ok(days)
}

/// Split a comma-separated code list into trimmed uppercase codes, skipping blanks
pub fn parse_code_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
        .collect()
}

/// Read-only queries over the shared reference data
#[derive(Debug, Clone)]
pub struct LookupService {
    data: Arc<ReferenceData>,
}

impl LookupService {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    /// Case-insensitive airport lookup; unknown codes are simply absent
    pub fn resolve_location(&self, iata_code: &str) -> Option<&AirportInfo> {
        self.data.airport(iata_code)
    }

    pub fn iata_to_iso(&self, iata_code: &str) -> Option<&str> {
        self.resolve_location(iata_code)
            .map(|airport| airport.iso_country_code.as_str())
    }

    pub fn destination_info(&self, iata_code: &str) -> DestinationInfo {
        self.resolve_location(iata_code)
            .map(|airport| DestinationInfo {
                city_name: Some(airport.city.clone()),
                country_name: Some(airport.country_name.clone()),
                iso_code: Some(airport.iso_country_code.clone()),
                latitude: Some(airport.latitude),
                longitude: Some(airport.longitude),
            })
            .unwrap_or_default()
    }

    /// Requirement for every origin against one destination; gaps become "Unknown"
    pub fn join_visa_requirements(
        &self,
        origin_codes: &BTreeSet<String>,
        destination_iso: &str,
    ) -> BTreeMap<String, String> {
        let destination_iso = destination_iso.to_uppercase();
        origin_codes
            .iter()
            .map(|origin| {
                let requirement = self
                    .data
                    .visas()
                    .and_then(|table| table.get(&origin.to_uppercase()))
                    .and_then(|requirements| requirements.get(&destination_iso))
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_REQUIREMENT.to_string());
                (origin.clone(), requirement)
            })
            .collect()
    }

    /// Join a flight with its destination and trip length.
    ///
    /// With `passports`, the destination's visa requirement for each passport is
    /// attached too; an unknown destination country yields "Unknown" for all.
    pub fn enrich_flight(
        &self,
        record: &FlightRecord,
        passports: Option<&BTreeSet<String>>,
    ) -> Result<EnrichedFlight, ApiError> {
        let trip_days = compute_trip_days(record)?;
        let destination_info = self.destination_info(&record.destination);

        let visa_requirements = passports.map(|codes| {
            let iso = destination_info.iso_code.as_deref().unwrap_or_default();
            self.join_visa_requirements(codes, iso)
        });

        Ok(EnrichedFlight {
            origin: record.origin.clone(),
            destination: record.destination.clone(),
            departure_date: record.departure_date.clone(),
            return_date: record.return_date.clone(),
            price: record.price.clone(),
            destination_info,
            trip_days,
            visa_requirements,
        })
    }

    /// Flights passing `filter`, enriched
    pub fn search_flights(
        &self,
        filter: &FlightFilter<'_>,
        passports: Option<&BTreeSet<String>>,
    ) -> Result<Vec<EnrichedFlight>, ApiError> {
        let records = self
            .data
            .flights()
            .ok_or_else(|| ApiError::not_found("No flight data found"))?;

        let matching = filter_flights(records, filter);
        if matching.is_empty() {
            return Err(ApiError::not_found("No flights match the given filters"));
        }

        matching
            .iter()
            .map(|record| self.enrich_flight(record, passports))
            .collect()
    }

    /// Advisory text for a country code, looked up in lowercase
    pub fn advisory(&self, country_code: &str) -> Result<&str, ApiError> {
        let advisories = self
            .data
            .advisories()
            .ok_or_else(|| ApiError::not_found("Advisory data not found"))?;

        advisories
            .get(&country_code.trim().to_lowercase())
            .map(String::as_str)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                ApiError::not_found(format!(
                    "No advisory found for country code {country_code}"
                ))
            })
    }

    /// Requirements for one passport country, looked up in uppercase
    pub fn visa_requirements_for(&self, country_code: &str) -> Result<&VisaRequirements, ApiError> {
        let visas = self
            .data
            .visas()
            .ok_or_else(|| ApiError::not_found("Visa data not found"))?;

        visas
            .get(&country_code.trim().to_uppercase())
            .filter(|requirements| !requirements.is_empty())
            .ok_or_else(|| {
                ApiError::not_found(format!(
                    "No visa requirements found for country code {country_code}"
                ))
            })
    }

    /// Requirements for several passport countries; unknown codes and empty
    /// entries map to null, matching the single-country lookup
    pub fn visa_requirements_batch(
        &self,
        country_codes: &BTreeSet<String>,
    ) -> Result<VisaBatchResponse, ApiError> {
        let visas = self
            .data
            .visas()
            .ok_or_else(|| ApiError::not_found("Visa data not found"))?;

        let requirements: BTreeMap<String, Option<VisaRequirements>> = country_codes
            .iter()
            .map(|code| {
                let entry = visas.get(code).filter(|r| !r.is_empty()).cloned();
                (code.clone(), entry)
            })
            .collect();
        let found = requirements.values().filter(|entry| entry.is_some()).count();

        Ok(VisaBatchResponse {
            total_requested: requirements.len(),
            found,
            requirements,
        })
    }

    /// Advisories for every distinct flight destination
    pub fn destination_advisories(&self) -> Result<DestinationAdvisoriesResponse, ApiError> {
        let flights = self
            .data
            .flights()
            .ok_or_else(|| ApiError::not_found("No flight data found"))?;
        let advisories = self
            .data
            .advisories()
            .ok_or_else(|| ApiError::not_found("Advisory data not found"))?;

        let destinations: BTreeSet<String> = flights
            .iter()
            .map(|flight| flight.destination.trim().to_uppercase())
            .collect();

        let mut matched = BTreeMap::new();
        let mut unmatched = Vec::new();

        for iata in &destinations {
            let advisory = self.resolve_location(iata).and_then(|airport| {
                advisories
                    .get(&airport.iso_country_code.to_lowercase())
                    .map(|text| DestinationAdvisory {
                        iso_code: airport.iso_country_code.clone(),
                        country_name: airport.country_name.clone(),
                        advisory: text.clone(),
                    })
            });

            match advisory {
                Some(advisory) => {
                    matched.insert(iata.clone(), advisory);
                }
                None => unmatched.push(iata.clone()),
            }
        }

        Ok(DestinationAdvisoriesResponse {
            advisories: matched,
            unmatched,
            total_destinations: destinations.len(),
        })
    }
}
