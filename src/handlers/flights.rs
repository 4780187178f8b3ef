//! Flight search endpoint handler.

use crate::{
    models::{EnrichedFlight, FlightQuery},
    services::{FlightFilter, LookupService, parse_code_list},
};
use actix_web::{Error, Result, web};
use paperclip::actix::api_v2_operation;

/// Blank query values behave as if the parameter were absent
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Flight list endpoint
///
/// Filters the flight dataset by origin, destination and departure date and
/// enriches each match with destination details and trip length. When
/// `passports` is given, each flight also carries the visa requirement of
/// every listed passport for the destination country.
#[api_v2_operation(
    summary = "Flight Search Endpoint",
    description = "Returns flights matching the optional origin, destination and departureDate filters, enriched with destination details, trip length and optional visa requirements for the given passports.",
    tags("Flights"),
    parameters(
        ("origin" = Option<String>, Query, description = "Origin IATA code, exact match"),
        ("destination" = Option<String>, Query, description = "Destination IATA code, exact match"),
        ("departureDate" = Option<String>, Query, description = "Departure date (YYYY-MM-DD), exact match"),
        ("passports" = Option<String>, Query, description = "Comma-separated passport ISO codes"),
    ),
    responses(
        (status = 200, description = "Successful response", body = Vec<EnrichedFlight>),
        (status = 404, description = "No flight data or no flight matches the filters"),
        (status = 400, description = "A matching flight carries malformed dates")
    )
)]
pub async fn flights(
    lookup: web::Data<LookupService>,
    query: web::Query<FlightQuery>,
) -> Result<web::Json<Vec<EnrichedFlight>>, Error> {
    let filter = FlightFilter {
        origin: non_blank(&query.origin),
        destination: non_blank(&query.destination),
        departure_date: non_blank(&query.departure_date),
    };

    let passports = non_blank(&query.passports)
        .map(parse_code_list)
        .filter(|codes| !codes.is_empty());

    let results = lookup.search_flights(&filter, passports.as_ref())?;
    tracing::debug!(count = results.len(), "Flight search completed");

    Ok(web::Json(results))
}
