//! Weather (climate summary) endpoint handler.

use crate::{
    error::ApiError,
    models::{WeatherQuery, WeatherResponse},
    services::{ClimateClient, ClimateError, LookupService, parse_date, summarize},
};
use actix_web::{Error, Result, web};
use chrono::NaiveDate;
use paperclip::actix::api_v2_operation;
use tracing::{info, warn};

/// Both ends of the range are required and the range may not run backwards
fn date_range(query: &WeatherQuery) -> Result<(NaiveDate, NaiveDate), ApiError> {
    let departure = query
        .departure_date
        .as_deref()
        .ok_or_else(|| ApiError::validation("departureDate is required"))?;
    let return_date = query
        .return_date
        .as_deref()
        .ok_or_else(|| ApiError::validation("returnDate is required"))?;

    let start = parse_date("departureDate", departure)?;
    let end = parse_date("returnDate", return_date)?;
    if end < start {
        return Err(ApiError::validation(format!(
            "returnDate {end} precedes departureDate {start}"
        )));
    }
    Ok((start, end))
}

/// Weather endpoint
///
/// Resolves the airport to coordinates, fetches the daily climate projection
/// for the travel window and summarizes it into averages, a Beaufort wind
/// class and sky/precipitation buckets.
#[api_v2_operation(
    summary = "Destination Weather Endpoint",
    description = "Returns a climate summary for the airport's location over the departureDate..returnDate window: average temperatures and humidity, wind on the Beaufort scale, the dominant weather condition and the share of days in each condition.",
    tags("Weather"),
    parameters(
        ("departureDate" = String, Query, description = "First day of the window (YYYY-MM-DD)"),
        ("returnDate" = String, Query, description = "Last day of the window (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Successful response", body = WeatherResponse),
        (status = 400, description = "Missing or invalid dates"),
        (status = 404, description = "Unknown airport or no climate data for the window"),
        (status = 500, description = "Climate provider unavailable")
    )
)]
pub async fn weather(
    lookup: web::Data<LookupService>,
    climate: web::Data<ClimateClient>,
    iata_code: web::Path<String>,
    query: web::Query<WeatherQuery>,
) -> Result<web::Json<WeatherResponse>, Error> {
    let iata_code = iata_code.into_inner().trim().to_uppercase();
    let (start, end) = date_range(&query)?;

    let airport = lookup
        .resolve_location(&iata_code)
        .ok_or_else(|| ApiError::not_found(format!("Unknown airport code {iata_code}")))?;

    let samples = climate
        .fetch_daily(airport.latitude, airport.longitude, start, end)
        .await
        .map_err(|e| {
            warn!(iata_code = %iata_code, error = %e, "Climate provider request failed");
            ApiError::Upstream(e.user_message())
        })?;

    let summary = summarize(&samples).map_err(|e| match e {
        ClimateError::NoData => ApiError::not_found(format!(
            "No climate data available for {iata_code} between {start} and {end}"
        )),
    })?;

    info!(
        iata_code = %iata_code,
        days = summary.total_days,
        dominant = summary.dominant_condition.map(|c| c.as_str()),
        "Climate summary computed"
    );

    Ok(web::Json(WeatherResponse {
        iata_code,
        city_name: airport.city.clone(),
        country_name: airport.country_name.clone(),
        latitude: airport.latitude,
        longitude: airport.longitude,
        start_date: start.to_string(),
        end_date: end.to_string(),
        summary,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(departure: Option<&str>, ret: Option<&str>) -> WeatherQuery {
        WeatherQuery {
            departure_date: departure.map(str::to_string),
            return_date: ret.map(str::to_string),
        }
    }

    #[test]
    fn test_date_range_accepts_single_day() {
        let (start, end) = date_range(&query(Some("2025-06-12"), Some("2025-06-12"))).unwrap();
        assert_eq!(start, end);
    }

    #[test]
    fn test_date_range_rejects_missing_and_reversed() {
        assert!(matches!(
            date_range(&query(None, Some("2025-06-12"))),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            date_range(&query(Some("2025-06-19"), Some("2025-06-12"))),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            date_range(&query(Some("12/06/2025"), Some("2025-06-19"))),
            Err(ApiError::Validation(_))
        ));
    }
}
