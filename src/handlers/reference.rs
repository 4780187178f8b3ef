//! Advisory, visa and destination endpoint handlers.

use crate::{
    error::ApiError,
    models::{
        AdvisoryResponse, DestinationAdvisoriesResponse, VisaBatchQuery, VisaBatchResponse,
        VisaRequirements,
    },
    services::{LookupService, parse_code_list},
};
use actix_web::{Error, Result, web};
use paperclip::actix::api_v2_operation;

/// Travel advisory for a single country
#[api_v2_operation(
    summary = "Country Advisory Endpoint",
    description = "Returns the travel advisory text for an ISO 3166-1 alpha-2 country code (case-insensitive).",
    tags("Reference"),
    responses(
        (status = 200, description = "Successful response", body = AdvisoryResponse),
        (status = 404, description = "Unknown country code or advisory data unavailable")
    )
)]
pub async fn advisory(
    lookup: web::Data<LookupService>,
    country_code: web::Path<String>,
) -> Result<web::Json<AdvisoryResponse>, Error> {
    let code = country_code.into_inner();
    let text = lookup.advisory(&code)?;

    Ok(web::Json(AdvisoryResponse {
        country_code: code.trim().to_lowercase(),
        advisory: text.to_string(),
    }))
}

/// Visa requirements for holders of one passport
#[api_v2_operation(
    summary = "Visa Requirements Endpoint",
    description = "Returns the destination-to-requirement map for holders of the given passport country (case-insensitive).",
    tags("Reference"),
    responses(
        (status = 200, description = "Successful response", body = VisaRequirements),
        (status = 404, description = "Unknown country code or visa data unavailable")
    )
)]
pub async fn visa(
    lookup: web::Data<LookupService>,
    country_code: web::Path<String>,
) -> Result<web::Json<VisaRequirements>, Error> {
    let requirements = lookup.visa_requirements_for(&country_code)?;
    Ok(web::Json(requirements.clone()))
}

/// Visa requirements for several passports at once
///
/// Unknown codes are kept in the response with a null entry so callers can
/// tell "not found" apart from "not asked".
#[api_v2_operation(
    summary = "Batch Visa Requirements Endpoint",
    description = "Returns visa requirements for a comma-separated list of passport country codes. Unknown codes map to null.",
    tags("Reference"),
    parameters(
        ("countryCodes" = String, Query, description = "Comma-separated ISO codes, e.g. US,GB"),
    ),
    responses(
        (status = 200, description = "Successful response", body = VisaBatchResponse),
        (status = 400, description = "No country codes supplied"),
        (status = 404, description = "Visa data unavailable")
    )
)]
pub async fn visa_batch(
    lookup: web::Data<LookupService>,
    query: web::Query<VisaBatchQuery>,
) -> Result<web::Json<VisaBatchResponse>, Error> {
    let codes = query
        .country_codes
        .as_deref()
        .map(parse_code_list)
        .unwrap_or_default();

    if codes.is_empty() {
        return Err(ApiError::validation("countryCodes must list at least one country code").into());
    }

    let response = lookup.visa_requirements_batch(&codes)?;
    Ok(web::Json(response))
}

/// Advisories for every destination served by the flight dataset
#[api_v2_operation(
    summary = "Destination Advisories Endpoint",
    description = "Returns the travel advisory for each distinct flight destination, plus the destinations that could not be matched to an advisory.",
    tags("Reference"),
    responses(
        (status = 200, description = "Successful response", body = DestinationAdvisoriesResponse),
        (status = 404, description = "Flight or advisory data unavailable")
    )
)]
pub async fn destination_advisories(
    lookup: web::Data<LookupService>,
) -> Result<web::Json<DestinationAdvisoriesResponse>, Error> {
    let response = lookup.destination_advisories()?;
    Ok(web::Json(response))
}
