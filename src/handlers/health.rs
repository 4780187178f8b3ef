//! Health check endpoint handler.

use crate::{
    models::{DatasetStatus, HealthResponse},
    services::LookupService,
};
use actix_web::{Error, Result, web};
use paperclip::actix::api_v2_operation;

/// Health check endpoint
///
/// Returns the current health status of the API along with which reference
/// datasets were loaded. A missing dataset does not make the service
/// unhealthy; the endpoints that need it answer 404 instead.
#[api_v2_operation(
    summary = "Health Check Endpoint",
    description = "Returns the current health status of the API and the reference datasets in memory.",
    tags("Health"),
    responses(
        (status = 200, description = "Successful response", body = HealthResponse)
    )
)]
pub async fn health(lookup: web::Data<LookupService>) -> Result<web::Json<HealthResponse>, Error> {
    let data = lookup.data();

    let response = HealthResponse {
        status: "healthy".to_string(),
        datasets: DatasetStatus {
            flights: data.flights().is_some(),
            advisories: data.advisories().is_some(),
            visas: data.visas().is_some(),
            airports: data.airport_count(),
        },
    };

    Ok(web::Json(response))
}
