//! Root endpoint handler.

use crate::models::WelcomeResponse;
use actix_web::{Error, Result, web};
use paperclip::actix::api_v2_operation;

pub const WELCOME_MESSAGE: &str = "Welcome to the Flight Data and Weather API!";

/// Welcome message for anyone hitting the bare host
#[api_v2_operation(
    summary = "Welcome Endpoint",
    description = "Returns a short welcome message.",
    tags("Root"),
    responses(
        (status = 200, description = "Successful response", body = WelcomeResponse)
    )
)]
pub async fn index() -> Result<web::Json<WelcomeResponse>, Error> {
    Ok(web::Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    }))
}
