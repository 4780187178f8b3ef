//! CORS middleware built from [`CorsConfig`].

use crate::config::CorsConfig;
use actix_cors::Cors;

/// Builds the CORS middleware for the configured origins.
///
/// Requests from other origins still reach the handlers; they just get no
/// CORS headers, so the browser blocks the response. Preflight `OPTIONS`
/// requests are answered by the middleware without reaching a handler.
pub fn cors_middleware(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(config.max_age_seconds as usize)
        .block_on_origin_mismatch(false);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}
