//! OpenAPI specification generation and app factory.

use crate::{
    config::AppConfig,
    handlers::{
        advisory, destination_advisories, flights, get_metrics, health, index, version, visa,
        visa_batch, weather,
    },
    middleware::{MetricsMiddleware, RequestIdMiddleware, cors_middleware},
    services::{AppMetrics, ClimateClient, LookupService, ReferenceData},
};
use actix_web::{
    App,
    body::{BoxBody, EitherBody},
};
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};
use std::sync::Arc;

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Flight Track API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Flight destination search with travel advisories, visa requirements and \
                destination climate summaries.\n\n\
                ## Data sources\n\
                - Flights, airports, advisories and visa requirements are static datasets \
                loaded once at start-up.\n\
                - Climate summaries are computed from the Open-Meteo climate projection API \
                and cached per location and date window.\n\
                \n\
                ## Dates\n\
                All dates use the `YYYY-MM-DD` format. Invalid dates are rejected with 400."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Shared state handed to every worker
#[derive(Clone)]
pub struct AppState {
    pub lookup: LookupService,
    pub climate: ClimateClient,
    pub metrics: AppMetrics,
}

impl AppState {
    /// Load the reference datasets named by `config` and build the services
    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        Self::with_data(ReferenceData::load(&config.data), config)
    }

    /// Build the services around already loaded reference data
    pub fn with_data(data: ReferenceData, config: &AppConfig) -> Result<Self, String> {
        let metrics = AppMetrics::new().map_err(|e| format!("Failed to create metrics: {e}"))?;
        let climate = ClimateClient::new(config.climate.clone(), Some(metrics.clone()))?;

        Ok(Self {
            lookup: LookupService::new(Arc::new(data)),
            climate,
            metrics,
        })
    }
}

/// Creates the application with every route, middleware and the OpenAPI spec
///
/// API routes live under `config.server.api_prefix`; the welcome message is
/// served at `/`. Used by `main` for each worker and by the integration tests.
pub fn create_app(
    state: AppState,
    config: &AppConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let prefix = config.server.api_prefix.clone();
    let route = |path: &str| format!("{prefix}{path}");

    App::new()
        .wrap(cors_middleware(&config.cors))
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::new(config.server.clone()))
        .app_data(web::Data::new(state.lookup))
        .app_data(web::Data::new(state.climate))
        .app_data(web::Data::new(state.metrics))
        .service(web::resource("/").route(web::get().to(index)))
        .service(web::resource(&route("/health")).route(web::get().to(health)))
        .service(web::resource(&route("/version")).route(web::get().to(version)))
        .service(web::resource(&route("/metrics")).route(web::get().to(get_metrics)))
        .service(web::resource(&route("/flights")).route(web::get().to(flights)))
        .service(web::resource(&route("/flights/forlondon")).route(web::get().to(flights)))
        .service(web::resource(&route("/advisory/{country_code}")).route(web::get().to(advisory)))
        .service(web::resource(&route("/visa")).route(web::get().to(visa_batch)))
        .service(web::resource(&route("/visa/{country_code}")).route(web::get().to(visa)))
        .service(
            web::resource(&route("/destinations/advisory"))
                .route(web::get().to(destination_advisories)),
        )
        .service(web::resource(&route("/weather/{iata_code}")).route(web::get().to(weather)))
        .with_json_spec_at(&route("/spec/v2"))
        .build()
}
