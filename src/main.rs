use actix_web::HttpServer;
use flight_track_api::{AppConfig, AppState, create_app, telemetry};
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing().map_err(std::io::Error::other)?;

    let config = AppConfig::from_env();
    let state = AppState::from_config(&config).map_err(std::io::Error::other)?;
    let bind_address = config.server.bind_address();

    info!(
        bind_address = %bind_address,
        api_prefix = %config.server.api_prefix,
        climate_api = %config.climate.base_url,
        "Server starting"
    );

    HttpServer::new(move || create_app(state.clone(), &config))
        .bind(&bind_address)?
        .run()
        .await
}
