//! End-to-end tests for the weather endpoint.
//!
//! A local actix server stands in for the climate provider so the whole path
//! (airport lookup, outbound request, cache, aggregation) runs offline.

use actix_web::{App, HttpResponse, HttpServer, http::StatusCode, test, web};
use chrono::NaiveDate;
use flight_track_api::{
    AppConfig, AppState, ClimateApiConfig, ClimateClient, ClimateClientError, DataConfig,
    create_app,
};
use serde_json::{Value, json};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

#[derive(Default)]
struct ProviderHits {
    ok: AtomicUsize,
    flaky: AtomicUsize,
}

/// Three days: clear and sunny, wet and overcast, mild and partly cloudy
fn three_day_series() -> Value {
    json!({
        "latitude": 40.5,
        "longitude": -3.5,
        "daily": {
            "time": ["2025-06-12", "2025-06-13", "2025-06-14"],
            "temperature_2m_mean": [20.0, 22.0, null],
            "temperature_2m_max": [26.0, 25.0, 24.0],
            "temperature_2m_min": [14.0, 17.0, 15.0],
            "relative_humidity_2m_mean": [40.0, 85.0, 60.0],
            "relative_humidity_2m_max": [55.0, 95.0, 75.0],
            "relative_humidity_2m_min": [25.0, 70.0, 45.0],
            "wind_speed_10m_mean": [18.0, 18.0, 18.0],
            "wind_speed_10m_max": [36.0, 36.0, 36.0],
            "cloud_cover_mean": [10.0, 80.0, 35.0],
            "shortwave_radiation_sum": [25.0, 5.0, 12.0],
            "rain_sum": [0.0, 5.2, 0.5],
            "snowfall_sum": [0.0, 0.0, 0.0]
        }
    })
}

async fn ok_climate(hits: web::Data<ProviderHits>) -> HttpResponse {
    hits.ok.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(three_day_series())
}

async fn flaky_climate(hits: web::Data<ProviderHits>) -> HttpResponse {
    if hits.flaky.fetch_add(1, Ordering::SeqCst) == 0 {
        HttpResponse::ServiceUnavailable().finish()
    } else {
        HttpResponse::Ok().json(three_day_series())
    }
}

async fn rejecting_climate() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "error": true,
        "reason": "Parameter 'start_date' is out of allowed range"
    }))
}

async fn no_daily_climate() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "latitude": 40.5, "longitude": -3.5 }))
}

async fn empty_climate() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "daily": { "time": [] } }))
}

/// Start the stand-in provider on an ephemeral port and return its base URL
fn start_provider(hits: Arc<ProviderHits>) -> String {
    let hits = web::Data::from(hits);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(hits.clone())
            .route("/ok/climate", web::get().to(ok_climate))
            .route("/flaky/climate", web::get().to(flaky_climate))
            .route("/rejects/climate", web::get().to(rejecting_climate))
            .route("/nodaily/climate", web::get().to(no_daily_climate))
            .route("/empty/climate", web::get().to(empty_climate))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind provider stand-in");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

fn climate_config(base_url: String) -> ClimateApiConfig {
    let mut config = ClimateApiConfig::with_base_url(base_url);
    config.client.request_timeout_seconds = 5;
    config.client.connect_timeout_seconds = 1;
    config.client.retry.max_retries = 2;
    config.client.retry.initial_delay_ms = 10;
    config.client.retry.max_delay_ms = 50;
    config
}

fn app_config(climate: ClimateApiConfig) -> AppConfig {
    AppConfig {
        data: DataConfig::with_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/data")),
        climate,
        ..AppConfig::default()
    }
}

macro_rules! test_app {
    ($config:expr) => {{
        let config = $config;
        let state = AppState::from_config(&config).expect("Failed to build app state");
        test::init_service(create_app(state, &config)).await
    }};
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[actix_web::test]
async fn test_weather_summary_end_to_end() {
    let hits = Arc::new(ProviderHits::default());
    let base = start_provider(hits.clone());
    let app = test_app!(app_config(climate_config(format!("{base}/ok"))));

    let req = test::TestRequest::get()
        .uri("/api/weather/mad?departureDate=2025-06-12&returnDate=2025-06-14")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["iata_code"], "MAD");
    assert_eq!(json["city_name"], "Madrid");
    assert_eq!(json["start_date"], "2025-06-12");
    assert_eq!(json["end_date"], "2025-06-14");

    let summary = &json["summary"];
    assert_eq!(summary["total_days"], 3);
    // The null temperature is left out of the mean
    assert_eq!(summary["average_temperature"], 21.0);
    assert_eq!(summary["average_temperature_max"], 25.0);
    assert_eq!(summary["average_humidity"], 61.7);
    assert_eq!(summary["wind"]["beaufort_number"], 3);
    assert_eq!(summary["wind"]["description"], "Gentle Breeze");
    assert_eq!(summary["average_humidity_max"], 75.0);
    assert_eq!(summary["average_humidity_min"], 46.7);
    assert_eq!(summary["average_wind_max_ms"], 10.0);
    assert_eq!(summary["monthly"][0]["month"], 6);
    assert_eq!(summary["monthly"][0]["days"], 3);

    // Every bucket has one day, so the tie goes to Rainy
    assert_eq!(summary["dominant_condition"], "Rainy");
    let breakdown = summary["weather_breakdown"].as_object().unwrap();
    assert_eq!(breakdown.len(), 4);
    assert_eq!(breakdown["Partly Cloudy"]["days"], 1);
    assert_eq!(breakdown["Sunny"]["percentage"], 33.3);
    assert!(breakdown.get("Snowy").is_none());

    let daily = summary["daily"].as_array().unwrap();
    assert_eq!(daily[1]["conditions"], json!(["Rainy", "Cloudy"]));
    assert_eq!(daily[2]["temperature_mean"], 0.0);

    assert_eq!(hits.ok.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_weather_repeated_request_is_served_from_cache() {
    let hits = Arc::new(ProviderHits::default());
    let base = start_provider(hits.clone());
    let app = test_app!(app_config(climate_config(format!("{base}/ok"))));

    for _ in 0..3 {
        let req = test::TestRequest::get()
            .uri("/api/weather/BCN?departureDate=2025-06-12&returnDate=2025-06-14")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    assert_eq!(hits.ok.load(Ordering::SeqCst), 1);

    // A different window is a different cache entry
    let req = test::TestRequest::get()
        .uri("/api/weather/BCN?departureDate=2025-06-12&returnDate=2025-06-13")
        .to_request();
    test::call_service(&app, req).await;
    assert_eq!(hits.ok.load(Ordering::SeqCst), 2);

    let req = test::TestRequest::get().uri("/api/metrics").to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let output = std::str::from_utf8(&body).unwrap();
    assert!(output.contains("climate_cache_lookups_total{outcome=\"hit\"} 2"));
    assert!(output.contains("climate_cache_lookups_total{outcome=\"miss\"} 2"));
}

#[actix_web::test]
async fn test_weather_retries_transient_provider_failure() {
    let hits = Arc::new(ProviderHits::default());
    let base = start_provider(hits.clone());
    let app = test_app!(app_config(climate_config(format!("{base}/flaky"))));

    let req = test::TestRequest::get()
        .uri("/api/weather/CDG?departureDate=2025-06-12&returnDate=2025-06-14")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(hits.flaky.load(Ordering::SeqCst), 2);
}

#[actix_web::test]
async fn test_weather_provider_rejection_is_upstream_error() {
    let base = start_provider(Arc::default());
    let app = test_app!(app_config(climate_config(format!("{base}/rejects"))));

    let req = test::TestRequest::get()
        .uri("/api/weather/JFK?departureDate=2025-06-12&returnDate=2025-06-14")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["error"], "upstream_error");
    assert!(
        json["detail"]
            .as_str()
            .unwrap()
            .contains("out of allowed range")
    );
}

#[actix_web::test]
async fn test_weather_missing_daily_block_is_upstream_error() {
    let base = start_provider(Arc::default());
    let app = test_app!(app_config(climate_config(format!("{base}/nodaily"))));

    let req = test::TestRequest::get()
        .uri("/api/weather/KEF?departureDate=2025-08-01&returnDate=2025-08-08")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_weather_empty_series_is_not_found() {
    let base = start_provider(Arc::default());
    let app = test_app!(app_config(climate_config(format!("{base}/empty"))));

    let req = test::TestRequest::get()
        .uri("/api/weather/NRT?departureDate=2025-09-14&returnDate=2025-09-28")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json: Value = test::read_body_json(resp).await;
    assert!(json["detail"].as_str().unwrap().contains("No climate data"));
}

#[actix_web::test]
async fn test_weather_unreachable_provider_is_upstream_error() {
    let mut climate = ClimateApiConfig::with_base_url("http://127.0.0.1:9/v1");
    climate.client.retry.max_retries = 0;
    let app = test_app!(app_config(climate));

    let req = test::TestRequest::get()
        .uri("/api/weather/AMS?departureDate=2025-06-12&returnDate=2025-06-15")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = test::read_body_json(resp).await;
    assert!(json["detail"].as_str().unwrap().contains("unavailable"));
}

#[actix_web::test]
async fn test_weather_unknown_airport_is_not_found() {
    let app = test_app!(app_config(ClimateApiConfig::with_base_url(
        "http://127.0.0.1:9/v1"
    )));

    let req = test::TestRequest::get()
        .uri("/api/weather/ZZZ?departureDate=2025-06-12&returnDate=2025-06-15")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["detail"], "Unknown airport code ZZZ");
}

#[actix_web::test]
async fn test_weather_invalid_dates_are_rejected() {
    let app = test_app!(app_config(ClimateApiConfig::with_base_url(
        "http://127.0.0.1:9/v1"
    )));

    for uri in [
        "/api/weather/MAD?departureDate=2025-13-01&returnDate=2025-06-15",
        "/api/weather/MAD?departureDate=2025-06-20&returnDate=2025-06-15",
        "/api/weather/MAD?returnDate=2025-06-15",
        "/api/weather/MAD",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[actix_web::test]
async fn test_climate_client_reports_provider_status() {
    let base = start_provider(Arc::default());
    let client = ClimateClient::new(climate_config(format!("{base}/rejects")), None).unwrap();

    let err = client
        .fetch_daily(52.31, 4.76, date("2025-06-12"), date("2025-06-15"))
        .await
        .unwrap_err();

    match err {
        ClimateClientError::Status { status, reason } => {
            assert_eq!(status, 400);
            assert!(reason.contains("start_date"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[actix_web::test]
async fn test_climate_client_gives_up_on_stalled_body() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    actix_web::rt::spawn(async move {
        let mut held = Vec::new();
        while let Ok((mut socket, _)) = listener.accept().await {
            let head = "HTTP/1.1 200 OK\r\nContent-Length: 4096\r\n\r\n{\"daily\":{\"time\":[";
            if socket.write_all(head.as_bytes()).await.is_ok() {
                held.push(socket);
            }
        }
    });

    let mut config = climate_config(format!("http://{addr}"));
    config.client.request_timeout_seconds = 1;
    config.client.retry.max_retries = 0;
    let client = ClimateClient::new(config, None).unwrap();

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        client.fetch_daily(52.31, 4.76, date("2025-06-12"), date("2025-06-15")),
    )
    .await
    .expect("fetch should not hang on a stalled provider");

    let err = result.unwrap_err();
    assert!(matches!(err, ClimateClientError::Request(_)), "{err}");
    assert!(err.user_message().contains("unavailable"));
}
