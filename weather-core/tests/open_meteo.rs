//! Integration tests for the open-meteo client and the cached pipeline using wiremock.

use std::sync::Arc;

use weather_core::{
    Config, ErrorKind, Geocoder, OpenMeteoClient, Pipeline, RequestCache, RetryPolicy,
    SystemClock, WeatherError, cache::DEFAULT_TTL,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config {
        geocoding_url: format!("{}/v1/search", server.uri()),
        reverse_geocoding_url: format!("{}/v1/search", server.uri()),
        forecast_url: format!("{}/v1/forecast", server.uri()),
        ..Config::default()
    }
}

fn cache_for(server: &MockServer) -> RequestCache {
    let client = Arc::new(OpenMeteoClient::new(&config_for(server)).expect("client"));
    let pipeline = Pipeline::new(client.clone(), client, RetryPolicy::immediate(2));
    RequestCache::new(pipeline, Arc::new(SystemClock), DEFAULT_TTL)
}

fn geocode_body(name: &str, country: &str, lat: f64, lon: f64) -> serde_json::Value {
    serde_json::json!({
        "results": [
            { "id": 1, "name": name, "country": country, "latitude": lat, "longitude": lon }
        ],
        "generationtime_ms": 0.6
    })
}

fn forecast_body(hours: usize, days: usize) -> serde_json::Value {
    serde_json::json!({
        "latitude": 48.86,
        "longitude": 2.36,
        "timezone": "Europe/Paris",
        "current": {
            "time": "2025-03-01T12:00",
            "temperature_2m": 12.5,
            "relative_humidity_2m": 71,
            "apparent_temperature": 11.0,
            "weather_code": 61,
            "surface_pressure": 1003.2,
            "wind_speed_10m": 14.4,
            "uv_index": 3.1
        },
        "hourly": {
            "time": (0..hours).map(|h| format!("2025-03-01T{:02}:00", h % 24)).collect::<Vec<_>>(),
            "temperature_2m": (0..hours).map(|h| h as f64).collect::<Vec<_>>(),
            "weathercode": vec![61; hours]
        },
        "daily": {
            "time": (0..days).map(|d| format!("2025-03-{:02}", d + 1)).collect::<Vec<_>>(),
            "weathercode": vec![3; days],
            "temperature_2m_max": vec![15.0; days],
            "temperature_2m_min": vec![6.0; days]
        }
    })
}

async fn mount_forecast(server: &MockServer, body: serde_json::Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn forward_geocode_requests_single_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Paris"))
        .and(query_param("count", "1"))
        .and(query_param("language", "en"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body("Paris", "France", 48.85, 2.35)))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenMeteoClient::new(&config_for(&server)).expect("client");
    let location = client.forward("Paris").await.expect("request").expect("one match");

    assert_eq!(location.name, "Paris");
    assert_eq!(location.country, "France");
    assert_eq!(location.lat, 48.85);
}

#[tokio::test]
async fn unknown_place_is_not_found_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "generationtime_ms": 0.3 })))
        .expect(1)
        .mount(&server)
        .await;
    mount_forecast(&server, forecast_body(24, 7), 0).await;

    let err = cache_for(&server).load("Atlantis").await.unwrap_err();

    assert_eq!(err, WeatherError::NotFound("Atlantis".into()));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn coordinates_use_reverse_geocoding_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body("Wrong", "Nowhere", 0.0, 0.0)))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("latitude", "4.71"))
        .and(query_param("longitude", "-74.07"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body("Bogotá", "Colombia", 4.71, -74.07)))
        .expect(1)
        .mount(&server)
        .await;
    mount_forecast(&server, forecast_body(24, 7), 1).await;

    let snapshot = cache_for(&server).load("4.71,-74.07").await.expect("load");

    assert_eq!(snapshot.location.name, "Bogotá");
    assert_eq!(snapshot.location.country, "Colombia");
}

#[tokio::test]
async fn empty_reverse_result_degrades_to_unknown_location() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;
    mount_forecast(&server, forecast_body(24, 7), 1).await;

    let snapshot = cache_for(&server).load("-10.5,20.25").await.expect("load");

    assert_eq!(snapshot.location.name, "Unknown location");
    assert_eq!(snapshot.location.country, "");
    assert_eq!(snapshot.location.lat, -10.5);
}

#[tokio::test]
async fn forecast_request_carries_field_groups() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body("Paris", "France", 48.85, 2.35)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "48.85"))
        .and(query_param("longitude", "2.35"))
        .and(query_param("hourly", "temperature_2m,weathercode"))
        .and(query_param("daily", "weathercode,temperature_2m_max,temperature_2m_min"))
        .and(query_param(
            "current",
            "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,surface_pressure,wind_speed_10m,uv_index",
        ))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(168, 7)))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = cache_for(&server).load("Paris").await.expect("load");

    assert_eq!(snapshot.forecast.hourly.len(), 168);
    assert_eq!(snapshot.forecast.daily.len(), 7);
    assert_eq!(snapshot.current.humidity, 71.0);
    assert_eq!(snapshot.current.weather_code, 61);
}

#[tokio::test]
async fn server_errors_are_retried_twice_then_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body("Paris", "France", 48.85, 2.35)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({ "error": true, "reason": "upstream" })))
        .expect(3)
        .mount(&server)
        .await;

    let err = cache_for(&server).load("Paris").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert!(matches!(err, WeatherError::Provider { status: Some(500), .. }));
    assert!(err.to_string().contains("upstream"), "error should carry body: {err}");
}

#[tokio::test]
async fn mismatched_series_fail_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body("Paris", "France", 48.85, 2.35)))
        .mount(&server)
        .await;

    let mut body = forecast_body(24, 7);
    body["daily"]["temperature_2m_max"] = serde_json::json!([15.0, 16.0]);
    mount_forecast(&server, body, 1).await;

    let err = cache_for(&server).load("Paris").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[tokio::test]
async fn missing_series_is_a_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body("Paris", "France", 48.85, 2.35)))
        .mount(&server)
        .await;

    let mut body = forecast_body(24, 7);
    body.as_object_mut().expect("object").remove("hourly");
    mount_forecast(&server, body, 3).await;

    let err = cache_for(&server).load("Paris").await.unwrap_err();

    assert!(err.is_transient());
    assert!(err.to_string().contains("parse"), "unexpected error: {err}");
}
