//! Integration tests for the farmcast advisor

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use farmcast::api::AppState;
use farmcast::sensors::{SensorKind, SensorReading};
use farmcast::{
    AdvisorError, DistrictOutcome, ForecastProvider, HourlySeries, Location, Result, Risk,
    Safety, SensorStore, resolve_and_summarize, web,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

struct FixedProvider(HourlySeries);

impl ForecastProvider for FixedProvider {
    fn fetch_hourly(&self, _location: &Location, _days: u32) -> Result<HourlySeries> {
        Ok(self.0.clone())
    }
}

struct DownProvider;

impl ForecastProvider for DownProvider {
    fn fetch_hourly(&self, _location: &Location, _days: u32) -> Result<HourlySeries> {
        Err(AdvisorError::upstream("connection refused"))
    }
}

/// Two days, listed out of order: a hot dry sunny day and a stormy overcast day
fn two_day_series() -> HourlySeries {
    let mut series = HourlySeries::default();
    for (date, temp, rain, wind, cloud) in [
        ("2025-06-02", 30.0, 3.0, 20.0, 95.0),
        ("2025-06-01", 41.0, 0.0, 5.0, 10.0),
    ] {
        for hour in 0..24 {
            series.time.push(format!("{date}T{hour:02}:00"));
            series.temperature.push(Some(if hour == 14 { temp } else { 25.0 }));
            series.precipitation.push(Some(rain));
            series.wind_speed.push(Some(wind));
            let sunny = cloud < 50.0 && (8..16).contains(&hour);
            series
                .shortwave_radiation
                .push(Some(if sunny { 500.0 } else { 0.0 }));
            series.cloud_cover.push(Some(cloud));
        }
    }
    series
}

#[test]
fn test_district_summary_is_sorted_and_classified() {
    let provider = FixedProvider(two_day_series());
    let outcome = resolve_and_summarize(&provider, "ranchi").unwrap();
    let report = outcome.report().expect("known district yields a report");

    assert_eq!(report.district, "Ranchi");
    let dates: Vec<&str> = report.daily_summary.iter().map(|d| d.date.as_str()).collect();
    assert_eq!(dates, vec!["2025-06-01", "2025-06-02"]);

    let hot = &report.daily_summary[0];
    assert_eq!(hot.max_temp, Some(41.0));
    assert_eq!(hot.total_rain, 0.0);
    assert_eq!(hot.sunlight_hours, 8);
    assert_eq!(hot.risks, vec![Risk::TooHot]);
    assert_eq!(hot.safety, Safety::Caution);

    let stormy = &report.daily_summary[1];
    assert_eq!(stormy.total_rain, 72.0);
    assert_eq!(stormy.sunlight_hours, 0);
    assert_eq!(
        stormy.risks,
        vec![
            Risk::HeavyRainfall,
            Risk::StrongWinds,
            Risk::LowSunlight,
            Risk::HighCloud
        ]
    );
    assert_eq!(stormy.safety, Safety::NotSafe);

    // Every hour of the stormy day breaches the hourly wind threshold
    assert_eq!(report.alerts.len(), 24);
    assert!(report.alerts.iter().all(|a| a.date == "2025-06-02"));
}

#[test]
fn test_safety_matches_risks_for_every_day() {
    let provider = FixedProvider(two_day_series());
    let outcome = resolve_and_summarize(&provider, "Bokaro").unwrap();
    for day in &outcome.report().unwrap().daily_summary {
        let hazardous = day.has_risk(Risk::HeavyRainfall) || day.has_risk(Risk::StrongWinds);
        assert_eq!(day.safety == Safety::NotSafe, hazardous);
        assert_eq!(day.safety == Safety::Safe, day.risks.is_empty());
    }
}

#[test]
fn test_summaries_are_deterministic() {
    let provider = FixedProvider(two_day_series());
    let first = serde_json::to_string(&resolve_and_summarize(&provider, "Dhanbad").unwrap());
    let second = serde_json::to_string(&resolve_and_summarize(&provider, "Dhanbad").unwrap());
    assert_eq!(first.unwrap(), second.unwrap());
}

#[test]
fn test_unknown_district_serializes_error_object() {
    let provider = FixedProvider(two_day_series());
    let outcome = resolve_and_summarize(&provider, "atlantis").unwrap();
    assert!(outcome.is_error());
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({ "error": "District 'Atlantis' not found." })
    );
}

#[test]
fn test_upstream_failure_is_not_an_outcome() {
    let result = resolve_and_summarize(&DownProvider, "Ranchi");
    assert!(matches!(result, Err(AdvisorError::Upstream { .. })));
}

fn app_with(
    provider: impl ForecastProvider + 'static,
) -> (TempDir, Arc<SensorStore>, axum::Router) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SensorStore::new(dir.path().join("iot_data.csv")));
    let state = AppState::new(Arc::new(provider), Arc::clone(&store));
    (dir, store, web::app(state))
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_weather_route() {
    let (_dir, _store, app) = app_with(FixedProvider(two_day_series()));
    let (status, body) = send(app, get("/api/weather/jamshedpur")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["district"], "Jamshedpur");
    assert_eq!(body["daily_summary"][0]["risks"], "Too Hot");
    assert_eq!(body["daily_summary"][0]["safety"], "Caution");
    assert_eq!(
        body["daily_summary"][1]["risks"],
        "Heavy Rainfall, Strong Winds, Low Sunlight, High Cloud"
    );
    assert_eq!(body["daily_summary"][1]["safety"], "Not Safe");
}

#[tokio::test]
async fn test_weather_route_errors() {
    let (_dir, _store, app) = app_with(FixedProvider(two_day_series()));
    let (status, body) = send(app, get("/api/weather/Atlantis")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "District 'Atlantis' not found." }));

    let (_dir, _store, app) = app_with(DownProvider);
    let (status, body) = send(app, get("/api/weather/Ranchi")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_sensor_routes() {
    let (_dir, store, app) = app_with(DownProvider);
    store
        .record(SensorReading::now(SensorKind::Humidity, "58"))
        .unwrap();

    let (status, body) = send(app.clone(), get("/api/sensors")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["Sensor"], "Humidity");
    assert_eq!(body[0]["Value"], "58");

    let (status, body) = send(app, get("/api/sensors/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_crop_routes() {
    let (_dir, store, app) = app_with(FixedProvider(two_day_series()));
    store
        .record(SensorReading::now(SensorKind::Temperature, "31"))
        .unwrap();
    store
        .record(SensorReading::now(SensorKind::SoilMoisture, "55"))
        .unwrap();

    let (status, body) = send(app.clone(), get("/api/recommend/crop?top_n=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["crops"], json!(["Rice"]));
    assert_eq!(body["inputs"]["Humidity"], 60.0);
    assert_eq!(body["inputs"]["Rainfall"], 0.0);

    let manual = json!({
        "Temperature": 27.0, "Humidity": 50.0, "Moisture": 30.0, "Pressure": 1010.0,
        "Rainfall": 0.0, "Wind": 2.0, "Cloud": 20.0
    });
    let (status, body) = send(app, post_json("/api/recommend/crop", manual)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["crops"], json!(["Wheat", "Cotton"]));
}

#[tokio::test]
async fn test_symptom_route() {
    let (_dir, _store, app) = app_with(DownProvider);
    let request = post_json(
        "/api/recommend/symptoms",
        json!({ "symptoms": "White powder on leaves, yellowing at leaf margins" }),
    );
    let (status, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["diseases"][0]["name"], "powdery mildew");
    assert_eq!(body["deficiencies"][0]["name"], "potassium deficiency");

    let empty = post_json("/api/recommend/symptoms", json!({ "symptoms": [] }));
    let (status, _) = send(app, empty).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
