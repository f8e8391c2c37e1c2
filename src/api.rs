//! JSON endpoints of the advisor, mounted under `/api`

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use crate::{
    AdvisorError,
    district::resolve_and_summarize,
    models::DistrictOutcome,
    recommender::{
        CropRecommendation, DEFAULT_TOP_N, FieldConditions, SymptomRecommendations,
        generate_recommendations, recommend_from_field, recommend_manual, split_symptoms,
    },
    sensors::{SensorReading, SensorStore},
    weather::ForecastProvider,
};

/// Shared handles for every request
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ForecastProvider>,
    pub store: Arc<SensorStore>,
}

impl AppState {
    pub fn new(provider: Arc<dyn ForecastProvider>, store: Arc<SensorStore>) -> Self {
        Self { provider, store }
    }
}

/// Errors surfaced to API clients as `{"error": ...}`
#[derive(Debug)]
pub enum ApiError {
    Advisor(AdvisorError),
    Task(tokio::task::JoinError),
}

impl From<AdvisorError> for ApiError {
    fn from(err: AdvisorError) -> Self {
        ApiError::Advisor(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Task(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Advisor(err) => {
                let status = match err {
                    AdvisorError::NotFound { .. } => StatusCode::NOT_FOUND,
                    AdvisorError::Validation { .. } => StatusCode::BAD_REQUEST,
                    AdvisorError::Upstream { .. } => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                warn!("Request failed: {}", err);
                (status, err.user_message())
            }
            ApiError::Task(err) => {
                error!("Blocking task failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather/{district}", get(get_weather))
        .route("/sensors", get(get_sensors))
        .route("/sensors/history", get(get_sensor_history))
        .route(
            "/recommend/crop",
            get(get_crop_recommendation).post(post_crop_recommendation),
        )
        .route("/recommend/symptoms", post(post_symptoms))
        .with_state(state)
}

async fn get_weather(
    State(state): State<AppState>,
    Path(district): Path<String>,
) -> Result<(StatusCode, Json<DistrictOutcome>), ApiError> {
    let provider = Arc::clone(&state.provider);
    let outcome =
        tokio::task::spawn_blocking(move || resolve_and_summarize(provider.as_ref(), &district))
            .await??;

    let status = if outcome.is_error() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

async fn get_sensors(State(state): State<AppState>) -> Json<Vec<SensorReading>> {
    Json(state.store.latest())
}

async fn get_sensor_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<SensorReading>>, ApiError> {
    let store = Arc::clone(&state.store);
    let rows = tokio::task::spawn_blocking(move || store.read_history()).await??;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
struct TopN {
    top_n: Option<usize>,
}

async fn get_crop_recommendation(
    State(state): State<AppState>,
    Query(params): Query<TopN>,
) -> Result<Json<CropRecommendation>, ApiError> {
    let top_n = params.top_n.unwrap_or(DEFAULT_TOP_N);
    let recommendation = tokio::task::spawn_blocking(move || {
        recommend_from_field(&state.store, state.provider.as_ref(), top_n)
    })
    .await??;
    Ok(Json(recommendation))
}

#[derive(Debug, Deserialize)]
struct ManualCropRequest {
    #[serde(flatten)]
    conditions: FieldConditions,
    top_n: Option<usize>,
}

async fn post_crop_recommendation(
    Json(request): Json<ManualCropRequest>,
) -> Json<CropRecommendation> {
    let top_n = request.top_n.unwrap_or(DEFAULT_TOP_N);
    Json(recommend_manual(request.conditions, top_n))
}

/// Symptoms as a JSON list or a single comma-separated string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SymptomInput {
    List(Vec<String>),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct SymptomRequest {
    symptoms: SymptomInput,
}

async fn post_symptoms(
    Json(request): Json<SymptomRequest>,
) -> Result<Json<SymptomRecommendations>, ApiError> {
    let symptoms = match request.symptoms {
        SymptomInput::List(list) => list,
        SymptomInput::Text(text) => split_symptoms(&text),
    };
    if symptoms.iter().all(|s| s.trim().is_empty()) {
        return Err(AdvisorError::validation("no symptoms given").into());
    }
    Ok(Json(generate_recommendations(&symptoms)))
}
