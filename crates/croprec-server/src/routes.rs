//! HTTP routes and handlers

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use croprec_core::{Label, PredictionRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{debug, error, warn};

use crate::service::PredictionService;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/predict", post(predict))
        .route("/predict/batch", post(predict_batch))
        .fallback(fallback)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Response for `/predict`: the first row's label only
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub recommended_crop: Label,
}

/// Response for `/predict/batch`: one label per input row
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchPredictionResponse {
    pub recommended_crops: Vec<Label>,
}

async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, AppError> {
    debug!("Received prediction request with {} columns", req.columns.len());

    let recommended_crop = state.service.predict_first(&req)?;
    debug!("Recommended crop: {}", recommended_crop);

    Ok(Json(PredictionResponse { recommended_crop }))
}

async fn predict_batch(
    State(state): State<AppState>,
    Json(req): Json<PredictionRequest>,
) -> Result<Json<BatchPredictionResponse>, AppError> {
    let recommended_crops = state.service.predict_all(&req)?;
    debug!("Batch prediction produced {} labels", recommended_crops.len());

    Ok(Json(BatchPredictionResponse { recommended_crops }))
}

async fn fallback() -> AppError {
    AppError::NotFound
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    NotFound,
    InternalError(String),
}

impl From<croprec_core::Error> for AppError {
    fn from(err: croprec_core::Error) -> Self {
        if err.is_client_error() {
            warn!("Rejected prediction request: {}", err);
            AppError::InvalidRequest(err.to_string())
        } else {
            error!("Prediction failed: {}", err);
            AppError::InternalError(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request_error", msg),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "invalid_request_error",
                "Not found".to_string(),
            ),
            AppError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        let body = json!({
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
