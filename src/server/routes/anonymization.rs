//! Text analysis and anonymization routes

use crate::anonymization::models::{
    AnalyzeRequest, AnalyzeResponse, AnonymizeRequest, AnonymizeResponse,
    BatchAnonymizeRequest, BatchAnonymizeResponse, DeanonymizeRequest, DeanonymizeResponse,
    EngineInfo,
};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/anonymize", post(anonymize))
        .route("/batch", post(batch))
        .route("/deanonymize", post(deanonymize))
        .route("/engines", get(engines))
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    input: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = input?;
    state
        .service
        .analyze(&request)
        .await
        .map(Json)
        .map_err(|e| state.api_error(e))
}

async fn anonymize(
    State(state): State<Arc<AppState>>,
    input: Result<Json<AnonymizeRequest>, JsonRejection>,
) -> Result<Json<AnonymizeResponse>, ApiError> {
    let Json(request) = input?;
    state
        .service
        .anonymize(&request)
        .await
        .map(Json)
        .map_err(|e| state.api_error(e))
}

async fn batch(
    State(state): State<Arc<AppState>>,
    input: Result<Json<BatchAnonymizeRequest>, JsonRejection>,
) -> Result<Json<BatchAnonymizeResponse>, ApiError> {
    let Json(request) = input?;
    state
        .service
        .anonymize_batch(&request)
        .await
        .map(Json)
        .map_err(|e| state.api_error(e))
}

async fn deanonymize(
    State(state): State<Arc<AppState>>,
    input: Result<Json<DeanonymizeRequest>, JsonRejection>,
) -> Result<Json<DeanonymizeResponse>, ApiError> {
    let Json(request) = input?;
    state
        .service
        .deanonymize(&request)
        .await
        .map(Json)
        .map_err(|e| state.api_error(e))
}

async fn engines(State(state): State<Arc<AppState>>) -> Result<Json<EngineInfo>, ApiError> {
    state
        .service
        .engine_info()
        .await
        .map(Json)
        .map_err(|e| state.api_error(e))
}
