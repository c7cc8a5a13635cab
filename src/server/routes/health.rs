//! Service description and health routes

use crate::anonymization::models::EngineInfo;
use crate::server::error::ApiError;
use crate::server::state::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Health check body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub engines: Vec<EngineInfo>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/info", get(info))
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "PiiGuard",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "PII detection and text, PDF and image anonymization",
        "endpoints": {
            "health": "/health",
            "info": "/info",
            "analyze": "/api/v1/analyze",
            "anonymize": "/api/v1/anonymize",
            "batch": "/api/v1/batch",
            "deanonymize": "/api/v1/deanonymize",
            "engines": "/api/v1/engines",
            "advanced": "/api/v1/extended/anonymize/advanced",
            "pdf_text": "/api/v1/extended/anonymize/pdf/text",
            "pdf_ocr": "/api/v1/extended/anonymize/pdf/ocr",
            "pdf_mixed": "/api/v1/extended/anonymize/pdf/mixed",
            "image": "/api/v1/extended/anonymize/image",
            "capabilities": "/api/v1/extended/capabilities"
        }
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    match state.service.health().await {
        Ok(engine) => Ok(Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            engines: vec![engine],
        })),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            Err(ApiError::Unavailable {
                detail: state.config.application.debug.then(|| e.to_string()),
            })
        }
    }
}

async fn info(State(state): State<Arc<AppState>>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "api": {
            "name": "PiiGuard",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "configuration": {
            "engine_mode": config.engine.mode.to_string(),
            "supported_languages": config.engine.supported_languages,
            "max_file_size": config.server.max_file_size,
            "debug": config.application.debug,
        },
        "features": {
            "text_anonymization": true,
            "batch_processing": true,
            "deanonymization": true,
            "pdf_processing": true,
            "image_redaction": true,
            "ocr": true,
        }
    }))
}
