//! Form, PDF and image routes

use crate::anonymization::config::AnonymizationStrategy;
use crate::anonymization::models::{AdvancedAnonymizeResponse, AnalyzeRequest};
use crate::core::document::{PdfMixedResponse, PdfOcrResponse, PdfTextResponse};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::server::upload::{attachment_name, read_upload, IMAGE_EXTENSIONS, PDF_EXTENSIONS};
use axum::extract::rejection::FormRejection;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/anonymize/advanced", post(anonymize_advanced))
        .route("/anonymize/pdf/text", post(pdf_text))
        .route("/anonymize/pdf/ocr", post(pdf_ocr))
        .route("/anonymize/pdf/mixed", post(pdf_mixed))
        .route("/anonymize/image", post(image))
        .route("/capabilities", get(capabilities))
}

/// Form fields of the advanced endpoint
#[derive(Debug, Deserialize)]
pub struct AdvancedForm {
    pub text: String,
    /// Comma-separated entity types
    #[serde(default)]
    pub entities: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub score_threshold: Option<f64>,
}

impl AdvancedForm {
    fn into_request(self) -> AnalyzeRequest {
        let mut request = AnalyzeRequest::new(self.text);
        request.entities = self
            .entities
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|types| !types.is_empty());
        if let Some(language) = self.language.filter(|l| !l.is_empty()) {
            request.language = language;
        }
        if let Some(threshold) = self.score_threshold {
            request.score_threshold = threshold;
        }
        request
    }
}

async fn anonymize_advanced(
    State(state): State<Arc<AppState>>,
    input: Result<Form<AdvancedForm>, FormRejection>,
) -> Result<Json<AdvancedAnonymizeResponse>, ApiError> {
    let Form(form) = input?;
    state
        .service
        .anonymize_advanced(&form.into_request())
        .await
        .map(Json)
        .map_err(|e| state.api_error(e))
}

async fn pdf_text(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<PdfTextResponse>, ApiError> {
    let upload = read_upload(&mut multipart, PDF_EXTENSIONS, state.config.server.max_file_size).await?;
    state
        .documents
        .process_text(&upload.bytes)
        .await
        .map(Json)
        .map_err(|e| state.api_error(e))
}

async fn pdf_ocr(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<PdfOcrResponse>, ApiError> {
    let upload = read_upload(&mut multipart, PDF_EXTENSIONS, state.config.server.max_file_size).await?;
    state
        .documents
        .process_ocr(&upload.bytes)
        .await
        .map(Json)
        .map_err(|e| state.api_error(e))
}

async fn pdf_mixed(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<PdfMixedResponse>, ApiError> {
    let upload = read_upload(&mut multipart, PDF_EXTENSIONS, state.config.server.max_file_size).await?;
    state
        .documents
        .process_mixed(&upload.bytes)
        .await
        .map(Json)
        .map_err(|e| state.api_error(e))
}

async fn image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let upload =
        read_upload(&mut multipart, IMAGE_EXTENSIONS, state.config.server.max_file_size).await?;
    let png = state
        .images
        .redact(&upload.bytes)
        .await
        .map_err(|e| state.api_error(e))?;

    let disposition = format!("attachment; filename={}", attachment_name(&upload.filename));
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        png,
    ))
}

async fn capabilities(State(state): State<Arc<AppState>>) -> Json<Value> {
    let strategies: Vec<&str> = AnonymizationStrategy::all()
        .iter()
        .map(|s| s.as_str())
        .collect();
    Json(json!({
        "supported_file_types": {
            "pdf": PDF_EXTENSIONS,
            "image": IMAGE_EXTENSIONS,
        },
        "processing_methods": {
            "pdf": ["text", "ocr", "mixed"],
            "image": ["ocr_redaction"],
        },
        "ocr_languages": state.config.ocr.supported_languages,
        "max_file_size": state.config.server.max_file_size,
        "anonymization_strategies": strategies,
    }))
}
