//! HTTP error responses

use crate::domain::PiiGuardError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Unified API error type for all route handlers
#[derive(Debug)]
pub enum ApiError {
    /// Invalid input (400)
    BadRequest(String),
    /// Upload over the size limit (413)
    PayloadTooLarge(String),
    /// Engine cannot serve requests (503)
    Unavailable { detail: Option<String> },
    /// Processing failure (500); `detail` is only set in debug mode
    Internal { detail: Option<String> },
}

/// Error body: `{error, detail?, code}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    /// Classify a domain error
    ///
    /// Caller errors keep their message. Everything else is logged and turned
    /// into a generic failure whose detail is exposed only when `debug` is set.
    pub fn from_domain(err: PiiGuardError, debug: bool) -> Self {
        if !err.is_client_error() {
            crate::log_error_with_context!(&err, "Request processing failed");
            return ApiError::Internal {
                detail: debug.then(|| err.to_string()),
            };
        }

        tracing::debug!(error = %err, "Request rejected");
        match err {
            PiiGuardError::Validation(msg) => ApiError::BadRequest(msg),
            e @ PiiGuardError::PayloadTooLarge { .. } => ApiError::PayloadTooLarge(e.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }

    /// Status code of this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, detail) = match self {
            ApiError::BadRequest(msg) | ApiError::PayloadTooLarge(msg) => (msg, None),
            ApiError::Unavailable { detail } => ("Service unavailable".to_string(), detail),
            ApiError::Internal { detail } => ("Processing failed".to_string(), detail),
        };

        let body = ErrorBody {
            error,
            detail,
            code: Some(status.as_u16().to_string()),
        };
        (status, Json(body)).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(e: axum::extract::rejection::JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<axum::extract::rejection::FormRejection> for ApiError {
    fn from(e: axum::extract::rejection::FormRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::from_domain(PiiGuardError::Validation("bad".to_string()), false);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_payload_too_large() {
        let err = ApiError::from_domain(PiiGuardError::PayloadTooLarge { size: 2, limit: 1 }, false);
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_internal_detail_only_in_debug() {
        let hidden = ApiError::from_domain(PiiGuardError::Ocr("boom".to_string()), false);
        assert!(matches!(hidden, ApiError::Internal { detail: None }));

        let shown = ApiError::from_domain(PiiGuardError::Ocr("boom".to_string()), true);
        match shown {
            ApiError::Internal { detail: Some(d) } => assert!(d.contains("boom")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
