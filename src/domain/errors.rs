//! Domain error types
//!
//! This module defines the error hierarchy for PiiGuard.
//! Errors never carry third-party types so that the HTTP layer can map them to
//! status codes without knowing which collaborator failed.

use thiserror::Error;

/// Main PiiGuard error type
///
/// This is the primary error type used throughout the application.
/// The HTTP layer maps [`PiiGuardError::Validation`] and
/// [`PiiGuardError::PayloadTooLarge`] to 4xx responses and everything else
/// to a generic processing failure.
#[derive(Debug, Error)]
pub enum PiiGuardError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid caller input (bad threshold, unsupported language, file type)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upload exceeds the configured size limit
    #[error("Payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    /// Entity detection failed
    #[error("Detection error: {0}")]
    Detection(String),

    /// Replacement of detected spans failed
    #[error("Anonymization error: {0}")]
    Anonymization(String),

    /// Remote analyzer/anonymizer errors
    #[error("Remote engine error: {0}")]
    Remote(#[from] RemoteError),

    /// PDF parsing or rasterization errors
    #[error("Document error: {0}")]
    Document(String),

    /// OCR engine errors
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Image decoding or encoding errors
    #[error("Image error: {0}")]
    Image(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl PiiGuardError {
    /// Whether the error was caused by the caller rather than a collaborator
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PiiGuardError::Validation(_) | PiiGuardError::PayloadTooLarge { .. }
        )
    }
}

/// Remote engine errors
///
/// Errors that occur when calling the remote analyzer or anonymizer service.
/// None of these are retried.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Failed to connect to the remote service
    #[error("Failed to connect to remote service: {0}")]
    ConnectionFailed(String),

    /// Request exceeded the fixed timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for PiiGuardError {
    fn from(err: std::io::Error) -> Self {
        PiiGuardError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PiiGuardError {
    fn from(err: serde_json::Error) -> Self {
        PiiGuardError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PiiGuardError {
    fn from(err: toml::de::Error) -> Self {
        PiiGuardError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from reqwest errors, classified so callers never see reqwest types
impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteError::Timeout(err.to_string())
        } else if err.is_decode() {
            RemoteError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            if status.is_server_error() {
                RemoteError::ServerError {
                    status: status.as_u16(),
                    message: err.to_string(),
                }
            } else {
                RemoteError::ClientError {
                    status: status.as_u16(),
                    message: err.to_string(),
                }
            }
        } else {
            RemoteError::ConnectionFailed(err.to_string())
        }
    }
}
