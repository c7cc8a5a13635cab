//! Logging and observability
//!
//! Structured logging with:
//! - Configurable log levels
//! - Console output
//! - Local JSON file logging with rotation
//!
//! Request text never reaches the logs. The macros below record only lengths,
//! counts and entity types.
//!
//! # Example
//!
//! ```no_run
//! use piiguard::logging::init_logging;
//! use piiguard::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Service started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the completion of a detection or anonymization call
///
/// # Example
///
/// ```no_run
/// use piiguard::log_text_processed;
/// use std::time::Duration;
///
/// log_text_processed!("anonymize", 128, 3, Duration::from_millis(4));
/// ```
#[macro_export]
macro_rules! log_text_processed {
    ($operation:expr, $text_len:expr, $entity_count:expr, $duration:expr) => {
        tracing::info!(
            operation = $operation,
            text_len = $text_len,
            entities = $entity_count,
            duration_ms = $duration.as_millis() as u64,
            "Text processed"
        );
    };
}

/// Log the completion of a document (PDF or image) request
///
/// # Example
///
/// ```no_run
/// use piiguard::log_document_processed;
/// use std::time::Duration;
///
/// log_document_processed!("pdf_mixed", 4, Duration::from_secs(2));
/// ```
#[macro_export]
macro_rules! log_document_processed {
    ($kind:expr, $pages:expr, $duration:expr) => {
        tracing::info!(
            kind = $kind,
            pages = $pages,
            duration_ms = $duration.as_millis() as u64,
            "Document processed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use piiguard::log_error_with_context;
/// use piiguard::domain::PiiGuardError;
///
/// let error = PiiGuardError::Ocr("tesseract exited with status 1".to_string());
/// log_error_with_context!(&error, "Image redaction failed");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
