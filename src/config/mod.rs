//! Configuration management for PiiGuard.
//!
//! # Overview
//!
//! PiiGuard uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PIIGUARD_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and debug error details
//! - [`ServerConfig`] - Bind address, CORS origins, upload limit
//! - [`EngineConfig`] - Local or remote detection backend
//! - [`OcrConfig`] - tesseract and pdftoppm binaries, OCR language
//! - [`LoggingConfig`] - Local JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [server]
//! port = 8000
//! allowed_origins = ["http://localhost:3000"]
//!
//! [engine]
//! mode = "remote"
//!
//! [engine.remote]
//! analyzer_url = "http://presidio-analyzer:3000"
//! analyzer_api_key = "${PRESIDIO_ANALYZER_KEY}"
//! anonymizer_url = "http://presidio-anonymizer:3000"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str, load_config_or_default};
pub use schema::{
    ApplicationConfig, EngineConfig, EngineMode, LoggingConfig, OcrConfig, PiiGuardConfig,
    RemoteEngineConfig, ServerConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
