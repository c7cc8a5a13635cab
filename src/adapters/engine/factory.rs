//! Backend factory
//!
//! This module creates the configured backend.

use crate::adapters::engine::traits::AnonymizationBackend;
use crate::adapters::local::LocalBackend;
use crate::adapters::presidio::PresidioClient;
use crate::config::{EngineMode, PiiGuardConfig};
use crate::domain::Result;
use std::sync::Arc;

/// Create a backend based on the configuration
///
/// # Errors
///
/// Returns an error if the pattern library cannot be loaded (local mode) or
/// the HTTP client cannot be built (remote mode).
pub fn create_backend(config: &PiiGuardConfig) -> Result<Arc<dyn AnonymizationBackend>> {
    match config.engine.mode {
        EngineMode::Local => {
            tracing::info!(
                pattern_library = config.engine.pattern_library.as_deref().unwrap_or("built-in"),
                "Creating local detection engine"
            );
            let backend = LocalBackend::from_config(&config.engine)?;
            Ok(Arc::new(backend) as Arc<dyn AnonymizationBackend>)
        }
        EngineMode::Remote => {
            tracing::info!(
                analyzer_url = %config.engine.remote.analyzer_url,
                anonymizer_url = %config.engine.remote.anonymizer_url,
                "Creating remote detection engine client"
            );
            let client = PresidioClient::new(&config.engine.remote)?;
            Ok(Arc::new(client) as Arc<dyn AnonymizationBackend>)
        }
    }
}
