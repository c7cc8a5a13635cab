//! In-process backend
//!
//! Detection runs the pattern recognizers and replacement runs the
//! [`ReplacementEngine`]; nothing leaves the process.

use crate::adapters::engine::AnonymizationBackend;
use crate::anonymization::anonymizer::fill_random;
use crate::anonymization::detector::{patterns::PatternRegistry, PiiDetector, RegexDetector};
use crate::anonymization::engine::{DeanonymizeOutcome, ReplacementEngine, ReplacementOutcome};
use crate::anonymization::models::{
    AnalyzeRequest, AnonymizeRequest, DeanonymizeRequest, EngineInfo, EntitySpan,
};
use crate::config::EngineConfig;
use crate::domain::{PiiGuardError, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Engine name reported by the info endpoints
pub const LOCAL_ENGINE_NAME: &str = "presidio-local";

/// Local pattern-based backend
pub struct LocalBackend {
    detector: Arc<dyn PiiDetector>,
    engine: ReplacementEngine,
}

impl LocalBackend {
    /// Create a backend from explicit parts
    pub fn new(detector: Arc<dyn PiiDetector>, hash_key: &[u8]) -> Self {
        Self {
            detector,
            engine: ReplacementEngine::new(hash_key),
        }
    }

    /// Create a backend from the engine configuration
    ///
    /// Loads the custom pattern library when one is configured. Without a
    /// configured `hash_key`, a random key is drawn for this process, so hashes
    /// are only stable until restart.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let languages = config.supported_languages.clone();
        let detector = match config.pattern_library {
            Some(ref path) => {
                let registry = PatternRegistry::from_file(path)
                    .map_err(|e| PiiGuardError::Configuration(format!("{e:#}")))?;
                RegexDetector::with_registry(registry, languages)
            }
            None => RegexDetector::new(languages)?,
        };

        let hash_key = match config.hash_key {
            Some(ref key) => key.expose_secret().as_bytes().to_vec(),
            None => {
                tracing::warn!("engine.hash_key not set, hashes will change on restart");
                let mut key = vec![0u8; 32];
                fill_random(&mut key)?;
                key
            }
        };

        Ok(Self::new(Arc::new(detector), &hash_key))
    }
}

#[async_trait]
impl AnonymizationBackend for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Vec<EntitySpan>> {
        self.detector.detect(
            &request.text,
            request.entity_filter(),
            &request.language,
            request.score_threshold,
        )
    }

    async fn anonymize(
        &self,
        request: &AnonymizeRequest,
        entities: &[EntitySpan],
    ) -> Result<ReplacementOutcome> {
        self.engine.anonymize(
            &request.text,
            entities,
            request.anonymization_mode,
            request.anonymizers.as_ref(),
            request.encryption_key.as_deref(),
        )
    }

    async fn deanonymize(&self, request: &DeanonymizeRequest) -> Result<DeanonymizeOutcome> {
        self.engine
            .deanonymize(&request.text, &request.entities, &request.key)
    }

    async fn engine_info(&self) -> Result<EngineInfo> {
        Ok(EngineInfo {
            name: LOCAL_ENGINE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            supported_entities: self.detector.supported_entities(),
            supported_languages: self.detector.supported_languages(),
        })
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::config::AnonymizationStrategy;
    use crate::config::secret_string;

    fn backend() -> LocalBackend {
        LocalBackend::from_config(&EngineConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_then_anonymize() {
        let backend = backend();
        let request = AnonymizeRequest::new(
            "Contact John Doe at john@example.com",
            AnonymizationStrategy::Replace,
        );
        let entities = backend.analyze(&request.analyze_request()).await.unwrap();
        assert_eq!(entities.len(), 2);

        let outcome = backend.anonymize(&request, &entities).await.unwrap();
        assert_eq!(outcome.text, "Contact PERSON at EMAIL_ADDRESS");
    }

    #[tokio::test]
    async fn test_engine_info() {
        let info = backend().engine_info().await.unwrap();
        assert_eq!(info.name, "presidio-local");
        assert!(info.supported_entities.contains(&"EMAIL_ADDRESS".to_string()));
        assert_eq!(info.supported_languages, vec!["en".to_string()]);
    }

    #[tokio::test]
    async fn test_configured_hash_key_is_stable() {
        let mut config = EngineConfig::default();
        config.hash_key = Some(secret_string("fixed".to_string()));
        let a = LocalBackend::from_config(&config).unwrap();
        let b = LocalBackend::from_config(&config).unwrap();

        let request = AnonymizeRequest::new("Mail john@example.com", AnonymizationStrategy::Hash);
        let entities = a.analyze(&request.analyze_request()).await.unwrap();
        let first = a.anonymize(&request, &entities).await.unwrap();
        let second = b.anonymize(&request, &entities).await.unwrap();
        assert_eq!(first.text, second.text);
    }

    #[tokio::test]
    async fn test_health_check() {
        assert!(backend().health_check().await.is_ok());
    }
}
