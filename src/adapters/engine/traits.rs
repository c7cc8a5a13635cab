//! Backend trait

use crate::anonymization::engine::{DeanonymizeOutcome, ReplacementOutcome};
use crate::anonymization::models::{
    AnalyzeRequest, AnonymizeRequest, DeanonymizeRequest, EngineInfo, EntitySpan,
};
use crate::domain::Result;
use async_trait::async_trait;

/// Detection and replacement backend
///
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait AnonymizationBackend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Detect PII spans
    ///
    /// Returned spans carry codepoint offsets into `request.text`, their
    /// matched substring, and a score no lower than `request.score_threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::PiiGuardError::Validation`] for an unsupported
    /// language or entity filter, and a detection or remote error when the
    /// engine fails.
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Vec<EntitySpan>>;

    /// Replace `entities` in `request.text`
    ///
    /// `entities` must come from [`analyze`](Self::analyze) on the same text.
    async fn anonymize(
        &self,
        request: &AnonymizeRequest,
        entities: &[EntitySpan],
    ) -> Result<ReplacementOutcome>;

    /// Reverse the `encrypt` strategy
    async fn deanonymize(&self, request: &DeanonymizeRequest) -> Result<DeanonymizeOutcome>;

    /// Describe the detection engine
    async fn engine_info(&self) -> Result<EngineInfo>;

    /// Check that the engine can serve requests
    async fn health_check(&self) -> Result<()>;
}
