//! Text anonymization service
//!
//! Orchestrates one request end to end: validate parameters, detect through
//! the configured backend, replace, then assemble the response. Every call is
//! stateless; the service only holds the shared backend.

use crate::adapters::engine::AnonymizationBackend;
use crate::anonymization::models::{
    AdvancedAnonymizeResponse, AnalysisDetails, AnalyzeRequest, AnalyzeResponse,
    AnonymizeRequest, AnonymizeResponse, BatchAnonymizeRequest, BatchAnonymizeResponse,
    DeanonymizeRequest, DeanonymizeResponse, EngineInfo,
};
use crate::domain::Result;
use crate::log_text_processed;
use std::sync::Arc;
use std::time::Instant;

/// Detection and anonymization of plain text
#[derive(Clone)]
pub struct AnonymizationService {
    backend: Arc<dyn AnonymizationBackend>,
}

impl AnonymizationService {
    /// Create a service over `backend`
    pub fn new(backend: Arc<dyn AnonymizationBackend>) -> Self {
        Self { backend }
    }

    /// The backend this service delegates to
    pub fn backend(&self) -> &Arc<dyn AnonymizationBackend> {
        &self.backend
    }

    /// Detect PII without modifying the text
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse> {
        request.validate()?;
        let started = Instant::now();

        let entities = self.backend.analyze(request).await?;

        let elapsed = started.elapsed();
        log_text_processed!("analyze", request.text.len(), entities.len(), elapsed);
        Ok(AnalyzeResponse {
            entities,
            processing_time: elapsed.as_secs_f64(),
        })
    }

    /// Detect and replace PII
    ///
    /// `entities` in the response index the submitted text; `items` index the
    /// anonymized text.
    pub async fn anonymize(&self, request: &AnonymizeRequest) -> Result<AnonymizeResponse> {
        request.validate()?;
        let started = Instant::now();

        let entities = self.backend.analyze(&request.analyze_request()).await?;
        let outcome = self.backend.anonymize(request, &entities).await?;

        let elapsed = started.elapsed();
        log_text_processed!("anonymize", request.text.len(), entities.len(), elapsed);
        Ok(AnonymizeResponse {
            text: outcome.text,
            entities,
            items: outcome.items,
            processing_time: elapsed.as_secs_f64(),
            encryption_key: outcome.generated_key,
        })
    }

    /// Anonymize several texts with the same settings
    ///
    /// Items run one after another and keep input order. The first failing
    /// item fails the whole batch. When `encrypt` runs without a caller key,
    /// the key generated for the first item is reused for the rest so that a
    /// single key decrypts the whole batch.
    pub async fn anonymize_batch(
        &self,
        request: &BatchAnonymizeRequest,
    ) -> Result<BatchAnonymizeResponse> {
        request.validate()?;

        let mut results = Vec::with_capacity(request.texts.len());
        let mut shared_key = request.encryption_key.clone();
        for text in &request.texts {
            let mut item = request.item_request(text);
            item.encryption_key = shared_key.clone();

            let response = self.anonymize(&item).await?;
            if shared_key.is_none() {
                shared_key = response.encryption_key.clone();
            }
            results.push(response);
        }

        let total_processing_time = results.iter().map(|r| r.processing_time).sum();
        tracing::info!(items = results.len(), "Batch processed");
        Ok(BatchAnonymizeResponse {
            results,
            total_processing_time,
        })
    }

    /// Anonymize with `replace` and attach summary statistics
    pub async fn anonymize_advanced(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<AdvancedAnonymizeResponse> {
        let anonymize = AnonymizeRequest {
            text: request.text.clone(),
            entities: request.entities.clone(),
            language: request.language.clone(),
            score_threshold: request.score_threshold,
            ..AnonymizeRequest::new(String::new(), Default::default())
        };
        let response = self.anonymize(&anonymize).await?;

        Ok(AdvancedAnonymizeResponse {
            original_text: request.text.clone(),
            anonymized_text: response.text,
            analysis_details: AnalysisDetails::from_entities(&response.entities),
            entities: response.entities,
            processing_time: response.processing_time,
        })
    }

    /// Restore text produced by the `encrypt` strategy
    pub async fn deanonymize(&self, request: &DeanonymizeRequest) -> Result<DeanonymizeResponse> {
        request.validate()?;
        let outcome = self.backend.deanonymize(request).await?;
        tracing::info!(spans = outcome.items.len(), "Text deanonymized");
        Ok(DeanonymizeResponse {
            text: outcome.text,
            items: outcome.items,
        })
    }

    /// Describe the detection engine
    pub async fn engine_info(&self) -> Result<EngineInfo> {
        self.backend.engine_info().await
    }

    /// Check the backend and describe it
    pub async fn health(&self) -> Result<EngineInfo> {
        self.backend.health_check().await?;
        self.backend.engine_info().await
    }
}
