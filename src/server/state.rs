//! Shared application state

use crate::adapters::engine::{create_backend, AnonymizationBackend};
use crate::adapters::ocr::{OcrEngine, TesseractOcr};
use crate::adapters::pdf::{LopdfRenderer, PdfRenderer};
use crate::config::PiiGuardConfig;
use crate::core::document::{DocumentProcessor, ImageRedactor};
use crate::core::service::AnonymizationService;
use crate::domain::{PiiGuardError, Result};
use crate::server::error::ApiError;
use std::sync::Arc;

/// State shared by every handler
///
/// Built once at startup; nothing in it is mutated afterwards.
pub struct AppState {
    pub config: PiiGuardConfig,
    pub service: AnonymizationService,
    pub documents: DocumentProcessor,
    pub images: ImageRedactor,
}

impl AppState {
    /// Build the state with the configured backend and the `pdftoppm`/`tesseract` collaborators
    pub fn from_config(config: PiiGuardConfig) -> Result<Self> {
        let backend = create_backend(&config)?;
        let renderer = Arc::new(LopdfRenderer::new(config.ocr.pdftoppm_cmd.clone()));
        let ocr = Arc::new(TesseractOcr::new(config.ocr.tesseract_cmd.clone()));
        Ok(Self::with_components(config, backend, renderer, ocr))
    }

    /// Build the state from explicit collaborators
    pub fn with_components(
        config: PiiGuardConfig,
        backend: Arc<dyn AnonymizationBackend>,
        renderer: Arc<dyn PdfRenderer>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        let service = AnonymizationService::new(backend);
        let documents = DocumentProcessor::new(
            renderer,
            ocr.clone(),
            service.clone(),
            config.ocr.language.clone(),
        );
        let images = ImageRedactor::new(ocr, service.clone(), config.ocr.language.clone());

        Self {
            config,
            service,
            documents,
            images,
        }
    }

    /// Map a domain error to a response, with detail only in debug mode
    pub fn api_error(&self, err: PiiGuardError) -> ApiError {
        ApiError::from_domain(err, self.config.application.debug)
    }
}
