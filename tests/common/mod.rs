//! Test doubles for the PDF renderer and OCR engine

#![allow(dead_code)]

use async_trait::async_trait;
use piiguard::adapters::local::LocalBackend;
use piiguard::adapters::ocr::{OcrEngine, OcrWord};
use piiguard::adapters::pdf::{PdfRenderer, PdfText};
use piiguard::config::EngineConfig;
use piiguard::core::service::AnonymizationService;
use piiguard::domain::{PiiGuardError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub fn local_service() -> AnonymizationService {
    let backend = LocalBackend::from_config(&EngineConfig::default()).unwrap();
    AnonymizationService::new(Arc::new(backend))
}

/// Renderer with fixed per-page text; a rendered page is the bytes `page-N`
#[derive(Default)]
pub struct MockRenderer {
    pub pages: Vec<String>,
    pub corrupt: bool,
    pub rasterized: Mutex<Vec<u32>>,
}

impl MockRenderer {
    pub fn with_pages(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn rasterized_pages(&self) -> Vec<u32> {
        self.rasterized.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfRenderer for MockRenderer {
    fn extract_text(&self, _pdf: &[u8]) -> Result<PdfText> {
        if self.corrupt {
            return Err(PiiGuardError::Document("Failed to parse PDF".to_string()));
        }
        Ok(PdfText {
            pages: self.pages.clone(),
        })
    }

    async fn rasterize(&self, _pdf: &[u8], page_number: u32, _dpi: u32) -> Result<Vec<u8>> {
        self.rasterized.lock().unwrap().push(page_number);
        Ok(format!("page-{page_number}").into_bytes())
    }
}

/// OCR engine answering from a table keyed by the image bytes
#[derive(Default)]
pub struct MockOcr {
    pub texts: HashMap<Vec<u8>, String>,
    pub words: Vec<OcrWord>,
    pub fail: bool,
}

impl MockOcr {
    pub fn with_page_text(pages: &[(u32, &str)]) -> Self {
        Self {
            texts: pages
                .iter()
                .map(|(n, t)| (format!("page-{n}").into_bytes(), t.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn with_words(words: Vec<OcrWord>) -> Self {
        Self {
            words,
            ..Default::default()
        }
    }
}

#[async_trait]
impl OcrEngine for MockOcr {
    async fn image_to_string(&self, image: &[u8], _language: &str) -> Result<String> {
        if self.fail {
            return Err(PiiGuardError::Ocr("tesseract exited with status 1".to_string()));
        }
        Ok(self.texts.get(image).cloned().unwrap_or_default())
    }

    async fn image_to_words(&self, _image: &[u8], _language: &str) -> Result<Vec<OcrWord>> {
        if self.fail {
            return Err(PiiGuardError::Ocr("tesseract exited with status 1".to_string()));
        }
        Ok(self.words.clone())
    }
}

pub fn word(text: &str, left: u32, top: u32, width: u32, line: u32) -> OcrWord {
    OcrWord {
        text: text.to_string(),
        left,
        top,
        width,
        height: 10,
        line: (1, 1, line),
    }
}
