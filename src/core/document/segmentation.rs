//! PDF segmentation
//!
//! A document is split into pages. Each page's text comes either from the
//! embedded text layer or from OCR of a rendered image of the page, and is then
//! sent through the text anonymization service.
//!
//! Any failure (corrupt document, rasterizer, OCR, detection) aborts the whole
//! document; no partial result is returned.

use super::models::{
    OcrPage, PageResult, PageSource, PdfMixedResponse, PdfOcrResponse, PdfTextResponse,
};
use crate::adapters::ocr::OcrEngine;
use crate::adapters::pdf::PdfRenderer;
use crate::anonymization::config::AnonymizationStrategy;
use crate::anonymization::models::AnonymizeRequest;
use crate::core::service::AnonymizationService;
use crate::domain::Result;
use crate::log_document_processed;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// A page whose trimmed embedded text is longer than this is processed as text
pub const TEXT_PAGE_THRESHOLD: usize = 100;

/// Resolution used to rasterize pages for OCR
pub const RASTER_DPI: u32 = 300;

/// Decide how a page's text should be obtained
pub fn classify_page(extracted_text: &str) -> PageSource {
    if extracted_text.trim().chars().count() > TEXT_PAGE_THRESHOLD {
        PageSource::Text
    } else {
        PageSource::Ocr
    }
}

/// PDF anonymization pipeline
pub struct DocumentProcessor {
    renderer: Arc<dyn PdfRenderer>,
    ocr: Arc<dyn OcrEngine>,
    service: AnonymizationService,
    ocr_language: String,
}

impl DocumentProcessor {
    /// Create a processor
    pub fn new(
        renderer: Arc<dyn PdfRenderer>,
        ocr: Arc<dyn OcrEngine>,
        service: AnonymizationService,
        ocr_language: impl Into<String>,
    ) -> Self {
        Self {
            renderer,
            ocr,
            service,
            ocr_language: ocr_language.into(),
        }
    }

    /// Anonymize `text` with the default settings; returns the new text and span count
    async fn anonymize_text(&self, text: &str) -> Result<(String, usize)> {
        let request = AnonymizeRequest::new(text, AnonymizationStrategy::Replace);
        let response = self.service.anonymize(&request).await?;
        Ok((response.text, response.entities.len()))
    }

    async fn ocr_page(&self, pdf: &[u8], page_number: u32) -> Result<String> {
        let png = self.renderer.rasterize(pdf, page_number, RASTER_DPI).await?;
        self.ocr.image_to_string(&png, &self.ocr_language).await
    }

    /// Text mode: embedded text only, pages without text are skipped
    pub async fn process_text(&self, pdf: &[u8]) -> Result<PdfTextResponse> {
        let started = Instant::now();
        let extracted = self.renderer.extract_text(pdf)?;

        let mut pages = Vec::new();
        for (number, text) in (1u32..).zip(extracted.pages.iter()) {
            if text.trim().is_empty() {
                debug!(page = number, "Skipping page without text");
                continue;
            }
            let (anonymized_text, entities_found) = self.anonymize_text(text).await?;
            pages.push(PageResult {
                page_number: number,
                source: PageSource::Text,
                original_text: text.clone(),
                anonymized_text,
                entities_found,
            });
        }

        let elapsed = started.elapsed();
        log_document_processed!("pdf_text", extracted.page_count(), elapsed);
        Ok(PdfTextResponse {
            total_pages: extracted.page_count(),
            processed_pages: pages.len(),
            pages,
            processing_time: elapsed.as_secs_f64(),
        })
    }

    /// OCR mode: every page OCRed, the joined text anonymized in one call
    pub async fn process_ocr(&self, pdf: &[u8]) -> Result<PdfOcrResponse> {
        let started = Instant::now();
        let extracted = self.renderer.extract_text(pdf)?;

        let mut pages = Vec::with_capacity(extracted.page_count());
        let mut full_text = String::new();
        for number in (1u32..).take(extracted.page_count()) {
            let text = self.ocr_page(pdf, number).await?;
            full_text.push_str(&text);
            full_text.push('\n');
            pages.push(OcrPage {
                page_number: number,
                text,
            });
        }

        let (anonymized_text, entities_found) = if full_text.trim().is_empty() {
            (full_text.clone(), 0)
        } else {
            self.anonymize_text(&full_text).await?
        };

        let elapsed = started.elapsed();
        log_document_processed!("pdf_ocr", extracted.page_count(), elapsed);
        Ok(PdfOcrResponse {
            total_pages: extracted.page_count(),
            original_text: full_text,
            anonymized_text,
            pages,
            entities_found,
            processing_time: elapsed.as_secs_f64(),
        })
    }

    /// Mixed mode: classify each page, take text or OCR, anonymize per page
    pub async fn process_mixed(&self, pdf: &[u8]) -> Result<PdfMixedResponse> {
        let started = Instant::now();
        let extracted = self.renderer.extract_text(pdf)?;

        let mut pages = Vec::with_capacity(extracted.page_count());
        let mut text_pages = 0;
        let mut image_pages = 0;
        for (number, embedded) in (1u32..).zip(extracted.pages.iter()) {
            let source = classify_page(embedded);
            let text = match source {
                PageSource::Text => {
                    text_pages += 1;
                    embedded.clone()
                }
                PageSource::Ocr => {
                    image_pages += 1;
                    self.ocr_page(pdf, number).await?
                }
            };
            debug!(page = number, source = ?source, "Page classified");

            let (anonymized_text, entities_found) = if text.trim().is_empty() {
                (String::new(), 0)
            } else {
                self.anonymize_text(&text).await?
            };

            pages.push(PageResult {
                page_number: number,
                source,
                original_text: text,
                anonymized_text,
                entities_found,
            });
        }

        let elapsed = started.elapsed();
        log_document_processed!("pdf_mixed", extracted.page_count(), elapsed);
        Ok(PdfMixedResponse {
            total_pages: extracted.page_count(),
            pages,
            text_pages,
            image_pages,
            processing_time: elapsed.as_secs_f64(),
        })
    }
}
