//! Response payloads for the document endpoints

use serde::{Deserialize, Serialize};

/// How a page's text was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSource {
    /// Embedded PDF text
    Text,
    /// OCR of the rasterized page
    Ocr,
}

/// Anonymization result for one page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-based page number
    pub page_number: u32,
    /// Where the page text came from
    pub source: PageSource,
    /// Page text before anonymization
    pub original_text: String,
    /// Page text after anonymization
    pub anonymized_text: String,
    /// Number of detected spans on the page
    pub entities_found: usize,
}

/// Text-mode result: embedded text only, empty pages skipped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfTextResponse {
    pub total_pages: usize,
    pub processed_pages: usize,
    pub pages: Vec<PageResult>,
    pub processing_time: f64,
}

/// Text recognized on one page in OCR mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrPage {
    pub page_number: u32,
    pub text: String,
}

/// OCR-mode result: every page OCRed, the joined text anonymized once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfOcrResponse {
    pub total_pages: usize,
    pub original_text: String,
    pub anonymized_text: String,
    pub pages: Vec<OcrPage>,
    pub entities_found: usize,
    pub processing_time: f64,
}

/// Mixed-mode result: each page classified, then anonymized on its own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfMixedResponse {
    pub total_pages: usize,
    pub pages: Vec<PageResult>,
    /// Pages processed from embedded text
    pub text_pages: usize,
    /// Pages processed through OCR
    pub image_pages: usize,
    pub processing_time: f64,
}
