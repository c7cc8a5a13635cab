//! Document anonymization
//!
//! - [`segmentation`] - per-page PDF processing (text, OCR and mixed modes)
//! - [`image`] - OCR-driven redaction of raster images
//! - [`models`] - response payloads for the document endpoints

pub mod image;
pub mod models;
pub mod segmentation;

pub use self::image::ImageRedactor;
pub use models::{
    OcrPage, PageResult, PageSource, PdfMixedResponse, PdfOcrResponse, PdfTextResponse,
};
pub use segmentation::{classify_page, DocumentProcessor, RASTER_DPI, TEXT_PAGE_THRESHOLD};
