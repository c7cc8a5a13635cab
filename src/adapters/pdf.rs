//! PDF text extraction and rasterization
//!
//! Text comes from `lopdf`; page images come from the `pdftoppm` binary, fed
//! the document on stdin so uploads never touch the disk.

use crate::adapters::process::{run_with_stdin, CommandFailure};
use crate::domain::{PiiGuardError, Result};
use async_trait::async_trait;
use lopdf::Document;
use tracing::{debug, instrument};

/// Extracted text of every page, in page order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfText {
    /// Text of page `i + 1`; empty when the page has no extractable text
    pub pages: Vec<String>,
}

impl PdfText {
    /// Number of pages in the document
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Access to the pages of a PDF
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Parse `pdf` and extract the text of each page
    ///
    /// # Errors
    ///
    /// Returns [`PiiGuardError::Document`] when the bytes are not a readable PDF.
    fn extract_text(&self, pdf: &[u8]) -> Result<PdfText>;

    /// Render one page (1-based) to PNG at `dpi`
    async fn rasterize(&self, pdf: &[u8], page_number: u32, dpi: u32) -> Result<Vec<u8>>;
}

/// `lopdf` + `pdftoppm` renderer
pub struct LopdfRenderer {
    pdftoppm_cmd: String,
}

impl LopdfRenderer {
    /// Create a renderer that rasterizes with the given `pdftoppm` binary
    pub fn new(pdftoppm_cmd: impl Into<String>) -> Self {
        Self {
            pdftoppm_cmd: pdftoppm_cmd.into(),
        }
    }
}

#[async_trait]
impl PdfRenderer for LopdfRenderer {
    #[instrument(skip_all, fields(bytes_len = pdf.len()))]
    fn extract_text(&self, pdf: &[u8]) -> Result<PdfText> {
        let document = Document::load_mem(pdf)
            .map_err(|e| PiiGuardError::Document(format!("Failed to load PDF: {e}")))?;

        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        let pages = page_numbers
            .iter()
            .map(|&number| match document.extract_text(&[number]) {
                Ok(text) => text,
                Err(e) => {
                    // Pages without text operators or fonts go to OCR instead
                    debug!(page = number, error = %e, "No extractable text on page");
                    String::new()
                }
            })
            .collect();

        debug!(pages = page_numbers.len(), "PDF text extracted");
        Ok(PdfText { pages })
    }

    #[instrument(skip(self, pdf), fields(bytes_len = pdf.len()))]
    async fn rasterize(&self, pdf: &[u8], page_number: u32, dpi: u32) -> Result<Vec<u8>> {
        let page = page_number.to_string();
        let args: Vec<String> = vec![
            "-f".to_string(),
            page.clone(),
            "-l".to_string(),
            page,
            "-r".to_string(),
            dpi.to_string(),
            "-png".to_string(),
            "-singlefile".to_string(),
            "-".to_string(),
        ];

        let png = run_with_stdin(&self.pdftoppm_cmd, &args, pdf.to_vec())
            .await
            .map_err(|e| match e {
                CommandFailure::Spawn(_) => PiiGuardError::Document(format!(
                    "pdftoppm ({}) {e}",
                    self.pdftoppm_cmd
                )),
                other => PiiGuardError::Document(format!(
                    "Failed to rasterize page {page_number}: {other}"
                )),
            })?;

        if png.is_empty() {
            return Err(PiiGuardError::Document(format!(
                "pdftoppm produced no image for page {page_number}"
            )));
        }
        Ok(png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_pdf_rejected() {
        let renderer = LopdfRenderer::new("pdftoppm");
        let err = renderer.extract_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PiiGuardError::Document(_)));
    }

    #[tokio::test]
    async fn test_missing_rasterizer() {
        let renderer = LopdfRenderer::new("/nonexistent/pdftoppm");
        let err = renderer.rasterize(b"%PDF-1.4", 1, 300).await.unwrap_err();
        assert!(err.to_string().contains("pdftoppm"));
    }
}
