//! Image redaction
//!
//! OCR finds the words and their boxes, the words are joined into one text,
//! detection runs on that text, and every word box touching a detected span is
//! painted over. The result is always PNG, whatever the input format.

use crate::adapters::ocr::{OcrEngine, OcrWord};
use crate::anonymization::models::AnalyzeRequest;
use crate::core::service::AnonymizationService;
use crate::domain::{PiiGuardError, Result};
use crate::log_document_processed;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::io::Cursor;
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

/// Fill colour of redaction boxes
const REDACTION_FILL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// OCR-driven image redactor
pub struct ImageRedactor {
    ocr: Arc<dyn OcrEngine>,
    service: AnonymizationService,
    language: String,
}

/// Words joined into one text, with each word's codepoint range
struct OcrText {
    text: String,
    ranges: Vec<Range<usize>>,
}

/// Join words with a space inside a line and a newline between lines
fn join_words(words: &[OcrWord]) -> OcrText {
    let mut text = String::new();
    let mut ranges = Vec::with_capacity(words.len());
    let mut len = 0;

    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            text.push(if words[i - 1].line == word.line { ' ' } else { '\n' });
            len += 1;
        }
        let start = len;
        text.push_str(&word.text);
        len += word.text.chars().count();
        ranges.push(start..len);
    }

    OcrText { text, ranges }
}

impl ImageRedactor {
    /// Create a redactor
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        service: AnonymizationService,
        language: impl Into<String>,
    ) -> Self {
        Self {
            ocr,
            service,
            language: language.into(),
        }
    }

    /// Redact PII in an encoded image and return PNG bytes
    ///
    /// # Errors
    ///
    /// Returns [`PiiGuardError::Image`] when the bytes cannot be decoded or the
    /// result cannot be encoded, and propagates OCR and detection failures.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub async fn redact(&self, data: &[u8]) -> Result<Vec<u8>> {
        let started = Instant::now();
        let decoded = image::load_from_memory(data)
            .map_err(|e| PiiGuardError::Image(format!("Failed to decode image: {e}")))?;
        let mut canvas: RgbaImage = decoded.to_rgba8();

        let words = self.ocr.image_to_words(data, &self.language).await?;
        let joined = join_words(&words);

        let mut boxes = 0;
        if !joined.text.trim().is_empty() {
            let response = self
                .service
                .analyze(&AnalyzeRequest::new(joined.text.clone()))
                .await?;

            for (word, range) in words.iter().zip(&joined.ranges) {
                let hit = response
                    .entities
                    .iter()
                    .any(|e| e.start < range.end && range.start < e.end);
                if hit && paint_box(&mut canvas, word) {
                    boxes += 1;
                }
            }
            debug!(
                entities = response.entities.len(),
                boxes, "Redaction boxes drawn"
            );
        }

        let png = encode_png(canvas)?;
        log_document_processed!("image", 1, started.elapsed());
        Ok(png)
    }
}

/// Paint one word box, clipped to the image; false when nothing was drawn
fn paint_box(canvas: &mut RgbaImage, word: &OcrWord) -> bool {
    let (width, height) = canvas.dimensions();
    if word.left >= width || word.top >= height {
        return false;
    }
    let w = word.width.min(width - word.left);
    let h = word.height.min(height - word.top);
    if w == 0 || h == 0 {
        return false;
    }

    let rect = Rect::at(word.left as i32, word.top as i32).of_size(w, h);
    draw_filled_rect_mut(canvas, rect, REDACTION_FILL);
    true
}

fn encode_png(canvas: RgbaImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| PiiGuardError::Image(format!("Failed to encode PNG: {e}")))?;
    Ok(out.into_inner())
}
