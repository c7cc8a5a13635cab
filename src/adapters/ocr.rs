//! OCR through the `tesseract` binary
//!
//! Images are piped in on stdin (`tesseract stdin stdout`). Plain text is used
//! for scanned PDF pages; TSV word boxes are used to place redaction boxes on
//! images.

use crate::adapters::process::{run_with_stdin, CommandFailure};
use crate::domain::{PiiGuardError, Result};
use async_trait::async_trait;
use tracing::instrument;

/// One recognized word and its bounding box, in image pixels
#[derive(Debug, Clone, PartialEq)]
pub struct OcrWord {
    pub text: String,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    /// `(block, paragraph, line)` the word belongs to
    pub line: (u32, u32, u32),
}

/// OCR engine
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize the text of an encoded image
    async fn image_to_string(&self, image: &[u8], language: &str) -> Result<String>;

    /// Recognize words with their bounding boxes
    async fn image_to_words(&self, image: &[u8], language: &str) -> Result<Vec<OcrWord>>;
}

/// `tesseract` command-line OCR
pub struct TesseractOcr {
    tesseract_cmd: String,
}

impl TesseractOcr {
    /// Create an engine that runs the given binary
    pub fn new(tesseract_cmd: impl Into<String>) -> Self {
        Self {
            tesseract_cmd: tesseract_cmd.into(),
        }
    }

    async fn run(&self, image: &[u8], language: &str, tsv: bool) -> Result<String> {
        let mut args = vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            language.to_string(),
        ];
        if tsv {
            args.push("tsv".to_string());
        }

        let stdout = run_with_stdin(&self.tesseract_cmd, &args, image.to_vec())
            .await
            .map_err(|e| match e {
                CommandFailure::Spawn(_) => {
                    PiiGuardError::Ocr(format!("tesseract ({}) {e}", self.tesseract_cmd))
                }
                other => PiiGuardError::Ocr(format!("tesseract {other}")),
            })?;

        String::from_utf8(stdout)
            .map_err(|_| PiiGuardError::Ocr("tesseract produced non UTF-8 output".to_string()))
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    #[instrument(skip(self, image), fields(bytes_len = image.len()))]
    async fn image_to_string(&self, image: &[u8], language: &str) -> Result<String> {
        self.run(image, language, false).await
    }

    #[instrument(skip(self, image), fields(bytes_len = image.len()))]
    async fn image_to_words(&self, image: &[u8], language: &str) -> Result<Vec<OcrWord>> {
        let tsv = self.run(image, language, true).await?;
        parse_tsv(&tsv)
    }
}

/// Parse tesseract TSV output into word boxes
///
/// Columns: `level page_num block_num par_num line_num word_num left top width
/// height conf text`. Only word rows (level 5) with text are kept.
pub fn parse_tsv(tsv: &str) -> Result<Vec<OcrWord>> {
    let mut words = Vec::new();

    for (line_no, row) in tsv.lines().enumerate().skip(1) {
        if row.trim().is_empty() {
            continue;
        }
        let cols: Vec<&str> = row.splitn(12, '\t').collect();
        if cols.len() < 11 {
            return Err(PiiGuardError::Ocr(format!(
                "Malformed TSV row {}: expected 12 columns, got {}",
                line_no + 1,
                cols.len()
            )));
        }
        if cols[0] != "5" {
            continue;
        }

        let text = cols.get(11).map(|t| t.trim()).unwrap_or_default();
        if text.is_empty() {
            continue;
        }

        let num = |i: usize| -> Result<u32> {
            cols[i].trim().parse::<u32>().map_err(|_| {
                PiiGuardError::Ocr(format!(
                    "Malformed TSV row {}: column {} is not a number",
                    line_no + 1,
                    i + 1
                ))
            })
        };

        words.push(OcrWord {
            text: text.to_string(),
            left: num(6)?,
            top: num(7)?,
            width: num(8)?,
            height: num(9)?,
            line: (num(2)?, num(3)?, num(4)?),
        });
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t
4\t1\t1\t1\t1\t0\t10\t10\t300\t20\t-1\t
5\t1\t1\t1\t1\t1\t10\t10\t80\t20\t96.5\tContact
5\t1\t1\t1\t1\t2\t95\t10\t50\t20\t95.1\tJohn
5\t1\t1\t1\t1\t3\t150\t10\t45\t20\t94.0\tDoe
5\t1\t1\t1\t2\t1\t10\t40\t60\t20\t90.0\t 
5\t1\t2\t1\t1\t1\t10\t80\t200\t20\t91.2\tjohn@example.com
";

    #[test]
    fn test_parse_tsv_words() {
        let words = parse_tsv(TSV).unwrap();
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["Contact", "John", "Doe", "john@example.com"]);

        let john = &words[1];
        assert_eq!((john.left, john.top, john.width, john.height), (95, 10, 50, 20));
        assert_eq!(john.line, (1, 1, 1));
        assert_eq!(words[3].line, (2, 1, 1));
    }

    #[test]
    fn test_parse_tsv_header_only() {
        let words = parse_tsv("level\tpage_num\n").unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn test_parse_tsv_malformed() {
        let tsv = "header\n5\t1\t1\n";
        assert!(matches!(parse_tsv(tsv), Err(PiiGuardError::Ocr(_))));
    }

    #[tokio::test]
    async fn test_missing_tesseract() {
        let ocr = TesseractOcr::new("/nonexistent/tesseract");
        let err = ocr.image_to_string(b"png", "eng").await.unwrap_err();
        assert!(matches!(err, PiiGuardError::Ocr(_)));
    }
}
