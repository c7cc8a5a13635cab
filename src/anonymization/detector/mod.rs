//! PII detection module
//!
//! Provides the trait-based detection interface and the pattern-driven local
//! recognizer used when no remote analyzer is configured.

pub mod patterns;
pub mod regex;
pub mod validators;

use crate::anonymization::models::EntitySpan;
use crate::domain::Result;

pub use self::regex::RegexDetector;

/// Trait for PII detection implementations
pub trait PiiDetector: Send + Sync {
    /// Detect PII spans in `text`
    ///
    /// `entities` restricts detection to the listed types (`None` means every
    /// supported type). Spans scoring below `score_threshold` are dropped. The
    /// result is sorted by start offset and contains no overlapping spans.
    fn detect(
        &self,
        text: &str,
        entities: Option<&[String]>,
        language: &str,
        score_threshold: f64,
    ) -> Result<Vec<EntitySpan>>;

    /// Entity types this detector can produce, sorted
    fn supported_entities(&self) -> Vec<String>;

    /// Language tags this detector accepts
    fn supported_languages(&self) -> Vec<String>;
}
