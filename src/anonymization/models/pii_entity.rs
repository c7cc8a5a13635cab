//! PII entity data models

use crate::anonymization::config::AnonymizationStrategy;
use serde::{Deserialize, Serialize};

/// A detected PII span
///
/// `start` and `end` are Unicode scalar (codepoint) offsets into the text the
/// span was detected in; `start` is inclusive and `end` exclusive. When a span
/// comes back in an anonymization response it still indexes the *input* text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Entity type tag (e.g. `PERSON`, `EMAIL_ADDRESS`)
    pub entity_type: String,
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Matched substring
    pub text: String,
    /// Confidence score (0.0 - 1.0)
    pub score: f64,
}

impl EntitySpan {
    /// Create a new entity span, clamping the score into `[0, 1]`
    pub fn new(
        entity_type: impl Into<String>,
        start: usize,
        end: usize,
        text: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            start,
            end,
            text: text.into(),
            score: score.clamp(0.0, 1.0),
        }
    }

    /// Number of codepoints covered by the span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no characters
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether two spans share at least one character
    pub fn overlaps(&self, other: &EntitySpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Where one replacement landed in the anonymized text
///
/// Unlike [`EntitySpan`], offsets index the *output* text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacedItem {
    /// Entity type that was replaced
    pub entity_type: String,
    /// Start offset in the output text (inclusive)
    pub start: usize,
    /// End offset in the output text (exclusive)
    pub end: usize,
    /// Replacement text
    pub text: String,
    /// Operator that produced the replacement
    pub operator: AnonymizationStrategy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_span_score_clamped() {
        let span = EntitySpan::new("PERSON", 0, 4, "John", 1.7);
        assert_eq!(span.score, 1.0);
        assert_eq!(span.len(), 4);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_entity_span_overlap() {
        let a = EntitySpan::new("PERSON", 0, 8, "John Doe", 0.85);
        let b = EntitySpan::new("PERSON", 5, 12, "Doe Jr", 0.5);
        let c = EntitySpan::new("EMAIL_ADDRESS", 8, 20, "@example.com", 1.0);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_entity_span_wire_names() {
        let span = EntitySpan::new("EMAIL_ADDRESS", 3, 10, "a@b.com", 1.0);
        let json = serde_json::to_value(&span).unwrap();
        assert_eq!(json["entity_type"], "EMAIL_ADDRESS");
        assert_eq!(json["text"], "a@b.com");
        assert_eq!(json["score"], 1.0);
    }
}
