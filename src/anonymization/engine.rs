//! Replacement engine
//!
//! This module provides the [`ReplacementEngine`] that turns a text and a set
//! of detected spans into anonymized text.
//!
//! # Offsets
//!
//! Every replacement is computed against the immutable input text. Spans are
//! visited in start order and the output is assembled from the untouched gaps
//! between them plus each span's replacement, so a replacement that is longer
//! or shorter than the value it hides never shifts the position of a span that
//! is still pending.
//!
//! The engine reports two sets of offsets:
//! - the input spans, unchanged, which index the *input* text
//! - [`ReplacedItem`]s, which say where each replacement landed in the *output*
//!
//! # Examples
//!
//! ```
//! use piiguard::anonymization::config::AnonymizationStrategy;
//! use piiguard::anonymization::engine::ReplacementEngine;
//! use piiguard::anonymization::models::EntitySpan;
//!
//! let engine = ReplacementEngine::new(b"hash-key");
//! let text = "Contact John Doe at john@example.com";
//! let spans = vec![
//!     EntitySpan::new("PERSON", 8, 16, "John Doe", 0.85),
//!     EntitySpan::new("EMAIL_ADDRESS", 20, 36, "john@example.com", 1.0),
//! ];
//!
//! let outcome = engine
//!     .anonymize(text, &spans, AnonymizationStrategy::Replace, None, None)
//!     .unwrap();
//! assert_eq!(outcome.text, "Contact PERSON at EMAIL_ADDRESS");
//! assert_eq!(outcome.items[1].start, 18);
//! ```

use crate::anonymization::{
    anonymizer::{decrypt_value, generated_key_in, OperatorSet},
    config::{resolve_operator, AnonymizationStrategy, OperatorOverrides},
    models::{CharIndex, DeanonymizeEntity, EntitySpan, ReplacedItem},
};
use crate::domain::{PiiGuardError, Result};
use std::time::{Duration, Instant};

/// Result of one anonymization pass
#[derive(Debug, Clone)]
pub struct ReplacementOutcome {
    /// Anonymized text
    pub text: String,
    /// Replacements, in text order, with offsets into `text`
    pub items: Vec<ReplacedItem>,
    /// Time spent replacing
    pub elapsed: Duration,
    /// Key generated for the `encrypt` strategy when the caller supplied none
    pub generated_key: Option<String>,
}

/// Result of reversing encrypted spans
#[derive(Debug, Clone)]
pub struct DeanonymizeOutcome {
    /// Text with the encrypted spans restored
    pub text: String,
    /// Restored spans, with offsets into `text`
    pub items: Vec<ReplacedItem>,
}

/// In-process replacement engine
///
/// Holds the operator implementations; cheap to share behind an `Arc`.
pub struct ReplacementEngine {
    operators: OperatorSet,
}

impl ReplacementEngine {
    /// Create an engine whose `hash` strategy is keyed with `hash_key`
    pub fn new(hash_key: &[u8]) -> Self {
        Self {
            operators: OperatorSet::new(hash_key),
        }
    }

    /// Replace every span in `text`
    ///
    /// Each span's operator is resolved from `overrides` (its entity type, then
    /// `DEFAULT`) and falls back to `strategy`. Spans encrypted without an
    /// operator key use `encryption_key`; when that is `None` too, a key is
    /// generated once and returned in [`ReplacementOutcome::generated_key`].
    ///
    /// # Errors
    ///
    /// Returns [`PiiGuardError::Anonymization`] if a span is empty, runs past the
    /// end of the text, does not match the text it claims to cover, or overlaps
    /// another span.
    pub fn anonymize(
        &self,
        text: &str,
        spans: &[EntitySpan],
        strategy: AnonymizationStrategy,
        overrides: Option<&OperatorOverrides>,
        encryption_key: Option<&str>,
    ) -> Result<ReplacementOutcome> {
        let started = Instant::now();

        if spans.is_empty() {
            return Ok(ReplacementOutcome {
                text: text.to_string(),
                items: Vec::new(),
                elapsed: started.elapsed(),
                generated_key: None,
            });
        }

        let index = CharIndex::new(text);
        for span in spans {
            if let Some(covered) = index.slice(span.start, span.end) {
                if covered != span.text {
                    return Err(PiiGuardError::Anonymization(format!(
                        "{} span [{}, {}) does not match the input text",
                        span.entity_type, span.start, span.end
                    )));
                }
            }
        }

        let mut generated_key: Option<String> = None;
        let placed = rewrite(
            &index,
            spans,
            |s| (s.start, s.end),
            |span, value| {
                let mut operator = resolve_operator(strategy, overrides, &span.entity_type);
                if operator.strategy == AnonymizationStrategy::Encrypt && operator.key.is_none() {
                    let key = match encryption_key {
                        Some(key) => key.to_string(),
                        None => generated_key_in(&mut generated_key)?,
                    };
                    operator.key = Some(key);
                }

                let replacement = self.operators.apply(&span.entity_type, value, &operator)?;
                Ok((replacement, operator.strategy))
            },
        )?;

        let (text, items) = assemble(&index, placed, |span: &EntitySpan| span.entity_type.clone());

        tracing::debug!(
            spans = spans.len(),
            strategy = %strategy,
            "Replaced spans"
        );

        Ok(ReplacementOutcome {
            text,
            items,
            elapsed: started.elapsed(),
            generated_key,
        })
    }

    /// Decrypt the spans of `text` that the `encrypt` strategy produced
    ///
    /// `entities` index the anonymized text, exactly as returned in the `items`
    /// of an anonymization result.
    ///
    /// # Errors
    ///
    /// Returns [`PiiGuardError::Anonymization`] for invalid or overlapping spans
    /// and for any span that does not decrypt under `key`.
    pub fn deanonymize(
        &self,
        text: &str,
        entities: &[DeanonymizeEntity],
        key: &str,
    ) -> Result<DeanonymizeOutcome> {
        let index = CharIndex::new(text);
        let placed = rewrite(
            &index,
            entities,
            |e| (e.start, e.end),
            |_, value| Ok((decrypt_value(key, value)?, AnonymizationStrategy::Encrypt)),
        )?;

        let (text, items) =
            assemble(&index, placed, |entity: &DeanonymizeEntity| entity.entity_type.clone());
        Ok(DeanonymizeOutcome { text, items })
    }
}

/// Compute a replacement for every span, validating bounds and overlap
///
/// Spans are visited in start order. The closure receives the span and the
/// substring it covers in the original text.
fn rewrite<'s, T>(
    index: &CharIndex<'_>,
    spans: &'s [T],
    bounds: impl Fn(&T) -> (usize, usize),
    mut replace: impl FnMut(&T, &str) -> Result<(String, AnonymizationStrategy)>,
) -> Result<Vec<(&'s T, (usize, usize), String, AnonymizationStrategy)>> {
    let mut ordered: Vec<&T> = spans.iter().collect();
    ordered.sort_by_key(|s| bounds(s));

    let mut placed = Vec::with_capacity(ordered.len());
    let mut cursor = 0;
    for span in ordered {
        let (start, end) = bounds(span);
        if start >= end || end > index.char_len() {
            return Err(PiiGuardError::Anonymization(format!(
                "Span [{start}, {end}) is outside the text (length {})",
                index.char_len()
            )));
        }
        if start < cursor {
            return Err(PiiGuardError::Anonymization(format!(
                "Span [{start}, {end}) overlaps a previous span ending at {cursor}"
            )));
        }

        let value = index.slice(start, end).ok_or_else(|| {
            PiiGuardError::Anonymization(format!("Span [{start}, {end}) is not addressable"))
        })?;
        let (replacement, operator) = replace(span, value)?;
        placed.push((span, (start, end), replacement, operator));
        cursor = end;
    }

    Ok(placed)
}

/// Stitch the untouched gaps and the replacements into the output text
fn assemble<T>(
    index: &CharIndex<'_>,
    placed: Vec<(&T, (usize, usize), String, AnonymizationStrategy)>,
    entity_type: impl Fn(&T) -> String,
) -> (String, Vec<ReplacedItem>) {
    let mut out = String::new();
    let mut out_len = 0;
    let mut cursor = 0;
    let mut items = Vec::with_capacity(placed.len());

    for (span, (start, end), replacement, operator) in placed {
        // Bounds were checked by `rewrite`
        let gap = index.slice(cursor, start).unwrap_or_default();
        out.push_str(gap);
        out_len += start - cursor;

        let len = replacement.chars().count();
        out.push_str(&replacement);
        items.push(ReplacedItem {
            entity_type: entity_type(span),
            start: out_len,
            end: out_len + len,
            text: replacement,
            operator,
        });
        out_len += len;
        cursor = end;
    }

    out.push_str(index.slice(cursor, index.char_len()).unwrap_or_default());
    (out, items)
}
