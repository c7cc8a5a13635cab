//! Regex-based PII detector

use super::{
    patterns::{CompiledPattern, PatternRegistry},
    PiiDetector,
};
use crate::anonymization::models::{CharIndex, EntitySpan};
use crate::domain::{PiiGuardError, Result};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Number of words before a match searched for context words
const CONTEXT_WINDOW: usize = 5;

/// Score added when a context word precedes a match
const CONTEXT_BOOST: f64 = 0.35;

/// Regex-based PII detector
pub struct RegexDetector {
    pattern_registry: Arc<PatternRegistry>,
    languages: Vec<String>,
}

impl RegexDetector {
    /// Create a new regex detector with the built-in patterns
    pub fn new(languages: Vec<String>) -> Result<Self> {
        let registry = PatternRegistry::default_patterns()
            .map_err(|e| PiiGuardError::Configuration(format!("{e:#}")))?;
        Ok(Self::with_registry(registry, languages))
    }

    /// Create a new regex detector with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry, languages: Vec<String>) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
            languages,
        }
    }

    /// Run every selected recognizer over `text`
    fn collect_candidates(
        &self,
        text: &str,
        index: &CharIndex<'_>,
        wanted: &HashSet<&str>,
    ) -> Vec<EntitySpan> {
        let mut candidates = Vec::new();

        for pattern in self.pattern_registry.all_patterns() {
            if !wanted.contains(pattern.entity_type.as_str()) {
                continue;
            }

            for matched in pattern.regex.find_iter(text) {
                if matched.as_str().is_empty() {
                    continue;
                }
                if let Some(validator) = pattern.validator {
                    if !validator.validate(matched.as_str()) {
                        continue;
                    }
                }

                // Regex matches always land on char boundaries
                let (Some(start), Some(end)) = (
                    index.char_offset(matched.start()),
                    index.char_offset(matched.end()),
                ) else {
                    continue;
                };

                let score = score_with_context(pattern, &text[..matched.start()]);
                candidates.push(EntitySpan::new(
                    pattern.entity_type.clone(),
                    start,
                    end,
                    matched.as_str(),
                    score,
                ));
            }
        }

        candidates
    }
}

/// Base score, raised when a context word appears among the preceding words
fn score_with_context(pattern: &CompiledPattern, preceding: &str) -> f64 {
    if pattern.context.is_empty() {
        return pattern.confidence;
    }

    let has_context = preceding
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .rev()
        .take(CONTEXT_WINDOW)
        .any(|word| {
            let word = word.to_lowercase();
            pattern.context.iter().any(|c| *c == word)
        });

    if has_context {
        (pattern.confidence + CONTEXT_BOOST).min(1.0)
    } else {
        pattern.confidence
    }
}

/// Keep the strongest non-overlapping spans
///
/// Candidates are taken by score, then length, then position; anything that
/// overlaps an already kept span is discarded. The survivors are returned in
/// text order.
///
/// Kept spans are disjoint and keyed by start, so the only one that can
/// overlap a candidate is the last kept span starting before its end.
fn resolve_overlaps(mut candidates: Vec<EntitySpan>) -> Vec<EntitySpan> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.len().cmp(&a.len()))
            .then_with(|| a.start.cmp(&b.start))
    });

    let mut kept: BTreeMap<usize, EntitySpan> = BTreeMap::new();
    for candidate in candidates {
        if candidate.is_empty() {
            continue;
        }
        let blocked = kept
            .range(..candidate.end)
            .next_back()
            .is_some_and(|(_, k)| k.overlaps(&candidate));
        if !blocked {
            kept.insert(candidate.start, candidate);
        }
    }

    kept.into_values().collect()
}

impl PiiDetector for RegexDetector {
    fn detect(
        &self,
        text: &str,
        entities: Option<&[String]>,
        language: &str,
        score_threshold: f64,
    ) -> Result<Vec<EntitySpan>> {
        if !self.languages.iter().any(|l| l == language) {
            return Err(PiiGuardError::Validation(format!(
                "Unsupported language '{language}'. Supported: {}",
                self.languages.join(", ")
            )));
        }

        let wanted: HashSet<&str> = match entities.filter(|e| !e.is_empty()) {
            Some(filter) => {
                let wanted: HashSet<&str> = filter
                    .iter()
                    .map(String::as_str)
                    .filter(|e| self.pattern_registry.supports(e))
                    .collect();
                if wanted.is_empty() {
                    return Err(PiiGuardError::Validation(format!(
                        "None of the requested entity types are supported: {}",
                        filter.join(", ")
                    )));
                }
                wanted
            }
            None => self
                .pattern_registry
                .all_patterns()
                .iter()
                .map(|p| p.entity_type.as_str())
                .collect(),
        };

        if text.is_empty() {
            return Ok(Vec::new());
        }

        let index = CharIndex::new(text);
        let candidates = self
            .collect_candidates(text, &index, &wanted)
            .into_iter()
            .filter(|span| span.score >= score_threshold)
            .collect();

        Ok(resolve_overlaps(candidates))
    }

    fn supported_entities(&self) -> Vec<String> {
        self.pattern_registry.entity_types()
    }

    fn supported_languages(&self) -> Vec<String> {
        self.languages.clone()
    }
}
