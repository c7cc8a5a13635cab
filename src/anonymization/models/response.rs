//! Response payloads for the text endpoints

use super::{EntitySpan, ReplacedItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Detection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Detected spans, in the order the engine reported them
    pub entities: Vec<EntitySpan>,
    /// Processing time in seconds
    pub processing_time: f64,
}

/// Anonymization result
///
/// `entities` are the detection spans and index the text that was submitted.
/// `items` describe the replacements and index the returned `text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizeResponse {
    /// Anonymized text
    pub text: String,
    /// Detection spans (pre-replacement offsets)
    pub entities: Vec<EntitySpan>,
    /// Replacements (post-replacement offsets)
    #[serde(default)]
    pub items: Vec<ReplacedItem>,
    /// Processing time in seconds
    pub processing_time: f64,
    /// Generated key, present only when `encrypt` ran without a caller key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<String>,
}

/// Batch anonymization result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAnonymizeResponse {
    /// One result per input text, in input order
    pub results: Vec<AnonymizeResponse>,
    /// Sum of the per-item processing times, in seconds
    pub total_processing_time: f64,
}

/// Deanonymization result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeanonymizeResponse {
    /// Text with encrypted spans restored
    pub text: String,
    /// Restored spans (offsets into the returned text)
    pub items: Vec<ReplacedItem>,
}

/// Summary statistics attached to the advanced anonymization result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisDetails {
    /// Number of detected spans
    pub total_entities: usize,
    /// Distinct entity types, sorted
    pub entity_types: Vec<String>,
    /// Mean score over all spans (0 when nothing was found)
    pub average_confidence: f64,
}

impl AnalysisDetails {
    /// Summarize a set of spans
    pub fn from_entities(entities: &[EntitySpan]) -> Self {
        let entity_types: BTreeSet<&str> =
            entities.iter().map(|e| e.entity_type.as_str()).collect();
        let average_confidence = if entities.is_empty() {
            0.0
        } else {
            entities.iter().map(|e| e.score).sum::<f64>() / entities.len() as f64
        };

        Self {
            total_entities: entities.len(),
            entity_types: entity_types.into_iter().map(str::to_string).collect(),
            average_confidence,
        }
    }
}

/// Advanced (form-based) anonymization result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedAnonymizeResponse {
    /// Submitted text
    pub original_text: String,
    /// Anonymized text
    pub anonymized_text: String,
    /// Detection spans (pre-replacement offsets)
    pub entities: Vec<EntitySpan>,
    /// Processing time in seconds
    pub processing_time: f64,
    /// Summary statistics
    pub analysis_details: AnalysisDetails,
}

/// Detection engine description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineInfo {
    /// Engine name
    pub name: String,
    /// Engine version
    pub version: String,
    /// Entity types the engine can detect
    pub supported_entities: Vec<String>,
    /// Language tags the engine accepts
    pub supported_languages: Vec<String>,
}
