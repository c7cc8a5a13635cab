//! Wire types for the remote analyzer and anonymizer

use crate::anonymization::config::{AnonymizationStrategy, OperatorConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `POST /analyze` body
#[derive(Debug, Serialize)]
pub struct AnalyzerRequest<'a> {
    pub text: &'a str,
    pub language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<f64>,
}

/// One element of the `POST /analyze` response
#[derive(Debug, Deserialize)]
pub struct AnalyzerResult {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    pub score: f64,
}

/// Span handed to the anonymizer
#[derive(Debug, Serialize)]
pub struct AnonymizerSpan<'a> {
    pub entity_type: &'a str,
    pub start: usize,
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Operator in the anonymizer's own vocabulary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteOperator {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masking_char: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chars_to_mask: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_end: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Masked length requested from the remote anonymizer when none is set; it
/// masks `min(chars_to_mask, len)` characters, so this hides the whole value.
const REMOTE_MASK_ALL: usize = 1024;

impl RemoteOperator {
    fn bare(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            new_value: None,
            masking_char: None,
            chars_to_mask: None,
            from_end: None,
            hash_type: None,
            key: None,
        }
    }

    /// Translate a local operator
    ///
    /// The remote `redact` operator deletes the span, so redaction is sent as a
    /// replacement with the `[REDACTED]` token to keep both engines' output alike.
    pub fn from_operator(op: &OperatorConfig) -> Self {
        match op.strategy {
            AnonymizationStrategy::Replace => Self {
                new_value: op.new_value.clone(),
                ..Self::bare("replace")
            },
            AnonymizationStrategy::Redact => Self {
                new_value: Some(
                    crate::anonymization::anonymizer::redaction::REDACTED_TOKEN.to_string(),
                ),
                ..Self::bare("replace")
            },
            AnonymizationStrategy::Mask => Self {
                masking_char: Some(op.masking_char.unwrap_or('*')),
                chars_to_mask: Some(op.chars_to_mask.unwrap_or(REMOTE_MASK_ALL)),
                from_end: Some(op.from_end),
                ..Self::bare("mask")
            },
            AnonymizationStrategy::Hash => Self {
                hash_type: Some("sha256".to_string()),
                ..Self::bare("hash")
            },
            AnonymizationStrategy::Encrypt => Self {
                key: op.key.clone(),
                ..Self::bare("encrypt")
            },
        }
    }

    /// Replacement with the entity type itself
    pub fn label(entity_type: &str) -> Self {
        Self {
            new_value: Some(entity_type.to_string()),
            ..Self::bare("replace")
        }
    }

    /// Decrypt operator for `POST /deanonymize`
    pub fn decrypt(key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            ..Self::bare("decrypt")
        }
    }
}

/// `POST /anonymize` body
#[derive(Debug, Serialize)]
pub struct AnonymizerRequest<'a> {
    pub text: &'a str,
    pub analyzer_results: Vec<AnonymizerSpan<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymizers: Option<HashMap<String, RemoteOperator>>,
}

/// `POST /deanonymize` body
#[derive(Debug, Serialize)]
pub struct DeanonymizerRequest<'a> {
    pub text: &'a str,
    pub anonymizer_results: Vec<AnonymizerSpan<'a>>,
    pub deanonymizers: HashMap<String, RemoteOperator>,
}

/// One replacement reported by the anonymizer
#[derive(Debug, Deserialize)]
pub struct AnonymizerItem {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub operator: String,
}

/// `POST /anonymize` and `POST /deanonymize` response
#[derive(Debug, Deserialize)]
pub struct AnonymizerResponse {
    pub text: String,
    #[serde(default)]
    pub items: Vec<AnonymizerItem>,
}
