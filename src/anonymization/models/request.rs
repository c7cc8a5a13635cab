//! Request payloads for the text endpoints

use crate::anonymization::config::{AnonymizationStrategy, OperatorOverrides};
use crate::domain::{PiiGuardError, Result};
use serde::{Deserialize, Serialize};

/// Language assumed when a request does not name one
pub const DEFAULT_LANGUAGE: &str = "en";

/// Score threshold assumed when a request does not set one
///
/// The remote analyzer treats this value as its own default, so it is left out
/// of outbound requests.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.35;

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_score_threshold() -> f64 {
    DEFAULT_SCORE_THRESHOLD
}

/// Request to detect PII without modifying the text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Text to analyze
    pub text: String,

    /// Entity types to detect (all supported types when unset or empty)
    #[serde(default)]
    pub entities: Option<Vec<String>>,

    /// Language of the text
    #[serde(default = "default_language")]
    pub language: String,

    /// Minimum confidence score
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,
}

impl AnalyzeRequest {
    /// Request with default language and threshold
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entities: None,
            language: default_language(),
            score_threshold: default_score_threshold(),
        }
    }

    /// Non-empty allow-list, if any
    pub fn entity_filter(&self) -> Option<&[String]> {
        self.entities.as_deref().filter(|e| !e.is_empty())
    }

    /// Check caller-supplied parameters
    ///
    /// # Errors
    ///
    /// Returns [`PiiGuardError::Validation`] for a threshold outside `[0, 1]` or
    /// an empty language tag
    pub fn validate(&self) -> Result<()> {
        validate_common(&self.language, self.score_threshold)
    }
}

/// Request to detect and replace PII
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizeRequest {
    /// Text to anonymize
    pub text: String,

    /// Entity types to anonymize (all supported types when unset or empty)
    #[serde(default)]
    pub entities: Option<Vec<String>>,

    /// Language of the text
    #[serde(default = "default_language")]
    pub language: String,

    /// Minimum confidence score
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,

    /// Strategy for every entity type without an override
    #[serde(default)]
    pub anonymization_mode: AnonymizationStrategy,

    /// Per-entity-type operator overrides
    #[serde(default)]
    pub anonymizers: Option<OperatorOverrides>,

    /// Key for the `encrypt` strategy; generated and returned when unset
    #[serde(default)]
    pub encryption_key: Option<String>,
}

impl AnonymizeRequest {
    /// Request with default settings and the given strategy
    pub fn new(text: impl Into<String>, strategy: AnonymizationStrategy) -> Self {
        Self {
            text: text.into(),
            entities: None,
            language: default_language(),
            score_threshold: default_score_threshold(),
            anonymization_mode: strategy,
            anonymizers: None,
            encryption_key: None,
        }
    }

    /// The detection half of this request
    pub fn analyze_request(&self) -> AnalyzeRequest {
        AnalyzeRequest {
            text: self.text.clone(),
            entities: self.entities.clone(),
            language: self.language.clone(),
            score_threshold: self.score_threshold,
        }
    }

    /// Check caller-supplied parameters
    pub fn validate(&self) -> Result<()> {
        validate_common(&self.language, self.score_threshold)?;
        if let Some(ref overrides) = self.anonymizers {
            for (entity_type, op) in overrides {
                if op.chars_to_mask == Some(0) {
                    return Err(PiiGuardError::Validation(format!(
                        "anonymizers.{entity_type}.chars_to_mask must be greater than 0"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Request to anonymize several texts with the same settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAnonymizeRequest {
    /// Texts to anonymize, processed in order
    pub texts: Vec<String>,

    /// Entity types to anonymize
    #[serde(default)]
    pub entities: Option<Vec<String>>,

    /// Language of every text
    #[serde(default = "default_language")]
    pub language: String,

    /// Minimum confidence score
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,

    /// Strategy applied to every text
    #[serde(default)]
    pub anonymization_mode: AnonymizationStrategy,

    /// Per-entity-type operator overrides
    #[serde(default)]
    pub anonymizers: Option<OperatorOverrides>,

    /// Key for the `encrypt` strategy, shared by every item
    #[serde(default)]
    pub encryption_key: Option<String>,
}

impl BatchAnonymizeRequest {
    /// Single-text request for one batch item
    pub fn item_request(&self, text: &str) -> AnonymizeRequest {
        AnonymizeRequest {
            text: text.to_string(),
            entities: self.entities.clone(),
            language: self.language.clone(),
            score_threshold: self.score_threshold,
            anonymization_mode: self.anonymization_mode,
            anonymizers: self.anonymizers.clone(),
            encryption_key: self.encryption_key.clone(),
        }
    }

    /// Check caller-supplied parameters
    pub fn validate(&self) -> Result<()> {
        validate_common(&self.language, self.score_threshold)
    }
}

/// A span to decrypt, indexing the anonymized text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeanonymizeEntity {
    /// Entity type the span was produced for
    pub entity_type: String,
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

/// Request to reverse the `encrypt` strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeanonymizeRequest {
    /// Anonymized text
    pub text: String,
    /// Encrypted spans (the `items` of an anonymize response)
    pub entities: Vec<DeanonymizeEntity>,
    /// Key that was used to encrypt
    pub key: String,
}

impl DeanonymizeRequest {
    /// Check caller-supplied parameters
    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(PiiGuardError::Validation(
                "key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_common(language: &str, score_threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&score_threshold) {
        return Err(PiiGuardError::Validation(format!(
            "score_threshold must be between 0.0 and 1.0, got {score_threshold}"
        )));
    }
    if language.trim().is_empty() {
        return Err(PiiGuardError::Validation(
            "language cannot be empty".to_string(),
        ));
    }
    Ok(())
}
