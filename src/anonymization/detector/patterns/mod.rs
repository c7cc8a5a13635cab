//! Pattern library for PII detection
//!
//! Recognizers are declared in TOML. Each entry names the entity type it
//! produces, one or more regexes, a base score, optional context words that
//! raise the score when they precede a match, and an optional checksum
//! validator.
//!
//! ```toml
//! [patterns.credit_card]
//! entity_type = "CREDIT_CARD"
//! patterns = ['\b(?:\d[ -]?){12,18}\d\b']
//! confidence = 0.9
//! context = ["card", "visa", "mastercard"]
//! validator = "luhn"
//! ```

use super::validators::Validator;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Entity type produced by this recognizer
    pub entity_type: String,
    /// Regex patterns for this recognizer
    pub patterns: Vec<String>,
    /// Base score (0.0 - 1.0)
    pub confidence: f64,
    /// Words that raise the score when found shortly before a match
    #[serde(default)]
    pub context: Vec<String>,
    /// Optional checksum validator
    #[serde(default)]
    pub validator: Option<Validator>,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Recognizer name (TOML table key)
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
    /// Entity type produced
    pub entity_type: String,
    /// Base score
    pub confidence: f64,
    /// Lowercased context words
    pub context: Vec<String>,
    /// Optional checksum validator
    pub validator: Option<Validator>,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    // BTreeMap keeps recognizer order stable across runs
    patterns: BTreeMap<String, PatternDefinition>,
}

/// Pattern registry for PII detection
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
    entity_types: BTreeSet<String>,
}

impl PatternRegistry {
    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut patterns = Vec::new();
        let mut entity_types = BTreeSet::new();

        for (name, def) in library.patterns {
            if def.entity_type.trim().is_empty() {
                anyhow::bail!("Pattern '{name}' has an empty entity_type");
            }
            if !(0.0..=1.0).contains(&def.confidence) {
                anyhow::bail!(
                    "Pattern '{name}' confidence must be between 0.0 and 1.0, got {}",
                    def.confidence
                );
            }

            let context: Vec<String> = def.context.iter().map(|w| w.to_lowercase()).collect();

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str)
                    .with_context(|| format!("Invalid regex in pattern '{name}': {pattern_str}"))?;

                patterns.push(CompiledPattern {
                    name: name.clone(),
                    regex,
                    entity_type: def.entity_type.clone(),
                    confidence: def.confidence,
                    context: context.clone(),
                    validator: def.validator,
                });
            }
            entity_types.insert(def.entity_type);
        }

        Ok(Self {
            patterns,
            entity_types,
        })
    }

    /// Create a default pattern registry with built-in patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Get all patterns
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Get patterns producing a specific entity type
    pub fn patterns_for_entity<'a>(
        &'a self,
        entity_type: &'a str,
    ) -> impl Iterator<Item = &'a CompiledPattern> + 'a {
        self.patterns
            .iter()
            .filter(move |p| p.entity_type == entity_type)
    }

    /// Entity types covered by the registry, sorted
    pub fn entity_types(&self) -> Vec<String> {
        self.entity_types.iter().cloned().collect()
    }

    /// Whether any recognizer produces `entity_type`
    pub fn supports(&self, entity_type: &str) -> bool {
        self.entity_types.contains(entity_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_patterns() {
        let registry = PatternRegistry::default_patterns().unwrap();
        assert!(!registry.all_patterns().is_empty());
        for entity in [
            "PERSON",
            "EMAIL_ADDRESS",
            "PHONE_NUMBER",
            "CREDIT_CARD",
            "US_SSN",
            "IP_ADDRESS",
            "URL",
            "IBAN_CODE",
            "DATE_TIME",
            "CRYPTO",
        ] {
            assert!(registry.supports(entity), "missing recognizer for {entity}");
        }
    }

    #[test]
    fn test_email_pattern() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let pattern = registry.patterns_for_entity("EMAIL_ADDRESS").next().unwrap();
        assert!(pattern.regex.is_match("test@example.com"));
        assert!(!pattern.regex.is_match("not-an-email"));
    }

    #[test]
    fn test_phone_pattern() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let has_match = registry
            .patterns_for_entity("PHONE_NUMBER")
            .any(|p| p.regex.is_match("Call me at (555) 123-4567"));
        assert!(has_match);
    }

    #[test]
    fn test_custom_library() {
        let toml = r#"
[patterns.employee_id]
entity_type = "EMPLOYEE_ID"
patterns = ['\bEMP-\d{6}\b']
confidence = 0.9
context = ["Employee"]
"#;
        let registry = PatternRegistry::from_toml(toml).unwrap();
        assert_eq!(registry.entity_types(), vec!["EMPLOYEE_ID".to_string()]);
        let pattern = &registry.all_patterns()[0];
        assert_eq!(pattern.context, vec!["employee".to_string()]);
        assert!(pattern.validator.is_none());
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let toml = r#"
[patterns.broken]
entity_type = "BROKEN"
patterns = ['(unclosed']
confidence = 0.5
"#;
        let err = PatternRegistry::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("Invalid regex"));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let toml = r#"
[patterns.loud]
entity_type = "LOUD"
patterns = ['x']
confidence = 1.5
"#;
        assert!(PatternRegistry::from_toml(toml).is_err());
    }
}
