//! Anonymization strategy and per-entity operator configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key in [`OperatorOverrides`] that applies to every entity type without its own entry
pub const DEFAULT_OPERATOR_KEY: &str = "DEFAULT";

/// Anonymization strategy applied to a detected span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnonymizationStrategy {
    /// Replace with the entity type label (or a configured value)
    #[default]
    Replace,
    /// Replace with a fixed `[REDACTED]` token
    Redact,
    /// Replace with a keyed HMAC-SHA256 digest
    Hash,
    /// Replace with masking characters
    Mask,
    /// Replace with a reversible AES-256-GCM ciphertext
    Encrypt,
}

impl AnonymizationStrategy {
    /// Wire name of the strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Redact => "redact",
            Self::Hash => "hash",
            Self::Mask => "mask",
            Self::Encrypt => "encrypt",
        }
    }

    /// All strategies, in the order advertised by the capabilities endpoint
    pub fn all() -> [AnonymizationStrategy; 5] {
        [
            Self::Replace,
            Self::Redact,
            Self::Hash,
            Self::Mask,
            Self::Encrypt,
        ]
    }
}

impl std::fmt::Display for AnonymizationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator settings for one entity type
///
/// Field names follow the Presidio operator JSON so that the same overrides can be
/// forwarded unchanged to a remote anonymizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorConfig {
    /// Strategy to apply
    #[serde(rename = "type")]
    pub strategy: AnonymizationStrategy,

    /// Replacement text for `replace`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,

    /// Character used by `mask`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masking_char: Option<char>,

    /// Number of characters `mask` hides; the whole value is replaced when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chars_to_mask: Option<usize>,

    /// Mask from the end of the value instead of the start
    #[serde(default)]
    pub from_end: bool,

    /// Key for `encrypt`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl OperatorConfig {
    /// Operator with no extra parameters
    pub fn new(strategy: AnonymizationStrategy) -> Self {
        Self {
            strategy,
            new_value: None,
            masking_char: None,
            chars_to_mask: None,
            from_end: false,
            key: None,
        }
    }
}

/// Per-entity-type operator overrides keyed by entity type (or [`DEFAULT_OPERATOR_KEY`])
pub type OperatorOverrides = HashMap<String, OperatorConfig>;

/// Pick the operator for `entity_type`
///
/// An entry for the entity type wins, then the `DEFAULT` entry, then the
/// request-wide strategy.
pub fn resolve_operator(
    strategy: AnonymizationStrategy,
    overrides: Option<&OperatorOverrides>,
    entity_type: &str,
) -> OperatorConfig {
    overrides
        .and_then(|o| o.get(entity_type).or_else(|| o.get(DEFAULT_OPERATOR_KEY)))
        .cloned()
        .unwrap_or_else(|| OperatorConfig::new(strategy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_serde() {
        let strategy: AnonymizationStrategy = serde_json::from_str("\"mask\"").unwrap();
        assert_eq!(strategy, AnonymizationStrategy::Mask);
        assert_eq!(
            serde_json::to_string(&AnonymizationStrategy::Encrypt).unwrap(),
            "\"encrypt\""
        );
        assert!(serde_json::from_str::<AnonymizationStrategy>("\"shuffle\"").is_err());
    }

    #[test]
    fn test_operator_config_presidio_shape() {
        let json = r##"{"type": "mask", "masking_char": "#", "chars_to_mask": 4, "from_end": true}"##;
        let op: OperatorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(op.strategy, AnonymizationStrategy::Mask);
        assert_eq!(op.masking_char, Some('#'));
        assert_eq!(op.chars_to_mask, Some(4));
        assert!(op.from_end);
    }

    #[test]
    fn test_resolve_operator_precedence() {
        let mut overrides = OperatorOverrides::new();
        overrides.insert(
            "PERSON".to_string(),
            OperatorConfig::new(AnonymizationStrategy::Redact),
        );
        overrides.insert(
            DEFAULT_OPERATOR_KEY.to_string(),
            OperatorConfig::new(AnonymizationStrategy::Hash),
        );

        let person = resolve_operator(AnonymizationStrategy::Replace, Some(&overrides), "PERSON");
        assert_eq!(person.strategy, AnonymizationStrategy::Redact);

        let email = resolve_operator(
            AnonymizationStrategy::Replace,
            Some(&overrides),
            "EMAIL_ADDRESS",
        );
        assert_eq!(email.strategy, AnonymizationStrategy::Hash);

        let plain = resolve_operator(AnonymizationStrategy::Mask, None, "PERSON");
        assert_eq!(plain.strategy, AnonymizationStrategy::Mask);
    }
}
