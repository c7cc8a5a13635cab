//! Redaction anonymization strategy

use super::Anonymizer;
use crate::anonymization::config::OperatorConfig;
use crate::domain::Result;

/// Token written in place of every redacted span
pub const REDACTED_TOKEN: &str = "[REDACTED]";

/// Redaction strategy - replaces PII with a fixed token regardless of type
pub struct RedactionStrategy;

impl Anonymizer for RedactionStrategy {
    fn anonymize(
        &self,
        _entity_type: &str,
        _value: &str,
        _operator: &OperatorConfig,
    ) -> Result<String> {
        Ok(REDACTED_TOKEN.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::config::AnonymizationStrategy;

    #[test]
    fn test_redaction() {
        let op = OperatorConfig::new(AnonymizationStrategy::Redact);
        let result = RedactionStrategy
            .anonymize("EMAIL_ADDRESS", "test@example.com", &op)
            .unwrap();
        assert_eq!(result, "[REDACTED]");
    }

    #[test]
    fn test_redaction_hides_type() {
        let op = OperatorConfig::new(AnonymizationStrategy::Redact);
        let a = RedactionStrategy.anonymize("PERSON", "John", &op).unwrap();
        let b = RedactionStrategy.anonymize("US_SSN", "123-45-6789", &op).unwrap();
        assert_eq!(a, b);
    }
}
