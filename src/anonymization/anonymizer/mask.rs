//! Mask anonymization strategy

use super::Anonymizer;
use crate::anonymization::config::OperatorConfig;
use crate::domain::Result;

/// Masking character used when the operator does not set one
pub const DEFAULT_MASKING_CHAR: char = '*';

/// Length of the mask written when `chars_to_mask` is unset
pub const DEFAULT_MASK_LENGTH: usize = 8;

/// Mask strategy
///
/// Without `chars_to_mask` the whole value becomes a fixed-length run of the
/// masking character, so the output does not leak the value's length. With it,
/// that many characters are hidden from the start (or the end when `from_end`
/// is set) and the rest of the value is kept.
pub struct MaskStrategy;

impl Anonymizer for MaskStrategy {
    fn anonymize(
        &self,
        _entity_type: &str,
        value: &str,
        operator: &OperatorConfig,
    ) -> Result<String> {
        let mask_char = operator.masking_char.unwrap_or(DEFAULT_MASKING_CHAR);

        let Some(chars_to_mask) = operator.chars_to_mask else {
            return Ok(std::iter::repeat(mask_char)
                .take(DEFAULT_MASK_LENGTH)
                .collect());
        };

        let len = value.chars().count();
        let count = chars_to_mask.min(len);
        let (masked_from, masked_to) = if operator.from_end {
            (len - count, len)
        } else {
            (0, count)
        };

        Ok(value
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if (masked_from..masked_to).contains(&i) {
                    mask_char
                } else {
                    c
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::config::AnonymizationStrategy;

    fn mask_op() -> OperatorConfig {
        OperatorConfig::new(AnonymizationStrategy::Mask)
    }

    #[test]
    fn test_fixed_length_mask() {
        let result = MaskStrategy.anonymize("PERSON", "Jo", &mask_op()).unwrap();
        assert_eq!(result, "********");
        let result = MaskStrategy
            .anonymize("EMAIL_ADDRESS", "someone.long@example.com", &mask_op())
            .unwrap();
        assert_eq!(result, "********");
    }

    #[test]
    fn test_partial_mask_from_end() {
        let mut op = mask_op();
        op.masking_char = Some('#');
        op.chars_to_mask = Some(4);
        op.from_end = true;
        let result = MaskStrategy
            .anonymize("PHONE_NUMBER", "555-123-4567", &op)
            .unwrap();
        assert_eq!(result, "555-123-####");
    }

    #[test]
    fn test_partial_mask_from_start() {
        let mut op = mask_op();
        op.chars_to_mask = Some(3);
        let result = MaskStrategy.anonymize("PERSON", "José", &op).unwrap();
        assert_eq!(result, "***é");
    }

    #[test]
    fn test_mask_longer_than_value() {
        let mut op = mask_op();
        op.chars_to_mask = Some(50);
        let result = MaskStrategy.anonymize("PERSON", "John", &op).unwrap();
        assert_eq!(result, "****");
    }
}
