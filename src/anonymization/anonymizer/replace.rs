//! Replace anonymization strategy

use super::Anonymizer;
use crate::anonymization::config::OperatorConfig;
use crate::domain::Result;

/// Replace strategy - substitutes the entity type label, or `new_value` when set
pub struct ReplaceStrategy;

impl Anonymizer for ReplaceStrategy {
    fn anonymize(
        &self,
        entity_type: &str,
        _value: &str,
        operator: &OperatorConfig,
    ) -> Result<String> {
        Ok(operator
            .new_value
            .clone()
            .unwrap_or_else(|| entity_type.to_string()))
    }
}
