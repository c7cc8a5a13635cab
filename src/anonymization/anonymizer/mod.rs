//! Anonymization operator module
//!
//! Each strategy is an [`Anonymizer`] that turns one matched value into its
//! replacement. [`OperatorSet`] holds one instance of every strategy and
//! dispatches on the resolved [`OperatorConfig`].

pub mod encrypt;
pub mod hash;
pub mod mask;
pub mod redaction;
pub mod replace;

use crate::anonymization::config::{AnonymizationStrategy, OperatorConfig};
use crate::domain::Result;

pub use encrypt::{
    decrypt_value, encrypt_value, fill_random, generate_key, generated_key_in, EncryptStrategy,
};
pub use hash::HashStrategy;
pub use mask::MaskStrategy;
pub use redaction::RedactionStrategy;
pub use replace::ReplaceStrategy;

/// Trait for anonymization strategy implementations
pub trait Anonymizer: Send + Sync {
    /// Produce the replacement for `value`, a span of type `entity_type`
    fn anonymize(&self, entity_type: &str, value: &str, operator: &OperatorConfig)
        -> Result<String>;
}

/// One instance of every strategy
pub struct OperatorSet {
    replace: ReplaceStrategy,
    redact: RedactionStrategy,
    mask: MaskStrategy,
    hash: HashStrategy,
    encrypt: EncryptStrategy,
}

impl OperatorSet {
    /// Create an operator set whose `hash` strategy is keyed with `hash_key`
    pub fn new(hash_key: &[u8]) -> Self {
        Self {
            replace: ReplaceStrategy,
            redact: RedactionStrategy,
            mask: MaskStrategy,
            hash: HashStrategy::new(hash_key),
            encrypt: EncryptStrategy,
        }
    }

    /// Strategy implementation for `strategy`
    pub fn strategy(&self, strategy: AnonymizationStrategy) -> &dyn Anonymizer {
        match strategy {
            AnonymizationStrategy::Replace => &self.replace,
            AnonymizationStrategy::Redact => &self.redact,
            AnonymizationStrategy::Mask => &self.mask,
            AnonymizationStrategy::Hash => &self.hash,
            AnonymizationStrategy::Encrypt => &self.encrypt,
        }
    }

    /// Apply `operator` to one value
    pub fn apply(&self, entity_type: &str, value: &str, operator: &OperatorConfig) -> Result<String> {
        self.strategy(operator.strategy)
            .anonymize(entity_type, value, operator)
    }
}
