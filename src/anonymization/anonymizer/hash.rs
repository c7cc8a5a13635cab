//! Hash anonymization strategy

use super::Anonymizer;
use crate::anonymization::config::OperatorConfig;
use crate::domain::Result;
use ring::hmac;

/// Hash strategy - keyed HMAC-SHA256 of the value, hex encoded
///
/// The same value always hashes to the same digest under one key, so hashed
/// output can still be joined across documents without revealing the value.
pub struct HashStrategy {
    key: hmac::Key,
}

impl HashStrategy {
    /// Create a hash strategy keyed with `key`
    pub fn new(key: &[u8]) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, key),
        }
    }
}

impl Anonymizer for HashStrategy {
    fn anonymize(
        &self,
        _entity_type: &str,
        value: &str,
        _operator: &OperatorConfig,
    ) -> Result<String> {
        let tag = hmac::sign(&self.key, value.as_bytes());
        Ok(hex::encode(tag.as_ref()))
    }
}
