//! Secret configuration values
//!
//! API keys and the hash operator key are wrapped in [`SecretString`] so they
//! are zeroized on drop and never appear in `Debug` output or logs.
//!
//! # Example
//!
//! ```rust
//! use piiguard::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let api_key = secret_string("analyzer-token".to_string());
//! assert_eq!(api_key.expose_secret().as_str(), "analyzer-token");
//! assert!(!format!("{api_key:?}").contains("analyzer-token"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl SecretValue {
    /// Borrow the secret as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Borrow the secret as raw bytes (used as key material)
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Helper function to create a SecretString from a String
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
