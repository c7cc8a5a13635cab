//! Encrypt anonymization strategy
//!
//! Values are sealed with AES-256-GCM under a key derived from the caller's key
//! string (SHA-256 of its UTF-8 bytes). The replacement is the base64 encoding
//! of `nonce || ciphertext || tag`, which [`decrypt_value`] reverses.

use super::Anonymizer;
use crate::anonymization::config::OperatorConfig;
use crate::domain::{PiiGuardError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};

/// Random bytes in a generated key (hex encoded to twice this length)
const GENERATED_KEY_BYTES: usize = 16;

/// Encrypt strategy - reversible AES-256-GCM ciphertext
pub struct EncryptStrategy;

impl Anonymizer for EncryptStrategy {
    fn anonymize(
        &self,
        _entity_type: &str,
        value: &str,
        operator: &OperatorConfig,
    ) -> Result<String> {
        let key = operator.key.as_deref().ok_or_else(|| {
            PiiGuardError::Anonymization("encrypt operator requires a key".to_string())
        })?;
        encrypt_value(key, value)
    }
}

/// Fill `bytes` from the system CSPRNG
pub fn fill_random(bytes: &mut [u8]) -> Result<()> {
    SystemRandom::new().fill(bytes).map_err(|_| {
        PiiGuardError::Anonymization("System random source unavailable".to_string())
    })
}

/// Generate a fresh random key for a request that did not supply one
pub fn generate_key() -> Result<String> {
    let mut bytes = [0u8; GENERATED_KEY_BYTES];
    fill_random(&mut bytes)?;
    Ok(hex::encode(bytes))
}

/// The key already generated for this request, or a new one stored in `slot`
pub fn generated_key_in(slot: &mut Option<String>) -> Result<String> {
    if let Some(key) = slot {
        return Ok(key.clone());
    }
    let key = generate_key()?;
    *slot = Some(key.clone());
    Ok(key)
}

fn cipher_key(key: &str) -> Result<LessSafeKey> {
    if key.is_empty() {
        return Err(PiiGuardError::Anonymization(
            "encryption key cannot be empty".to_string(),
        ));
    }
    let digest = Sha256::digest(key.as_bytes());
    let unbound = UnboundKey::new(&AES_256_GCM, digest.as_slice())
        .map_err(|_| PiiGuardError::Anonymization("Invalid encryption key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `value` under `key`
pub fn encrypt_value(key: &str, value: &str) -> Result<String> {
    let cipher = cipher_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    fill_random(&mut nonce_bytes)?;

    let mut in_out = value.as_bytes().to_vec();
    cipher
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            &mut in_out,
        )
        .map_err(|_| PiiGuardError::Anonymization("Encryption failed".to_string()))?;

    let mut payload = Vec::with_capacity(NONCE_LEN + in_out.len());
    payload.extend_from_slice(&nonce_bytes);
    payload.extend_from_slice(&in_out);
    Ok(STANDARD.encode(payload))
}

/// Decrypt a value produced by [`encrypt_value`]
///
/// # Errors
///
/// Returns [`PiiGuardError::Anonymization`] when the payload is not valid
/// base64, is truncated, or fails authentication under `key`
pub fn decrypt_value(key: &str, ciphertext: &str) -> Result<String> {
    let cipher = cipher_key(key)?;

    let payload = STANDARD
        .decode(ciphertext.trim())
        .map_err(|e| PiiGuardError::Anonymization(format!("Ciphertext is not base64: {e}")))?;
    if payload.len() < NONCE_LEN + AES_256_GCM.tag_len() {
        return Err(PiiGuardError::Anonymization(
            "Ciphertext is too short".to_string(),
        ));
    }

    let (nonce_bytes, sealed) = payload.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| PiiGuardError::Anonymization("Invalid nonce".to_string()))?;

    let mut in_out = sealed.to_vec();
    let plaintext = cipher
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| {
            PiiGuardError::Anonymization(
                "Decryption failed: wrong key or corrupted data".to_string(),
            )
        })?;

    String::from_utf8(plaintext.to_vec())
        .map_err(|_| PiiGuardError::Anonymization("Decrypted value is not UTF-8".to_string()))
}
