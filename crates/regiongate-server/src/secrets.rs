//! Admin secret recovery using AES-256-GCM.
//!
//! The shared secret guarding privileged routes is stored encrypted in
//! configuration and decrypted once at startup; requests are then compared
//! against the recovered plaintext.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rand::RngCore;
use std::sync::Arc;

/// Nonce size for AES-256-GCM (96 bits)
const NONCE_SIZE: usize = 12;

/// Key size for AES-256 (256 bits)
pub const KEY_SIZE: usize = 32;

/// Errors from secret recovery.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    /// The configured key is not a 64-character hex string.
    #[error("invalid key: {message}")]
    InvalidKey {
        /// Description of the key problem.
        message: String,
    },

    /// The ciphertext or nonce could not be decoded or decrypted.
    #[error("decryption failed: {message}")]
    Decryption {
        /// Description of the decryption problem.
        message: String,
    },

    /// Encryption failed (encrypt helper only).
    #[error("encryption failed: {message}")]
    Encryption {
        /// Description of the encryption problem.
        message: String,
    },
}

impl SecretError {
    fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    fn decryption(message: impl Into<String>) -> Self {
        Self::Decryption {
            message: message.into(),
        }
    }

    fn encryption(message: impl Into<String>) -> Self {
        Self::Encryption {
            message: message.into(),
        }
    }
}

/// Parses a hex-encoded 256-bit key.
pub fn parse_key_hex(key_hex: &str) -> Result<[u8; KEY_SIZE], SecretError> {
    let bytes = hex::decode(key_hex).map_err(|e| SecretError::invalid_key(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| SecretError::invalid_key(format!("key must be {KEY_SIZE} bytes")))
}

/// Decrypts a base64 ciphertext + nonce pair with the given key.
pub fn decrypt(
    ciphertext_b64: &str,
    nonce_b64: &str,
    key: &[u8; KEY_SIZE],
) -> Result<String, SecretError> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| SecretError::decryption(format!("Failed to create cipher: {e}")))?;

    let ciphertext = BASE64
        .decode(ciphertext_b64)
        .map_err(|e| SecretError::decryption(format!("Invalid ciphertext base64: {e}")))?;

    let nonce_bytes = BASE64
        .decode(nonce_b64)
        .map_err(|e| SecretError::decryption(format!("Invalid nonce base64: {e}")))?;

    if nonce_bytes.len() != NONCE_SIZE {
        return Err(SecretError::decryption("Invalid nonce size"));
    }

    let nonce = Nonce::from_slice(&nonce_bytes);

    let plaintext = cipher
        .decrypt(nonce, ciphertext.as_ref())
        .map_err(|e| SecretError::decryption(format!("Decryption failed: {e}")))?;

    String::from_utf8(plaintext)
        .map_err(|e| SecretError::decryption(format!("Invalid UTF-8 in decrypted value: {e}")))
}

/// Encrypts a plaintext with a fresh random nonce.
///
/// Returns `(ciphertext_b64, nonce_b64)` ready to paste into
/// configuration. Operational helper; the server itself only decrypts.
pub fn encrypt(plaintext: &str, key: &[u8; KEY_SIZE]) -> Result<(String, String), SecretError> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| SecretError::encryption(format!("Failed to create cipher: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| SecretError::encryption(format!("Encryption failed: {e}")))?;

    Ok((BASE64.encode(&ciphertext), BASE64.encode(nonce_bytes)))
}

/// The recovered admin secret, compared against the `secretKey` header of
/// privileged requests.
#[derive(Clone)]
pub struct AdminSecret(Arc<str>);

impl AdminSecret {
    /// Recovers the secret from its encrypted configuration form.
    pub fn from_encrypted(
        ciphertext_b64: &str,
        nonce_b64: &str,
        key_hex: &str,
    ) -> Result<Self, SecretError> {
        let key = parse_key_hex(key_hex)?;
        let plaintext = decrypt(ciphertext_b64, nonce_b64, &key)?;
        Ok(Self(plaintext.into()))
    }

    /// Checks a presented header value against the recovered secret.
    #[must_use]
    pub fn verify(&self, presented: &str) -> bool {
        presented == &*self.0
    }
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the plaintext.
        f.write_str("AdminSecret(****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "dd712682983e1d71b80bdf2f7a15353846d48552b886242dbab3d0fbafb95ec1";

    #[test]
    fn encrypt_then_recover() {
        let key = parse_key_hex(KEY_HEX).unwrap();
        let (ciphertext, nonce) = encrypt("s3cret-admin-token", &key).unwrap();

        let admin = AdminSecret::from_encrypted(&ciphertext, &nonce, KEY_HEX).unwrap();
        assert!(admin.verify("s3cret-admin-token"));
        assert!(!admin.verify("wrong"));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = parse_key_hex(KEY_HEX).unwrap();
        let (ciphertext, nonce) = encrypt("secret", &key).unwrap();

        let mut tampered = BASE64.decode(&ciphertext).unwrap();
        tampered[0] ^= 0xff;
        let tampered = BASE64.encode(&tampered);

        assert!(matches!(
            decrypt(&tampered, &nonce, &key),
            Err(SecretError::Decryption { .. })
        ));
    }

    #[test]
    fn rejects_malformed_key() {
        assert!(matches!(
            parse_key_hex("not-hex"),
            Err(SecretError::InvalidKey { .. })
        ));
        assert!(matches!(
            parse_key_hex("dead"),
            Err(SecretError::InvalidKey { .. })
        ));
    }

    #[test]
    fn rejects_wrong_nonce_size() {
        let key = parse_key_hex(KEY_HEX).unwrap();
        let (ciphertext, _) = encrypt("secret", &key).unwrap();
        let short_nonce = BASE64.encode([0u8; 4]);

        assert!(matches!(
            decrypt(&ciphertext, &short_nonce, &key),
            Err(SecretError::Decryption { .. })
        ));
    }

    #[test]
    fn debug_never_leaks_plaintext() {
        let key = parse_key_hex(KEY_HEX).unwrap();
        let (ciphertext, nonce) = encrypt("super-secret", &key).unwrap();
        let admin = AdminSecret::from_encrypted(&ciphertext, &nonce, KEY_HEX).unwrap();

        assert!(!format!("{admin:?}").contains("super-secret"));
    }
}
