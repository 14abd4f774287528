//! Symmetric encryption for values held in the session store.
//!
//! Tokens and the cached profile never touch storage in plaintext. The
//! [`TokenCipher`] trait is the seam; [`AesGcmCipher`] is the production
//! implementation.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Size of AES-GCM nonce in bytes.
const NONCE_SIZE: usize = 12;

/// Errors raised while encrypting or decrypting a stored value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("encryption failed")]
    Encrypt,

    /// Stored value is not valid base64 or is too short to hold a nonce.
    #[error("stored value is malformed")]
    Malformed,

    /// Authentication tag mismatch: wrong key or tampered value.
    #[error("decryption failed")]
    Decrypt,

    #[error("decrypted value is not valid UTF-8")]
    InvalidUtf8,
}

/// Encrypts and decrypts values before they reach the session store.
pub trait TokenCipher: Send + Sync {
    /// Encrypt a plaintext value into its stored representation.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::Encrypt` if the cipher fails.
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError>;

    /// Decrypt a stored value back into plaintext.
    ///
    /// # Errors
    ///
    /// Returns a `CipherError` if the value is malformed or was not produced
    /// by this cipher's key.
    fn decrypt(&self, stored: &str) -> Result<String, CipherError>;
}

/// AES-256-GCM cipher keyed from the configured storage secret.
///
/// Stored format is `base64(nonce || ciphertext)` with a fresh random nonce
/// per value.
pub struct AesGcmCipher {
    cipher: Aes256Gcm,
}

impl AesGcmCipher {
    /// Derive the AES key from a storage secret with SHA-256.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let digest = Sha256::digest(secret.expose_secret().as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(digest.as_slice());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }
}

impl std::fmt::Debug for AesGcmCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl TokenCipher for AesGcmCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::Encrypt)?;

        let mut payload = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        payload.extend_from_slice(nonce.as_slice());
        payload.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(payload))
    }

    fn decrypt(&self, stored: &str) -> Result<String, CipherError> {
        let payload = BASE64
            .decode(stored.trim())
            .map_err(|_| CipherError::Malformed)?;
        if payload.len() <= NONCE_SIZE {
            return Err(CipherError::Malformed);
        }

        let (nonce, ciphertext) = payload.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CipherError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::InvalidUtf8)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cipher(secret: &str) -> AesGcmCipher {
        AesGcmCipher::new(&SecretString::from(secret))
    }

    #[test]
    fn test_decrypts_own_output() {
        let cipher = cipher("k3Y!9xQ#m2Lp8Zr@v5Tn1Wc$4Hs7Gd0B");
        let stored = cipher.encrypt("access-token-abc").unwrap();
        assert_ne!(stored, "access-token-abc");
        assert_eq!(cipher.decrypt(&stored).unwrap(), "access-token-abc");
    }

    #[test]
    fn test_fresh_nonce_per_value() {
        let cipher = cipher("k3Y!9xQ#m2Lp8Zr@v5Tn1Wc$4Hs7Gd0B");
        let a = cipher.encrypt("same").unwrap();
        let b = cipher.encrypt("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let stored = cipher("first-key-Q8#zL1!pV6").encrypt("token").unwrap();
        let result = cipher("second-key-W3$kM9@tR2").decrypt(&stored);
        assert_eq!(result, Err(CipherError::Decrypt));
    }

    #[test]
    fn test_malformed_input() {
        let cipher = cipher("k3Y!9xQ#m2Lp8Zr@v5Tn1Wc$4Hs7Gd0B");
        assert_eq!(cipher.decrypt("not base64 !!"), Err(CipherError::Malformed));
        assert_eq!(cipher.decrypt(&BASE64.encode([0u8; 4])), Err(CipherError::Malformed));
    }

    #[test]
    fn test_tampered_value_fails() {
        let cipher = cipher("k3Y!9xQ#m2Lp8Zr@v5Tn1Wc$4Hs7Gd0B");
        let stored = cipher.encrypt("token").unwrap();
        let mut bytes = BASE64.decode(&stored).unwrap();
        if let Some(last) = bytes.last_mut() {
            *last ^= 0xFF;
        }
        assert_eq!(cipher.decrypt(&BASE64.encode(bytes)), Err(CipherError::Decrypt));
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", cipher("super-secret-storage-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
