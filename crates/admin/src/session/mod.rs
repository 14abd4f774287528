//! Encrypted session storage.
//!
//! The [`SessionVault`] is the only writer of the credential keys. It holds no
//! session state of its own: every read goes back to the store and through the
//! cipher, so a token written by another process (or wiped by a logout) is
//! seen on the very next request.
//!
//! # Keys
//!
//! | Key | Value |
//! |---|---|
//! | `dk.access_token` | bearer access token |
//! | `dk.refresh_token` | refresh token |
//! | `dk.user_profile` | JSON [`UserProfile`] of the signed-in admin |
//! | `dk.temp_email` | email awaiting OTP verification |
//!
//! A value that cannot be read or decrypted is treated as absent and removed.

pub mod cipher;
pub mod store;

use std::sync::Arc;

use dryklin_core::{Email, UserProfile};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, warn};

pub use cipher::{AesGcmCipher, CipherError, TokenCipher};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};

pub const ACCESS_TOKEN_KEY: &str = "dk.access_token";
pub const REFRESH_TOKEN_KEY: &str = "dk.refresh_token";
pub const USER_PROFILE_KEY: &str = "dk.user_profile";
pub const TEMP_EMAIL_KEY: &str = "dk.temp_email";

/// Errors raised while writing to the vault.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("failed to serialize session value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Access and refresh token issued together by the auth endpoints.
#[derive(Clone)]
pub struct CredentialPair {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
}

impl CredentialPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Encrypted view over a [`SessionStore`].
#[derive(Clone)]
pub struct SessionVault {
    store: Arc<dyn SessionStore>,
    cipher: Arc<dyn TokenCipher>,
}

impl SessionVault {
    pub fn new(store: Arc<dyn SessionStore>, cipher: Arc<dyn TokenCipher>) -> Self {
        Self { store, cipher }
    }

    /// Stored access token, if present and decryptable.
    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.read(ACCESS_TOKEN_KEY).map(SecretString::from)
    }

    /// Stored refresh token, if present and decryptable.
    #[must_use]
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.read(REFRESH_TOKEN_KEY).map(SecretString::from)
    }

    /// Both tokens, or `None` if either is missing or corrupted.
    #[must_use]
    pub fn credentials(&self) -> Option<CredentialPair> {
        let access_token = self.access_token();
        let refresh_token = self.refresh_token();
        Some(CredentialPair {
            access_token: access_token?,
            refresh_token: refresh_token?,
        })
    }

    /// Whether a complete credential pair is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credentials().is_some()
    }

    /// Overwrite both tokens.
    ///
    /// # Errors
    ///
    /// Returns `VaultError` if encryption or the store write fails.
    pub fn save_credentials(&self, pair: &CredentialPair) -> Result<(), VaultError> {
        let access = self.cipher.encrypt(pair.access_token.expose_secret())?;
        let refresh = self.cipher.encrypt(pair.refresh_token.expose_secret())?;
        self.store.set(ACCESS_TOKEN_KEY, &access)?;
        self.store.set(REFRESH_TOKEN_KEY, &refresh)?;
        debug!("stored credential pair");
        Ok(())
    }

    /// Cache the signed-in admin's profile.
    ///
    /// # Errors
    ///
    /// Returns `VaultError` if serialization, encryption or the store write fails.
    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), VaultError> {
        let json = serde_json::to_string(profile)?;
        self.write(USER_PROFILE_KEY, &json)
    }

    /// Cached profile, if present and readable.
    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        let json = self.read(USER_PROFILE_KEY)?;
        match serde_json::from_str(&json) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "cached profile is not valid JSON, discarding");
                self.discard(USER_PROFILE_KEY);
                None
            }
        }
    }

    /// Remember the email an OTP was sent to.
    ///
    /// # Errors
    ///
    /// Returns `VaultError` if encryption or the store write fails.
    pub fn set_temp_email(&self, email: &Email) -> Result<(), VaultError> {
        self.write(TEMP_EMAIL_KEY, email.as_str())
    }

    /// Email awaiting OTP verification.
    #[must_use]
    pub fn temp_email(&self) -> Option<Email> {
        let value = self.read(TEMP_EMAIL_KEY)?;
        match Email::parse(&value) {
            Ok(email) => Some(email),
            Err(e) => {
                warn!(error = %e, "stored OTP email is invalid, discarding");
                self.discard(TEMP_EMAIL_KEY);
                None
            }
        }
    }

    pub fn clear_temp_email(&self) {
        self.discard(TEMP_EMAIL_KEY);
    }

    /// Wipe every session value. Failures are logged, never raised, so a
    /// logout always completes.
    pub fn clear_all(&self) {
        for key in [
            ACCESS_TOKEN_KEY,
            REFRESH_TOKEN_KEY,
            USER_PROFILE_KEY,
            TEMP_EMAIL_KEY,
        ] {
            self.discard(key);
        }
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear session store");
        }
    }

    fn write(&self, key: &str, plaintext: &str) -> Result<(), VaultError> {
        let stored = self.cipher.encrypt(plaintext)?;
        self.store.set(key, &stored)?;
        Ok(())
    }

    /// Read and decrypt a key. Unreadable or undecryptable entries are removed.
    fn read(&self, key: &str) -> Option<String> {
        let stored = match self.store.get(key) {
            Ok(Some(stored)) => stored,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "failed to read session value, clearing it");
                self.discard(key);
                return None;
            }
        };

        match self.cipher.decrypt(&stored) {
            Ok(plaintext) => Some(plaintext),
            Err(e) => {
                warn!(key, error = %e, "stored session value is corrupted, clearing it");
                self.discard(key);
                None
            }
        }
    }

    fn discard(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key, error = %e, "failed to remove session value");
        }
    }
}

impl std::fmt::Debug for SessionVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionVault").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn vault() -> (SessionVault, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        let cipher = Arc::new(AesGcmCipher::new(&SecretString::from(
            "vault-test-key-7Yq!2mZ#9pL@4xW",
        )));
        (SessionVault::new(store.clone(), cipher), store)
    }

    #[test]
    fn test_credentials_round_trip_encrypted_at_rest() {
        let (vault, store) = vault();
        vault
            .save_credentials(&CredentialPair::new("access-1", "refresh-1"))
            .unwrap();

        let raw = store.get(ACCESS_TOKEN_KEY).unwrap().unwrap();
        assert!(!raw.contains("access-1"));

        let pair = vault.credentials().unwrap();
        assert_eq!(pair.access_token.expose_secret(), "access-1");
        assert_eq!(pair.refresh_token.expose_secret(), "refresh-1");
        assert!(vault.is_authenticated());
    }

    #[test]
    fn test_corrupted_access_token_is_removed() {
        let (vault, store) = vault();
        store.set(ACCESS_TOKEN_KEY, "garbage").unwrap();

        assert!(vault.access_token().is_none());
        assert!(store.get(ACCESS_TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn test_missing_refresh_token_means_no_session() {
        let (vault, store) = vault();
        vault
            .save_credentials(&CredentialPair::new("access-1", "refresh-1"))
            .unwrap();
        store.remove(REFRESH_TOKEN_KEY).unwrap();

        assert!(vault.access_token().is_some());
        assert!(vault.credentials().is_none());
        assert!(!vault.is_authenticated());
    }

    #[test]
    fn test_profile_round_trip() {
        let (vault, _) = vault();
        let profile: UserProfile = serde_json::from_str(
            r#"{"id": "u-1", "name": "Ada", "email": "ada@dryklin.com", "role": "SUPER_ADMIN"}"#,
        )
        .unwrap();
        vault.save_profile(&profile).unwrap();
        assert_eq!(vault.profile(), Some(profile));
    }

    #[test]
    fn test_temp_email_lifecycle() {
        let (vault, _) = vault();
        let email = Email::parse("ops@dryklin.com").unwrap();
        vault.set_temp_email(&email).unwrap();
        assert_eq!(vault.temp_email(), Some(email));

        vault.clear_temp_email();
        assert!(vault.temp_email().is_none());
    }

    #[test]
    fn test_clear_all_wipes_everything() {
        let (vault, store) = vault();
        vault
            .save_credentials(&CredentialPair::new("a", "r"))
            .unwrap();
        vault
            .set_temp_email(&Email::parse("ops@dryklin.com").unwrap())
            .unwrap();
        store.set("dk.other", "session-scoped").unwrap();

        vault.clear_all();
        assert!(store.is_empty());
    }

    #[test]
    fn test_credential_pair_debug_redacts() {
        let debug = format!("{:?}", CredentialPair::new("secret-a", "secret-r"));
        assert!(!debug.contains("secret-a"));
        assert!(!debug.contains("secret-r"));
    }
}
