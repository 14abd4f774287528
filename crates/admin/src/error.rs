//! Unified error handling for admin.

use thiserror::Error;

use crate::api::{AuthError, ConfirmOrderError};
use crate::config::ConfigError;
use crate::http::ApiError;
use crate::session::VaultError;

/// Application-level error type for front ends built on this crate.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Sign-in or recovery flow failed.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Order confirmation failed after all retries.
    #[error("{0}")]
    Confirm(#[from] ConfirmOrderError),

    /// Session storage failed.
    #[error("Session storage error: {0}")]
    Vault(#[from] VaultError),

    /// Bad input from the operator.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AdminError {
    /// Whether the failure means the operator must sign in again.
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        match self {
            Self::Api(e) | Self::Auth(AuthError::Api(e)) => e.is_auth_failure(),
            Self::Confirm(ConfirmOrderError::Failed { source, .. }) => source.is_auth_failure(),
            _ => false,
        }
    }

    /// Whether the failure should be reported to error tracking.
    ///
    /// Operator mistakes and rejected credentials are not.
    #[must_use]
    pub fn is_reportable(&self) -> bool {
        match self {
            Self::Api(e) | Self::Auth(AuthError::Api(e)) => e.is_server_error() || e.is_network(),
            Self::Confirm(e) => !matches!(e.category(), crate::http::ErrorCategory::Other),
            Self::Vault(_) => true,
            _ => false,
        }
    }
}
