//! Sign-in, OTP and password recovery.
//!
//! These are the only calls that write credentials into the vault besides the
//! session guard's refresh.

use dryklin_core::{Email, EmailError, UserProfile};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::require;
use crate::http::{ApiClient, ApiError, ApiRequest};
use crate::navigation::{is_auth_route, routes};
use crate::session::{CredentialPair, VaultError};

/// Errors from the authentication flows.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    InvalidEmail(#[from] EmailError),

    #[error("login response carried no tokens")]
    MissingTokens,

    #[error("no email is awaiting OTP verification")]
    NoPendingEmail,
}

/// Body of a successful `POST /auth/login`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default, alias = "admin")]
    pub user: Option<UserProfile>,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyOtpRequest<'a> {
    email: &'a str,
    otp: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest<'a> {
    token: &'a str,
    new_password: &'a str,
}

/// Authentication endpoints.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Sign in, persist the credential pair and profile, and go to the
    /// dashboard.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the email is malformed, the API rejects the
    /// credentials, the response has no tokens, or the vault write fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<UserProfile, AuthError> {
        let email = Email::parse(email)?;
        require("password", password.expose_secret())?;

        let response: LoginResponse = self
            .client
            .post(
                "/auth/login",
                &LoginRequest {
                    email: email.as_str(),
                    password: password.expose_secret(),
                },
            )
            .await?;

        let (Some(access), Some(refresh)) = (response.access_token, response.refresh_token) else {
            return Err(AuthError::MissingTokens);
        };
        let vault = self.client.vault();
        vault.save_credentials(&CredentialPair::new(access, refresh))?;

        let profile = match response.user {
            Some(profile) => profile,
            None => self.client.get("/auth/me").await?,
        };
        vault.save_profile(&profile)?;

        info!(admin = %profile.email, "signed in");
        self.client.navigator().redirect(routes::DASHBOARD);
        Ok(profile)
    }

    /// Send a one-time code to `email` and remember it for verification.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the email is malformed, the request fails, or
    /// the vault write fails.
    #[instrument(skip(self))]
    pub async fn request_otp(&self, email: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        self.client
            .send(&ApiRequest::post("/auth/otp/send").json(&EmailRequest {
                email: email.as_str(),
            })?)
            .await?;
        self.client.vault().set_temp_email(&email)?;
        Ok(())
    }

    /// Verify a one-time code for the remembered email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoPendingEmail` if no OTP was requested, or the
    /// request error.
    #[instrument(skip(self, code))]
    pub async fn verify_otp(&self, code: &str) -> Result<(), AuthError> {
        require("otp", code)?;
        let vault = self.client.vault();
        let email = vault.temp_email().ok_or(AuthError::NoPendingEmail)?;

        self.client
            .send(&ApiRequest::post("/auth/otp/verify").json(&VerifyOtpRequest {
                email: email.as_str(),
                otp: code.trim(),
            })?)
            .await?;
        vault.clear_temp_email();
        Ok(())
    }

    /// Start password recovery for `email`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the email is malformed or the request fails.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        self.client
            .send(&ApiRequest::post("/auth/password/forgot").json(&EmailRequest {
                email: email.as_str(),
            })?)
            .await?;
        Ok(())
    }

    /// Complete password recovery.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if either input is blank or the request fails.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, token: &str, new_password: &SecretString) -> Result<(), AuthError> {
        require("token", token)?;
        require("password", new_password.expose_secret())?;
        self.client
            .send(&ApiRequest::post("/auth/password/reset").json(&ResetPasswordRequest {
                token: token.trim(),
                new_password: new_password.expose_secret(),
            })?)
            .await?;
        Ok(())
    }

    /// Sign out. The server call is best-effort; local session state is
    /// always cleared and the operator is sent to sign-in exactly once.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let guarded = !is_auth_route(&self.client.navigator().current_route());
        let guard_logged_out = match self.client.send(&ApiRequest::post("/auth/logout")).await {
            Ok(_) => false,
            Err(e) => {
                warn!(error = %e, "server-side logout failed");
                // An unrecoverable auth failure has already cleared the
                // session and redirected.
                guarded && e.is_auth_failure() && self.client.vault().credentials().is_none()
            }
        };
        if !guard_logged_out {
            self.client.force_logout();
        }
        info!("signed out");
    }

    /// Profile of the signed-in admin, from the vault or `GET /auth/me`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the profile is not cached and the request fails.
    #[instrument(skip(self))]
    pub async fn current_profile(&self) -> Result<UserProfile, AuthError> {
        let vault = self.client.vault();
        if let Some(profile) = vault.profile() {
            return Ok(profile);
        }
        let profile: UserProfile = self.client.get("/auth/me").await?;
        vault.save_profile(&profile)?;
        Ok(profile)
    }
}
