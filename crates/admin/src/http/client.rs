//! Session-guarded client for the DryKlin REST API.
//!
//! Every call made through [`ApiClient`] goes through the same pipeline:
//!
//! 1. **Credential attachment.** The access token is read and decrypted from
//!    the [`SessionVault`] on every request. A corrupted entry is removed and
//!    the request goes out without credentials; the API's rejection is handled
//!    below like any other.
//! 2. **Session recovery.** A 401/403 on the first attempt triggers exactly one
//!    `POST /auth/tokens/refresh`. If it yields a new access token, the pair is
//!    persisted and the original request is replayed once with it. Anything
//!    else forces a logout.
//!
//! ```text
//! INIT -> SENT -> SUCCESS | OTHER_FAILURE | AUTH_FAILED_FIRST
//! AUTH_FAILED_FIRST -> REPLAYED | LOGGED_OUT
//! REPLAYED -> SUCCESS | FAILURE
//! ```
//!
//! Callers only ever see the eventual response or the original error; the
//! guard adds side effects, not error types. Concurrent failing requests each
//! run their own refresh; the last token written wins.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::ApiError;
use crate::navigation::{Navigator, is_auth_route, routes};
use crate::session::{CredentialPair, SessionVault, VaultError};

/// Token refresh endpoint, relative to the API base URL.
pub const REFRESH_PATH: &str = "auth/tokens/refresh";

/// Replays allowed after an auth failure. The attempt counter stops here.
const MAX_AUTH_REPLAYS: u32 = 1;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// API root, e.g. `https://api.dryklin.com/api/v1/`.
    pub base_url: Url,
    pub timeout: Duration,
}

impl ClientSettings {
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A replayable API request.
///
/// Requests are plain data so the guard can rebuild and resend them after a
/// refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter when `value` is present.
    #[must_use]
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Set a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Encode` if the body cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Why a refresh attempt ended the session.
#[derive(Debug, Error)]
enum RefreshError {
    #[error("no complete credential pair is stored")]
    MissingCredentials,

    #[error("refresh request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("refresh rejected with HTTP {0}")]
    Rejected(StatusCode),

    #[error("refresh response carried no access token")]
    MissingAccessToken,

    #[error("could not persist refreshed credentials: {0}")]
    Persist(#[from] VaultError),

    #[error("invalid refresh URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
    access_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// DryKlin REST API client with session guard.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    vault: SessionVault,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a client over the given vault and navigator.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if the underlying HTTP client cannot be created.
    pub fn new(
        settings: &ClientSettings,
        vault: SessionVault,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("dryklin-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Build)?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: with_trailing_slash(settings.base_url.clone()),
                vault,
                navigator,
            }),
        })
    }

    #[must_use]
    pub fn vault(&self) -> &SessionVault {
        &self.inner.vault
    }

    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.inner.navigator.as_ref()
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Typed helpers
    // =========================================================================

    /// `GET` and decode.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-success status, or a body
    /// that does not decode into `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(&ApiRequest::get(path)).await
    }

    /// `GET` with query parameters and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = query
            .iter()
            .fold(ApiRequest::get(path), |req, (key, value)| req.query(*key, value));
        self.request(&request).await
    }

    /// `POST` a JSON body and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(&ApiRequest::post(path).json(body)?).await
    }

    /// `PUT` a JSON body and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(&ApiRequest::put(path).json(body)?).await
    }

    /// `PATCH` a JSON body and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(&ApiRequest::patch(path).json(body)?).await
    }

    /// `DELETE`, ignoring any response body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or non-success status.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(&ApiRequest::delete(path)).await.map(drop)
    }

    /// Send a request through the guard and decode the (possibly enveloped)
    /// JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn request<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        decode(response).await
    }

    // =========================================================================
    // Session guard
    // =========================================================================

    /// Send a request through the session guard and return the raw
    /// successful response.
    ///
    /// # Errors
    ///
    /// Returns the original `ApiError` if the request fails and the guard
    /// cannot recover it.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: &ApiRequest) -> Result<reqwest::Response, ApiError> {
        let mut token = self.inner.vault.access_token();
        let mut attempt = 0;

        loop {
            let err = match self.dispatch(request, token.as_ref()).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            if !err.is_auth_failure() || attempt >= MAX_AUTH_REPLAYS {
                return Err(err);
            }

            let route = self.inner.navigator.current_route();
            if is_auth_route(&route) {
                debug!(%route, "auth failure on an auth page, passing through");
                return Err(err);
            }

            match self.refresh_session().await {
                Ok(new_token) => {
                    info!("session refreshed, replaying request");
                    token = Some(new_token);
                    attempt += 1;
                }
                Err(reason) => {
                    warn!(%reason, status = ?err.status(), "session recovery failed");
                    self.force_logout();
                    return Err(err);
                }
            }
        }
    }

    /// Clear every stored session value and send the operator to sign-in.
    pub fn force_logout(&self) {
        warn!("forcing logout");
        self.inner.vault.clear_all();
        self.inner.navigator.redirect(routes::SIGN_IN);
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&SecretString>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(&request.path)?;
        let mut builder = self.inner.http.request(request.method.clone(), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        } else {
            debug!("no usable access token, sending unauthenticated");
        }

        let response = builder.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_response(response).await)
        }
    }

    /// One refresh round trip. Persists and returns the new access token.
    async fn refresh_session(&self) -> Result<SecretString, RefreshError> {
        let pair = self
            .inner
            .vault
            .credentials()
            .ok_or(RefreshError::MissingCredentials)?;

        let url = self.endpoint(REFRESH_PATH)?;
        let response = self
            .inner
            .http
            .post(url)
            .json(&RefreshRequest {
                refresh_token: pair.refresh_token.expose_secret(),
                access_token: pair.access_token.expose_secret(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::Rejected(status));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|_| RefreshError::MissingAccessToken)?;
        let tokens: RefreshResponse = serde_json::from_value(unwrap_envelope(body))
            .map_err(|_| RefreshError::MissingAccessToken)?;

        let access_token = tokens
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(RefreshError::MissingAccessToken)?;
        let refresh_token = tokens
            .refresh_token
            .filter(|t| !t.is_empty())
            .map_or(pair.refresh_token, SecretString::from);

        let renewed = CredentialPair {
            access_token: SecretString::from(access_token),
            refresh_token,
        };
        self.inner.vault.save_credentials(&renewed)?;
        Ok(renewed.access_token)
    }

    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.inner.base_url.join(path.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Ensure `Url::join` appends to the base path instead of replacing its last
/// segment.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Keys that may sit next to `data` in a response envelope.
const ENVELOPE_KEYS: [&str; 6] = ["data", "message", "success", "status", "statusCode", "error"];

/// Strip a `{ "data": ..., "message": ... }` envelope, leaving other bodies
/// untouched.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map)
            if map.contains_key("data") && map.keys().all(|k| ENVELOPE_KEYS.contains(&k.as_str())) =>
        {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    let value = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))?
    };
    serde_json::from_value(unwrap_envelope(value)).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::navigation::MemoryNavigator;
    use crate::session::{AesGcmCipher, MemorySessionStore};

    #[test]
    fn test_unwrap_envelope() {
        assert_eq!(
            unwrap_envelope(json!({"success": true, "message": "ok", "data": {"id": "o-1"}})),
            json!({"id": "o-1"})
        );
        assert_eq!(unwrap_envelope(json!({"data": [1, 2]})), json!([1, 2]));
    }

    #[test]
    fn test_unwrap_envelope_leaves_pages_alone() {
        let page = json!({"data": [1], "page": 1, "total": 1});
        assert_eq!(unwrap_envelope(page.clone()), page);
        assert_eq!(unwrap_envelope(json!([1])), json!([1]));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = with_trailing_slash(Url::parse("https://api.dryklin.com/api/v1").unwrap());
        assert_eq!(url.as_str(), "https://api.dryklin.com/api/v1/");
        assert_eq!(
            url.join("orders/pending").unwrap().as_str(),
            "https://api.dryklin.com/api/v1/orders/pending"
        );
    }

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::get("/orders")
            .query("page", 2)
            .query_opt("status", Some("PENDING"))
            .query_opt("search", None::<&str>);
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/orders");
        assert_eq!(
            request.query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("status".to_string(), "PENDING".to_string())
            ]
        );
    }

    #[test]
    fn test_endpoint_strips_leading_slash() {
        let vault = SessionVault::new(
            Arc::new(MemorySessionStore::new()),
            Arc::new(AesGcmCipher::new(&SecretString::from("client-test-key"))),
        );
        let client = ApiClient::new(
            &ClientSettings::new(Url::parse("http://localhost:4000/api").unwrap()),
            vault,
            Arc::new(MemoryNavigator::default()),
        )
        .unwrap();

        assert_eq!(
            client.endpoint("/auth/tokens/refresh").unwrap().as_str(),
            "http://localhost:4000/api/auth/tokens/refresh"
        );
    }
}
