//! Integration tests for the DryKlin admin client.
//!
//! Every test runs the real [`ApiClient`] against a `wiremock` server standing
//! in for the DryKlin API, with an in-memory session store and navigator so
//! the session side effects can be inspected.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dryklin-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use dryklin_admin::api::OrdersApi;
use dryklin_admin::http::{ApiClient, ClientSettings, RetryPolicy};
use dryklin_admin::navigation::{MemoryNavigator, Navigator, routes};
use dryklin_admin::session::{
    ACCESS_TOKEN_KEY, AesGcmCipher, CipherError, CredentialPair, MemorySessionStore,
    REFRESH_TOKEN_KEY, SessionStore, SessionVault, TokenCipher,
};
use secrecy::SecretString;
use url::Url;
use wiremock::MockServer;

/// Path prefix the mock API is mounted under.
pub const API_PREFIX: &str = "/api/v1";

/// Cipher that stores `abc` as `ENC(abc)`, so tests can seed storage by hand.
#[derive(Debug, Default)]
pub struct MarkerCipher;

impl TokenCipher for MarkerCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        Ok(format!("ENC({plaintext})"))
    }

    fn decrypt(&self, stored: &str) -> Result<String, CipherError> {
        stored
            .strip_prefix("ENC(")
            .and_then(|rest| rest.strip_suffix(')'))
            .map(str::to_owned)
            .ok_or(CipherError::Malformed)
    }
}

/// A client wired to a mock server plus handles on its session state.
pub struct TestContext {
    pub server: MockServer,
    pub store: Arc<MemorySessionStore>,
    pub navigator: Arc<MemoryNavigator>,
    pub client: ApiClient,
}

impl TestContext {
    /// Context using [`MarkerCipher`], starting on the dashboard.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    pub async fn new() -> Self {
        Self::with_cipher(Arc::new(MarkerCipher)).await
    }

    /// Context using the production AES-GCM cipher.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    pub async fn with_aes() -> Self {
        let secret = SecretString::from("kX9#mP2$vL7!qR4@tN8%wZ3^bF6&hJ1*");
        Self::with_cipher(Arc::new(AesGcmCipher::new(&secret))).await
    }

    /// # Panics
    ///
    /// Panics if the client cannot be built.
    pub async fn with_cipher(cipher: Arc<dyn TokenCipher>) -> Self {
        let server = MockServer::start().await;
        let base_url = format!("{}{API_PREFIX}", server.uri());
        Self::build(server, &base_url, cipher)
    }

    /// Context whose client points at a port nothing listens on.
    ///
    /// # Panics
    ///
    /// Panics if no free port can be found or the client cannot be built.
    pub async fn unreachable() -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);

        let server = MockServer::start().await;
        Self::build(server, &format!("http://127.0.0.1:{port}{API_PREFIX}"), Arc::new(MarkerCipher))
    }

    fn build(server: MockServer, base_url: &str, cipher: Arc<dyn TokenCipher>) -> Self {
        let store = Arc::new(MemorySessionStore::new());
        let navigator = Arc::new(MemoryNavigator::default());
        let vault = SessionVault::new(store.clone(), cipher);
        let settings = ClientSettings::new(Url::parse(base_url).expect("valid base URL"))
            .with_timeout(Duration::from_secs(5));
        let client = ApiClient::new(&settings, vault, navigator.clone()).expect("build client");
        Self {
            server,
            store,
            navigator,
            client,
        }
    }

    /// Full mock path for an API route, e.g. `api("/orders")`.
    #[must_use]
    pub fn api(route: &str) -> String {
        format!("{API_PREFIX}{route}")
    }

    #[must_use]
    pub fn vault(&self) -> &SessionVault {
        self.client.vault()
    }

    /// Store a credential pair through the vault.
    ///
    /// # Panics
    ///
    /// Panics if the vault write fails.
    pub fn sign_in(&self, access: &str, refresh: &str) {
        self.vault()
            .save_credentials(&CredentialPair::new(access, refresh))
            .expect("store credentials");
    }

    /// Write a raw, already-"encrypted" value straight into the store.
    ///
    /// # Panics
    ///
    /// Panics if the store write fails.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.store.set(key, value).expect("store write");
    }

    /// Raw stored access token.
    #[must_use]
    pub fn raw_access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY).ok().flatten()
    }

    /// Raw stored refresh token.
    #[must_use]
    pub fn raw_refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY).ok().flatten()
    }

    /// Move the navigator without recording a redirect.
    pub fn visit(&self, route: &str) {
        self.navigator.navigate(route);
    }

    /// How many times the operator was sent to sign-in.
    #[must_use]
    pub fn sign_in_redirects(&self) -> usize {
        self.navigator
            .redirects()
            .iter()
            .filter(|r| r.as_str() == routes::SIGN_IN)
            .count()
    }

    #[must_use]
    pub fn current_route(&self) -> String {
        self.navigator.current_route()
    }

    /// Orders API with no delay between confirmation attempts.
    #[must_use]
    pub fn orders(&self) -> OrdersApi {
        OrdersApi::new(self.client.clone()).with_confirm_policy(RetryPolicy::new(
            RetryPolicy::DEFAULT_RETRIES,
            Duration::ZERO,
        ))
    }

    /// `Authorization` headers of every request the mock received for `route`.
    ///
    /// # Panics
    ///
    /// Panics if request recording is disabled.
    pub async fn auth_headers(&self, route: &str) -> Vec<Option<String>> {
        let full = Self::api(route);
        self.server
            .received_requests()
            .await
            .expect("request recording enabled")
            .iter()
            .filter(|r| r.url.path() == full)
            .map(|r| {
                r.headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned)
            })
            .collect()
    }
}

/// JSON for an order in the given status.
#[must_use]
pub fn order_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "orderNumber": format!("DK-{id}"),
        "customer": { "_id": "c-1", "firstName": "Amaka", "lastName": "Obi" },
        "serviceType": "Wash & Fold",
        "items": [{ "name": "Shirt", "quantity": 3, "unitPrice": 500 }],
        "totalAmount": 1500,
        "orderStatus": status,
        "createdAt": "2026-03-01T09:30:00Z"
    })
}
