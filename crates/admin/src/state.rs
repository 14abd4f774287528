//! Application state shared across commands.

use std::sync::Arc;

use crate::api::{
    AgentsApi, AnalyticsApi, AuthApi, CustomersApi, NotificationsApi, OrdersApi, PartnersApi,
    ServiceTypesApi, SubAdminsApi, UsersApi,
};
use crate::config::AdminConfig;
use crate::http::{ApiClient, ApiError};
use crate::navigation::Navigator;
use crate::session::{AesGcmCipher, FileSessionStore, SessionStore, SessionVault};

/// The client and every API handle, built once from configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    client: ApiClient,
    orders: OrdersApi,
}

impl AppState {
    /// Build state over a file-backed session store at `config.session_file`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if the HTTP client cannot be created.
    pub fn new(config: AdminConfig, navigator: Arc<dyn Navigator>) -> Result<Self, ApiError> {
        let store = Arc::new(FileSessionStore::new(&config.session_file));
        Self::with_store(config, store, navigator)
    }

    /// Build state over an arbitrary session store.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if the HTTP client cannot be created.
    pub fn with_store(
        config: AdminConfig,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let cipher = Arc::new(AesGcmCipher::new(&config.storage_secret));
        let vault = SessionVault::new(store, cipher);
        let client = ApiClient::new(&config.client_settings(), vault, navigator)?;
        let orders = OrdersApi::new(client.clone()).with_confirm_policy(config.confirm_retry);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                orders,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    #[must_use]
    pub fn vault(&self) -> &SessionVault {
        self.inner.client.vault()
    }

    #[must_use]
    pub fn orders(&self) -> &OrdersApi {
        &self.inner.orders
    }

    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.client().clone())
    }

    #[must_use]
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.client().clone())
    }

    #[must_use]
    pub fn customers(&self) -> CustomersApi {
        CustomersApi::new(self.client().clone())
    }

    #[must_use]
    pub fn partners(&self) -> PartnersApi {
        PartnersApi::new(self.client().clone())
    }

    #[must_use]
    pub fn agents(&self) -> AgentsApi {
        AgentsApi::new(self.client().clone())
    }

    #[must_use]
    pub fn service_types(&self) -> ServiceTypesApi {
        ServiceTypesApi::new(self.client().clone())
    }

    #[must_use]
    pub fn sub_admins(&self) -> SubAdminsApi {
        SubAdminsApi::new(self.client().clone())
    }

    #[must_use]
    pub fn analytics(&self) -> AnalyticsApi {
        AnalyticsApi::new(self.client().clone())
    }

    #[must_use]
    pub fn notifications(&self) -> NotificationsApi {
        NotificationsApi::new(self.client().clone())
    }
}
