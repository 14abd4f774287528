//! Customer lookup.

use dryklin_core::{Customer, CustomerId, Order, Page};
use tracing::instrument;

use super::{Paging, parse_id};
use crate::http::{ApiClient, ApiError, ApiRequest};

/// Customer endpoints.
#[derive(Debug, Clone)]
pub struct CustomersApi {
    client: ApiClient,
}

impl CustomersApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, paging: Paging, search: Option<&str>) -> Result<Page<Customer>, ApiError> {
        let request = ApiRequest::get("/customers")
            .query("page", paging.page)
            .query("limit", paging.limit)
            .query_opt("search", search.filter(|s| !s.trim().is_empty()));
        self.client.request(&request).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn get(&self, customer_id: &str) -> Result<Customer, ApiError> {
        let id = parse_id(customer_id, CustomerId::parse)?;
        self.client.get(&format!("/customers/{id}")).await
    }

    /// Order history of one customer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn orders(&self, customer_id: &str, paging: Paging) -> Result<Page<Order>, ApiError> {
        let id = parse_id(customer_id, CustomerId::parse)?;
        self.client
            .get_query(&format!("/customers/{id}/orders"), &paging.params())
            .await
    }
}
