//! Platform user administration.

use dryklin_core::{Page, User, UserId};
use serde::Serialize;
use tracing::{info, instrument};

use super::{Paging, parse_id};
use crate::http::{ApiClient, ApiError, ApiRequest};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActiveBody {
    is_active: bool,
}

/// User endpoints.
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, paging: Paging, search: Option<&str>) -> Result<Page<User>, ApiError> {
        let request = ApiRequest::get("/users")
            .query("page", paging.page)
            .query("limit", paging.limit)
            .query_opt("search", search.filter(|s| !s.trim().is_empty()));
        self.client.request(&request).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: &str) -> Result<User, ApiError> {
        let id = parse_id(user_id, UserId::parse)?;
        self.client.get(&format!("/users/{id}")).await
    }

    /// Activate or deactivate a user account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn set_active(&self, user_id: &str, active: bool) -> Result<User, ApiError> {
        let id = parse_id(user_id, UserId::parse)?;
        let user: User = self
            .client
            .patch(&format!("/users/{id}/status"), &ActiveBody { is_active: active })
            .await?;
        info!(user_id = %id, active, "user status updated");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: &str) -> Result<(), ApiError> {
        let id = parse_id(user_id, UserId::parse)?;
        self.client.delete(&format!("/users/{id}")).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
