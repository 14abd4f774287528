//! Admin notifications.

use dryklin_core::{Notification, NotificationId, Page};
use tracing::instrument;

use super::{Paging, parse_id};
use crate::http::{ApiClient, ApiError, ApiRequest};

/// Notification endpoints.
#[derive(Debug, Clone)]
pub struct NotificationsApi {
    client: ApiClient,
}

impl NotificationsApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, paging: Paging, unread_only: bool) -> Result<Page<Notification>, ApiError> {
        let request = ApiRequest::get("/notifications")
            .query("page", paging.page)
            .query("limit", paging.limit)
            .query_opt("unread", unread_only.then_some(true));
        self.client.request(&request).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, notification_id: &str) -> Result<(), ApiError> {
        let id = parse_id(notification_id, NotificationId::parse)?;
        self.client
            .send(&ApiRequest::patch(format!("/notifications/{id}/read")))
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.client
            .send(&ApiRequest::patch("/notifications/read-all"))
            .await?;
        Ok(())
    }
}
