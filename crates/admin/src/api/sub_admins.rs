//! Sub-admin provisioning.

use dryklin_core::{NewSubAdmin, Page, SubAdmin, SubAdminId};
use serde::Serialize;
use tracing::{info, instrument};

use super::{parse_id, require};
use crate::http::{ApiClient, ApiError};

#[derive(Serialize)]
struct PermissionsBody<'a> {
    permissions: &'a [String],
}

/// Sub-admin endpoints.
#[derive(Debug, Clone)]
pub struct SubAdminsApi {
    client: ApiClient,
}

impl SubAdminsApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<SubAdmin>, ApiError> {
        let page: Page<SubAdmin> = self.client.get("/sub-admins").await?;
        Ok(page.items)
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for a blank name, or the request error.
    #[instrument(skip(self))]
    pub async fn create(&self, sub_admin: &NewSubAdmin) -> Result<SubAdmin, ApiError> {
        require("name", &sub_admin.name)?;
        let created: SubAdmin = self.client.post("/sub-admins", sub_admin).await?;
        info!(sub_admin_id = %created.id, email = %created.email, "sub-admin created");
        Ok(created)
    }

    /// Replace a sub-admin's permission list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn update_permissions(
        &self,
        sub_admin_id: &str,
        permissions: &[String],
    ) -> Result<SubAdmin, ApiError> {
        let id = parse_id(sub_admin_id, SubAdminId::parse)?;
        let updated: SubAdmin = self
            .client
            .patch(
                &format!("/sub-admins/{id}/permissions"),
                &PermissionsBody { permissions },
            )
            .await?;
        info!(sub_admin_id = %id, count = permissions.len(), "sub-admin permissions updated");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn deactivate(&self, sub_admin_id: &str) -> Result<SubAdmin, ApiError> {
        let id = parse_id(sub_admin_id, SubAdminId::parse)?;
        let updated: SubAdmin = self
            .client
            .patch(&format!("/sub-admins/{id}/deactivate"), &serde_json::json!({}))
            .await?;
        info!(sub_admin_id = %id, "sub-admin deactivated");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, sub_admin_id: &str) -> Result<(), ApiError> {
        let id = parse_id(sub_admin_id, SubAdminId::parse)?;
        self.client.delete(&format!("/sub-admins/{id}")).await?;
        info!(sub_admin_id = %id, "sub-admin deleted");
        Ok(())
    }
}
