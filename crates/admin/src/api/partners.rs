//! Service partner administration and order assignment.

use dryklin_core::{AccountStatus, Order, OrderId, Page, ServicePartner, ServicePartnerId};
use serde::Serialize;
use tracing::{info, instrument};

use super::{Paging, StatusBody, parse_id};
use crate::http::{ApiClient, ApiError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignPartnerBody<'a> {
    partner_id: &'a ServicePartnerId,
}

/// Service partner endpoints.
#[derive(Debug, Clone)]
pub struct PartnersApi {
    client: ApiClient,
}

impl PartnersApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, paging: Paging) -> Result<Page<ServicePartner>, ApiError> {
        self.client
            .get_query("/service-partners", &paging.params())
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn get(&self, partner_id: &str) -> Result<ServicePartner, ApiError> {
        let id = parse_id(partner_id, ServicePartnerId::parse)?;
        self.client.get(&format!("/service-partners/{id}")).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        partner_id: &str,
        status: AccountStatus,
    ) -> Result<ServicePartner, ApiError> {
        let id = parse_id(partner_id, ServicePartnerId::parse)?;
        let partner: ServicePartner = self
            .client
            .patch(&format!("/service-partners/{id}/status"), &StatusBody { status })
            .await?;
        info!(partner_id = %id, %status, "partner status updated");
        Ok(partner)
    }

    /// Hand an order to a service partner.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if either ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn assign_order(&self, order_id: &str, partner_id: &str) -> Result<Order, ApiError> {
        let order_id = parse_id(order_id, OrderId::parse)?;
        let partner_id = parse_id(partner_id, ServicePartnerId::parse)?;
        let order: Order = self
            .client
            .patch(
                &format!("/orders/{order_id}/assign-partner"),
                &AssignPartnerBody {
                    partner_id: &partner_id,
                },
            )
            .await?;
        info!(%order_id, %partner_id, "order assigned to partner");
        Ok(order)
    }
}
