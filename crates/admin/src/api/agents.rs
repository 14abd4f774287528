//! Delivery agent administration and order assignment.

use dryklin_core::{
    AccountStatus, AgentAvailability, DeliveryAgent, DeliveryAgentId, Order, OrderId, Page,
};
use serde::Serialize;
use tracing::{info, instrument};

use super::{Paging, StatusBody, parse_id};
use crate::http::{ApiClient, ApiError, ApiRequest};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignAgentBody<'a> {
    agent_id: &'a DeliveryAgentId,
}

/// Delivery agent endpoints.
#[derive(Debug, Clone)]
pub struct AgentsApi {
    client: ApiClient,
}

impl AgentsApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Agents, optionally only those with the given availability.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        paging: Paging,
        availability: Option<AgentAvailability>,
    ) -> Result<Page<DeliveryAgent>, ApiError> {
        let request = ApiRequest::get("/agents")
            .query("page", paging.page)
            .query("limit", paging.limit)
            .query_opt("availability", availability.map(AgentAvailability::as_str));
        self.client.request(&request).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn get(&self, agent_id: &str) -> Result<DeliveryAgent, ApiError> {
        let id = parse_id(agent_id, DeliveryAgentId::parse)?;
        self.client.get(&format!("/agents/{id}")).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        agent_id: &str,
        status: AccountStatus,
    ) -> Result<DeliveryAgent, ApiError> {
        let id = parse_id(agent_id, DeliveryAgentId::parse)?;
        let agent: DeliveryAgent = self
            .client
            .patch(&format!("/agents/{id}/status"), &StatusBody { status })
            .await?;
        info!(agent_id = %id, %status, "agent status updated");
        Ok(agent)
    }

    /// Hand an order to a delivery agent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if either ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn assign_order(&self, order_id: &str, agent_id: &str) -> Result<Order, ApiError> {
        let order_id = parse_id(order_id, OrderId::parse)?;
        let agent_id = parse_id(agent_id, DeliveryAgentId::parse)?;
        let order: Order = self
            .client
            .patch(
                &format!("/orders/{order_id}/assign-agent"),
                &AssignAgentBody { agent_id: &agent_id },
            )
            .await?;
        info!(%order_id, %agent_id, "order assigned to agent");
        Ok(order)
    }
}
