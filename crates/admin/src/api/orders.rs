//! Order management endpoints, including the retried confirmation call.

use dryklin_core::{IdError, Order, OrderId, OrderStatus, Page};
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::{Paging, StatusBody, parse_id};
use crate::board::OrderBoard;
use crate::http::{ApiClient, ApiError, ApiRequest, ErrorCategory, RetryPolicy, with_retries};

/// Terminal failure of [`OrdersApi::confirm_order`].
#[derive(Debug, Error)]
pub enum ConfirmOrderError {
    /// Rejected before any request was made.
    #[error("Request error: {0}")]
    EmptyOrderId(#[from] IdError),

    /// Every attempt failed.
    #[error("{category}: failed to confirm order {order_id} after {attempts} attempt(s): {source}")]
    Failed {
        category: ErrorCategory,
        order_id: OrderId,
        attempts: u32,
        #[source]
        source: ApiError,
    },
}

impl ConfirmOrderError {
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyOrderId(_) => ErrorCategory::Other,
            Self::Failed { category, .. } => *category,
        }
    }

    /// Short message suitable for showing to an operator.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Network error: unable to reach the server. Check your connection and try again."
            }
            ErrorCategory::Server => "Server error: please try again later.",
            ErrorCategory::Other => "Request error: the order could not be confirmed.",
        }
    }
}

/// Filters for `GET /orders`.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub paging: Paging,
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
}

impl OrderQuery {
    #[must_use]
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query("page", self.paging.page)
            .query("limit", self.paging.limit)
            .query_opt("status", self.status.map(OrderStatus::as_str))
            .query_opt(
                "search",
                self.search.as_deref().filter(|s| !s.trim().is_empty()),
            )
    }
}

/// Order endpoints.
#[derive(Debug, Clone)]
pub struct OrdersApi {
    client: ApiClient,
    confirm_policy: RetryPolicy,
}

impl OrdersApi {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            confirm_policy: RetryPolicy::default(),
        }
    }

    /// Override the retry count and delay used by [`Self::confirm_order`] when
    /// the caller does not pass a retry count.
    #[must_use]
    pub const fn with_confirm_policy(mut self, policy: RetryPolicy) -> Self {
        self.confirm_policy = policy;
        self
    }

    #[must_use]
    pub const fn confirm_policy(&self) -> RetryPolicy {
        self.confirm_policy
    }

    /// All orders, filtered and paged.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &OrderQuery) -> Result<Page<Order>, ApiError> {
        self.client
            .request(&query.apply(ApiRequest::get("/orders")))
            .await
    }

    /// Orders awaiting confirmation.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn pending(&self) -> Result<Vec<Order>, ApiError> {
        let page: Page<Order> = self.client.get("/orders/pending").await?;
        Ok(page.items)
    }

    /// Orders that have left the pending state, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn history(&self, paging: Paging) -> Result<Page<Order>, ApiError> {
        self.client
            .get_query("/orders/history", &paging.params())
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for a blank ID, or the request error.
    #[instrument(skip(self))]
    pub async fn get(&self, order_id: &str) -> Result<Order, ApiError> {
        let id = parse_id(order_id, OrderId::parse)?;
        self.client.get(&format!("/orders/{id}")).await
    }

    /// Confirm a pending order, retrying network and server failures.
    ///
    /// `retries` defaults to the configured policy (one retry). The delay
    /// between attempts comes from the policy too. Any other failure,
    /// including an auth failure the session guard could not recover, ends
    /// the call after that attempt. An order that comes back
    /// still `PENDING` is returned as-is with a warning.
    ///
    /// # Errors
    ///
    /// Returns `ConfirmOrderError::EmptyOrderId` without touching the network
    /// for a blank ID, otherwise `ConfirmOrderError::Failed` with the
    /// classified error that ended the attempts.
    #[instrument(skip(self))]
    pub async fn confirm_order(
        &self,
        order_id: &str,
        retries: Option<u32>,
    ) -> Result<Order, ConfirmOrderError> {
        let id = OrderId::parse(order_id)?;
        let policy = retries.map_or(self.confirm_policy, |r| self.confirm_policy.with_retries(r));
        let request = ApiRequest::patch(format!("/orders/{id}/confirm"));

        let mut attempts = 0;
        let result = with_retries(policy, |_| {
            attempts += 1;
            self.client.request::<Order>(&request)
        })
        .await;

        match result {
            Ok(order) => {
                if order.order_status.is_pending() {
                    warn!(order_id = %id, "order still pending after confirmation");
                } else {
                    info!(order_id = %id, status = %order.order_status, attempts, "order confirmed");
                }
                Ok(order)
            }
            Err(source) => {
                let category = ErrorCategory::classify(&source);
                warn!(order_id = %id, %category, attempts, error = %source, "order confirmation failed");
                Err(ConfirmOrderError::Failed {
                    category,
                    order_id: id,
                    attempts,
                    source,
                })
            }
        }
    }

    /// Confirm an order and reflect the result in `board`.
    ///
    /// # Errors
    ///
    /// See [`Self::confirm_order`]. The board is left untouched on failure.
    pub async fn confirm_into_board(
        &self,
        board: &mut OrderBoard,
        order_id: &str,
        retries: Option<u32>,
    ) -> Result<Order, ConfirmOrderError> {
        let order = self.confirm_order(order_id, retries).await?;
        board.apply_confirmation(&order);
        Ok(order)
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<Order, ApiError> {
        let id = parse_id(order_id, OrderId::parse)?;
        let order: Order = self
            .client
            .patch(&format!("/orders/{id}/status"), &StatusBody { status })
            .await?;
        info!(order_id = %id, status = %order.order_status, "order status updated");
        Ok(order)
    }

    /// Cancel an order with an optional reason.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn cancel(&self, order_id: &str, reason: Option<&str>) -> Result<Order, ApiError> {
        let id = parse_id(order_id, OrderId::parse)?;
        let body = serde_json::json!({ "reason": reason });
        let order: Order = self.client.patch(&format!("/orders/{id}/cancel"), &body).await?;
        info!(order_id = %id, "order cancelled");
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_confirm_error_messages_carry_category() {
        let err = ConfirmOrderError::Failed {
            category: ErrorCategory::Server,
            order_id: OrderId::parse("o-1").unwrap(),
            attempts: 2,
            source: ApiError::Status {
                status: StatusCode::BAD_GATEWAY,
                message: "Bad Gateway".to_string(),
            },
        };
        let message = err.to_string();
        assert!(message.starts_with("Server error"));
        assert!(message.contains("after 2 attempt(s)"));
        assert!(err.user_message().starts_with("Server error"));
    }

    #[test]
    fn test_empty_order_id_is_request_error() {
        let err = ConfirmOrderError::from(IdError::Empty("OrderId"));
        assert_eq!(err.category(), ErrorCategory::Other);
        assert!(err.to_string().starts_with("Request error"));
    }

    #[test]
    fn test_order_query_params() {
        let query = OrderQuery {
            search: Some("  ".to_string()),
            ..OrderQuery::default()
        }
        .with_status(OrderStatus::InProgress);
        let request = format!("{:?}", query.apply(ApiRequest::get("/orders")));
        assert!(request.contains("IN_PROGRESS"));
        assert!(request.contains("\"limit\", \"20\""));
        assert!(!request.contains("search"));
    }
}
