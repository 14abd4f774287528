//! Typed wrappers over the DryKlin REST endpoints.
//!
//! Each API is a cheap handle around a shared [`ApiClient`]; every call goes
//! through the session guard.

pub mod agents;
pub mod analytics;
pub mod auth;
pub mod customers;
pub mod notifications;
pub mod orders;
pub mod partners;
pub mod service_types;
pub mod sub_admins;
pub mod users;

pub use agents::AgentsApi;
pub use analytics::AnalyticsApi;
pub use auth::{AuthApi, AuthError, LoginResponse};
pub use customers::CustomersApi;
pub use notifications::NotificationsApi;
pub use orders::{ConfirmOrderError, OrderQuery, OrdersApi};
pub use partners::PartnersApi;
pub use service_types::ServiceTypesApi;
pub use sub_admins::SubAdminsApi;
pub use users::UsersApi;

use dryklin_core::IdError;
use serde::Serialize;

use crate::http::ApiError;

/// Parse a path identifier, rejecting blanks before any request is made.
pub(crate) fn parse_id<'a, T, F>(raw: &'a str, parse: F) -> Result<T, ApiError>
where
    F: FnOnce(&'a str) -> Result<T, IdError>,
{
    parse(raw).map_err(|e| ApiError::InvalidInput(e.to_string()))
}

/// Reject a blank required string.
pub(crate) fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Common paging parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub limit: u32,
}

impl Paging {
    pub const DEFAULT_LIMIT: u32 = 20;

    #[must_use]
    pub const fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    pub(crate) fn params(self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_LIMIT)
    }
}

/// `{ "status": ... }` body shared by the status endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct StatusBody<S: Serialize> {
    pub status: S,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dryklin_core::OrderId;

    use super::*;

    #[test]
    fn test_parse_id_rejects_blank() {
        let err = parse_id("  ", OrderId::parse).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(parse_id("o-1", OrderId::parse).is_ok());
    }

    #[test]
    fn test_parse_id_from_borrowed_input() {
        let raw = format!("o-{}", 42);
        let id = parse_id(raw.as_str(), OrderId::parse).unwrap();
        assert_eq!(id.as_str(), "o-42");
    }

    #[test]
    fn test_require() {
        assert!(require("email", "").is_err());
        assert!(require("email", "a@b.co").is_ok());
    }

    #[test]
    fn test_paging_params() {
        assert_eq!(
            Paging::default().params(),
            vec![("page", "1".to_string()), ("limit", "20".to_string())]
        );
    }
}
