//! Account records: platform users, customers, service partners, delivery
//! agents and sub-admins.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    AccountStatus, AdminRole, AgentAvailability, CustomerId, DeliveryAgentId, Email,
    ServicePartnerId, SubAdminId, UserId,
};

/// A platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<AdminRole>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

const fn default_true() -> bool {
    true
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A customer: a user with wallet and order statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(alias = "_id")]
    pub id: CustomerId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub wallet_balance: Decimal,
    #[serde(default)]
    pub order_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A laundry business fulfilling orders on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePartner {
    #[serde(alias = "_id")]
    pub id: ServicePartnerId,
    pub business_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: AccountStatus,
}

/// A rider who picks up and delivers laundry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAgent {
    #[serde(alias = "_id")]
    pub id: DeliveryAgentId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub availability: AgentAvailability,
    #[serde(default)]
    pub status: AccountStatus,
}

/// A delegated dashboard account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAdmin {
    #[serde(alias = "_id")]
    pub id: SubAdminId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Payload for provisioning a sub-admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubAdmin {
    pub name: String,
    pub email: Email,
    pub permissions: Vec<String>,
}

/// Profile of the signed-in admin, cached in the session vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Option<AdminRole>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_defaults() {
        let json = r#"{"_id": "u-1", "email": "a@b.co", "firstName": "Ngozi"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is_active);
        assert!(!user.is_verified);
        assert_eq!(user.full_name(), "Ngozi");
    }

    #[test]
    fn test_agent_status_fields() {
        let json = r#"{
            "id": "a-1",
            "firstName": "Tunde",
            "availability": "BUSY",
            "status": "SUSPENDED"
        }"#;
        let agent: DeliveryAgent = serde_json::from_str(json).unwrap();
        assert_eq!(agent.availability, AgentAvailability::Busy);
        assert_eq!(agent.status, AccountStatus::Suspended);
    }

    #[test]
    fn test_new_sub_admin_serializes_camel_case() {
        let payload = NewSubAdmin {
            name: "Ops".to_string(),
            email: Email::parse("ops@dryklin.com").unwrap(),
            permissions: vec!["orders:read".to_string()],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["email"], "ops@dryklin.com");
        assert_eq!(value["permissions"][0], "orders:read");
    }
}
