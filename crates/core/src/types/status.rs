//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a laundry order.
///
/// Confirmation moves an order out of `Pending`; `Completed`, `Cancelled`
/// and `Successful` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Processing,
    Completed,
    Cancelled,
    Successful,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::InProgress,
        Self::Processing,
        Self::Completed,
        Self::Cancelled,
        Self::Successful,
    ];

    /// Whether the order is still awaiting confirmation.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether the order has reached a final state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Successful)
    }

    /// Wire representation, as used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Successful => "SUCCESSFUL",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// Account status shared by service partners and delivery agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Inactive => write!(f, "INACTIVE"),
            Self::Suspended => write!(f, "SUSPENDED"),
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "suspended" => Ok(Self::Suspended),
            _ => Err(format!("invalid account status: {s}")),
        }
    }
}

/// Whether a delivery agent can take a pickup right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentAvailability {
    Available,
    Busy,
    #[default]
    Offline,
}

impl AgentAvailability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Busy => "BUSY",
            Self::Offline => "OFFLINE",
        }
    }
}

impl std::str::FromStr for AgentAvailability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "busy" => Ok(Self::Busy),
            "offline" => Ok(Self::Offline),
            _ => Err(format!("invalid availability: {s}")),
        }
    }
}

/// Role of a dashboard account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminRole {
    /// Full access including sub-admin provisioning.
    SuperAdmin,
    /// Operator access without sub-admin provisioning.
    Admin,
    /// Delegated access limited by permissions.
    SubAdmin,
    /// End customer account.
    Customer,
    /// Delivery agent account.
    Agent,
    /// Service partner account.
    Partner,
    /// Any role this client does not know about yet.
    #[serde(other)]
    Other,
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "SUPER_ADMIN"),
            Self::Admin => write!(f, "ADMIN"),
            Self::SubAdmin => write!(f, "SUB_ADMIN"),
            Self::Customer => write!(f, "CUSTOMER"),
            Self::Agent => write!(f, "AGENT"),
            Self::Partner => write!(f, "PARTNER"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let status: OrderStatus = serde_json::from_str("\"SUCCESSFUL\"").unwrap();
        assert_eq!(status, OrderStatus::Successful);
    }

    #[test]
    fn test_order_status_from_str_is_lenient() {
        assert_eq!("in-progress".parse::<OrderStatus>(), Ok(OrderStatus::InProgress));
        assert_eq!("pending".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_status_predicates() {
        assert!(OrderStatus::Pending.is_pending());
        assert!(!OrderStatus::Processing.is_pending());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_availability_matches_wire_format() {
        for availability in [
            AgentAvailability::Available,
            AgentAvailability::Busy,
            AgentAvailability::Offline,
        ] {
            assert_eq!(
                serde_json::to_string(&availability).unwrap(),
                format!("\"{}\"", availability.as_str())
            );
        }
        assert_eq!("busy".parse::<AgentAvailability>(), Ok(AgentAvailability::Busy));
    }

    #[test]
    fn test_unknown_role_is_tolerated() {
        let role: AdminRole = serde_json::from_str("\"FINANCE\"").unwrap();
        assert_eq!(role, AdminRole::Other);
    }

    #[test]
    fn test_account_status_round_trip() {
        for status in [
            AccountStatus::Active,
            AccountStatus::Inactive,
            AccountStatus::Suspended,
        ] {
            assert_eq!(status.to_string().parse::<AccountStatus>(), Ok(status));
        }
    }
}
