//! Analytics summaries for the dashboard home page.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Price;

/// Headline counters for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSummary {
    pub total_orders: u64,
    pub pending_orders: u64,
    pub completed_orders: u64,
    pub cancelled_orders: u64,
    pub total_revenue: Decimal,
    pub total_customers: u64,
    pub active_partners: u64,
    pub active_agents: u64,
}

impl AnalyticsSummary {
    #[must_use]
    pub const fn revenue(&self) -> Price {
        Price::ngn(self.total_revenue)
    }

    /// Share of orders that completed, in percent. Zero when there are no orders.
    #[must_use]
    pub fn completion_rate(&self) -> Decimal {
        if self.total_orders == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(self.completed_orders) * Decimal::ONE_HUNDRED
            / Decimal::from(self.total_orders))
        .round_dp(1)
    }
}

/// One point of a revenue time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    /// Period label as sent by the backend (`2024-05`, `Mon`, ...).
    pub label: String,
    #[serde(default)]
    pub revenue: Decimal,
    #[serde(default)]
    pub orders: u64,
}

/// Bucket size for the revenue series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RevenuePeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl RevenuePeriod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for RevenuePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("invalid revenue period: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_rate() {
        let summary = AnalyticsSummary {
            total_orders: 3,
            completed_orders: 2,
            ..AnalyticsSummary::default()
        };
        assert_eq!(summary.completion_rate(), Decimal::new(667, 1));
        assert_eq!(AnalyticsSummary::default().completion_rate(), Decimal::ZERO);
    }

    #[test]
    fn test_summary_tolerates_missing_fields() {
        let summary: AnalyticsSummary =
            serde_json::from_str(r#"{"totalOrders": 10, "totalRevenue": 25000}"#).unwrap();
        assert_eq!(summary.total_orders, 10);
        assert_eq!(summary.pending_orders, 0);
        assert_eq!(summary.revenue().to_string(), "₦25,000.00");
    }
}
