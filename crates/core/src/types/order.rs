//! Laundry order records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CustomerId, DeliveryAgentId, OrderId, OrderStatus, Price, ServicePartnerId};

/// A laundry order as returned by the orders endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: OrderId,
    /// Human-facing order number (e.g. `DK-10293`).
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub customer: Option<OrderCustomer>,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total_amount: Decimal,
    pub order_status: OrderStatus,
    #[serde(default)]
    pub pickup_address: Option<Address>,
    #[serde(default)]
    pub delivery_address: Option<Address>,
    #[serde(default)]
    pub agent_id: Option<DeliveryAgentId>,
    #[serde(default)]
    pub partner_id: Option<ServicePartnerId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Order total formatted for display.
    #[must_use]
    pub const fn total(&self) -> Price {
        Price::ngn(self.total_amount)
    }

    /// Label shown in tables: the order number when present, else the ID.
    #[must_use]
    pub fn label(&self) -> &str {
        self.order_number.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}

/// Customer summary embedded in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    #[serde(alias = "_id")]
    pub id: CustomerId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl OrderCustomer {
    /// Full name, or an empty string when the backend sent none.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => String::new(),
        }
    }
}

/// A single garment line in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Decimal,
}

const fn default_quantity() -> u32 {
    1
}

impl OrderItem {
    /// Quantity times unit price.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Pickup or delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_order() {
        let json = r#"{"_id": "o-1", "orderStatus": "PENDING"}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id.as_str(), "o-1");
        assert_eq!(order.order_status, OrderStatus::Pending);
        assert!(order.items.is_empty());
        assert_eq!(order.label(), "o-1");
    }

    #[test]
    fn test_deserialize_full_order() {
        let json = r#"{
            "id": "o-2",
            "orderNumber": "DK-10293",
            "customer": {"id": "c-9", "firstName": "Ada", "lastName": "Obi"},
            "serviceType": "Wash & Fold",
            "items": [
                {"name": "Shirt", "quantity": 3, "unitPrice": 500},
                {"name": "Duvet", "unitPrice": 2500.5}
            ],
            "totalAmount": 4000.5,
            "orderStatus": "IN_PROGRESS",
            "pickupAddress": {"street": "12 Allen Ave", "city": "Ikeja"},
            "createdAt": "2024-05-01T10:00:00Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.label(), "DK-10293");
        assert_eq!(order.customer.as_ref().unwrap().full_name(), "Ada Obi");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[1].quantity, 1);
        assert_eq!(order.items[0].subtotal(), Decimal::new(1500, 0));
        assert_eq!(order.total().to_string(), "₦4,000.50");
        assert!(order.created_at.is_some());
    }
}
