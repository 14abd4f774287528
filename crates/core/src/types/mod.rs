//! Core types for DryKlin.
//!
//! This module provides type-safe wrappers for common domain concepts and
//! the records exchanged with the REST API.

pub mod account;
pub mod analytics;
pub mod catalog;
pub mod email;
pub mod id;
pub mod notification;
pub mod order;
pub mod page;
pub mod price;
pub mod status;

pub use account::{
    Customer, DeliveryAgent, NewSubAdmin, ServicePartner, SubAdmin, User, UserProfile,
};
pub use analytics::{AnalyticsSummary, RevenuePeriod, RevenuePoint};
pub use catalog::{NewServiceType, ServiceType, ServiceTypeUpdate};
pub use email::{Email, EmailError};
pub use id::*;
pub use notification::Notification;
pub use order::{Address, Order, OrderCustomer, OrderItem};
pub use page::Page;
pub use price::{CurrencyCode, Price};
pub use status::*;
