//! Dashboard notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NotificationId;

/// A notification shown in the admin notification feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(alias = "_id")]
    pub id: NotificationId,
    pub title: String,
    #[serde(default)]
    pub message: String,
    /// Free-form category from the backend (`order`, `payment`, ...).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, alias = "read")]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
