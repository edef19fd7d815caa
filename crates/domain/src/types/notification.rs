//! Entity change notifications pushed by the backend

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationAction {
    Create,
    Update,
    Delete,
}

impl_domain_status_conversions!(NotificationAction {
    Create => "create",
    Update => "update",
    Delete => "delete",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub action: NotificationAction,
    /// Entity name, e.g. `"charging_station"`.
    pub entity: String,
    pub id: Option<String>,
}

impl ChangeNotification {
    pub fn new(action: NotificationAction, entity: impl Into<String>, id: Option<String>) -> Self {
        Self { action, entity: entity.into(), id }
    }

    pub fn concerns(&self, entity: &str) -> bool {
        self.entity.eq_ignore_ascii_case(entity)
    }
}
