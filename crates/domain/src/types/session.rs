//! Logged-in user as seen by the table layer

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "S")]
    SuperAdmin,
    #[serde(rename = "A")]
    Admin,
    #[serde(rename = "B")]
    Basic,
    #[serde(rename = "D")]
    Demo,
}

/// Session handed explicitly to everything needing role-based visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub role: UserRole,
    /// Components enabled for the user's tenant (e.g. `"ocpi"`, `"pricing"`).
    #[serde(default)]
    pub components: BTreeSet<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self { user_id: user_id.into(), role, components: BTreeSet::new() }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.components.insert(component.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == UserRole::SuperAdmin
    }

    pub fn has_component(&self, component: &str) -> bool {
        self.components.contains(component)
    }
}
