//! Cell renderer registry
//!
//! Columns reference custom cell renderers (status chips, connector
//! badges, ...) by key. Keys are resolved once when a table definition is
//! built.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use evdash_domain::{DashError, Result};
use serde_json::Value;

/// Render function: `(cell value, whole row) -> rendered content`.
pub type RenderFn = Arc<dyn Fn(&Value, &Value) -> String + Send + Sync>;

#[derive(Clone, Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, RenderFn>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, key: impl Into<String>, render: F) -> Self
    where
        F: Fn(&Value, &Value) -> String + Send + Sync + 'static,
    {
        self.renderers.insert(key.into(), Arc::new(render));
        self
    }

    pub fn get(&self, key: &str) -> Option<RenderFn> {
        self.renderers.get(key).cloned()
    }

    /// # Errors
    /// Returns `DashError::InvalidInput` for an unregistered key.
    pub fn resolve(&self, key: &str) -> Result<RenderFn> {
        self.get(key).ok_or_else(|| DashError::InvalidInput(format!("unknown cell renderer '{key}'")))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.renderers.contains_key(key)
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.renderers.keys().collect();
        keys.sort();
        f.debug_struct("RendererRegistry").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolves_registered_keys_only() {
        let registry = RendererRegistry::new()
            .register("status-chip", |value, _row| format!("<chip>{}</chip>", value.as_str().unwrap_or("")));

        let render = registry.resolve("status-chip").unwrap();
        assert_eq!(render(&json!("Faulted"), &json!({})), "<chip>Faulted</chip>");
        assert!(registry.resolve("connector-badge").is_err());
        assert!(format!("{registry:?}").contains("status-chip"));
    }
}
