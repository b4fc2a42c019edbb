//! `StaticCatalog` — a registry over a fixed list of actions.
//!
//! The list comes either from the built-in defaults or from a JSON file
//! (an array of `{ "id", "label", "params" }` objects).

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{ActionError, ActionRegistry, AutomationAction};

/// The catalog the workflow editor ships with.
pub fn builtin_actions() -> Vec<AutomationAction> {
    vec![
        AutomationAction::new("send_email", "Send Email", ["to", "subject", "body"]),
        AutomationAction::new("generate_doc", "Generate Document", ["template", "recipient"]),
        AutomationAction::new("notify_slack", "Notify Slack", ["channel", "message"]),
    ]
}

/// Serves the same catalog on every lookup, optionally after a fixed delay.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    actions: Vec<AutomationAction>,
    latency: Duration,
}

impl StaticCatalog {
    pub fn new(actions: Vec<AutomationAction>) -> Self {
        Self {
            actions,
            latency: Duration::ZERO,
        }
    }

    /// Catalog backed by [`builtin_actions`].
    pub fn builtin() -> Self {
        Self::new(builtin_actions())
    }

    /// Parse a JSON array of actions.
    ///
    /// # Errors
    /// [`ActionError::InvalidCatalog`] if the document is not an array of actions.
    pub fn from_json_str(json: &str) -> Result<Self, ActionError> {
        let actions: Vec<AutomationAction> = serde_json::from_str(json)?;
        Ok(Self::new(actions))
    }

    /// Load a JSON catalog file.
    ///
    /// # Errors
    /// [`ActionError::Io`] if the file can't be read, otherwise as
    /// [`StaticCatalog::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ActionError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ActionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            "loaded {} automation actions from {}",
            catalog.actions.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Delay every lookup by `latency`, the way a remote registry would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn actions(&self) -> &[AutomationAction] {
        &self.actions
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[async_trait]
impl ActionRegistry for StaticCatalog {
    async fn list_actions(&self) -> Result<Vec<AutomationAction>, ActionError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        debug!("serving {} automation actions", self.actions.len());
        Ok(self.actions.clone())
    }
}
