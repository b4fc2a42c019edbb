//! The `ActionRegistry` trait and the catalog entry it serves.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ActionError;

/// One externally cataloged operation an Automated node may reference.
///
/// Defined here (not in the engine crate) so registries can be implemented
/// without pulling in the graph model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationAction {
    /// Identifier referenced by `AutomatedData::action_id`.
    pub id: String,
    /// Human-readable name shown in simulation messages.
    pub label: String,
    /// Parameter names the action expects, in display order.
    #[serde(default)]
    pub params: Vec<String>,
}

impl AutomationAction {
    pub fn new<I, S>(id: impl Into<String>, label: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            label: label.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }
}

/// Source of the current action catalog.
///
/// Lookups may be slow or remote, so the contract is async. Callers read the
/// catalog once per evaluation; implementations must not assume caching.
#[async_trait]
pub trait ActionRegistry: Send + Sync {
    /// Return the catalog as it stands right now.
    async fn list_actions(&self) -> Result<Vec<AutomationAction>, ActionError>;
}
