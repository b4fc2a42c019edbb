//! `MockRegistry` — a test double for `ActionRegistry`.
//!
//! Useful in unit and integration tests where the real catalog source is
//! either unavailable or irrelevant.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::{ActionError, ActionRegistry, AutomationAction};

/// Behaviour injected into `MockRegistry` at construction time.
pub enum MockBehaviour {
    /// Return this catalog.
    Catalog(Vec<AutomationAction>),
    /// Fail with `ActionError::Unavailable`.
    Unavailable(String),
}

/// A mock registry that counts lookups and returns a programmer-specified
/// result.
pub struct MockRegistry {
    pub behaviour: MockBehaviour,
    calls: Arc<AtomicUsize>,
}

impl MockRegistry {
    /// Create a mock that always returns `actions`.
    pub fn returning(actions: Vec<AutomationAction>) -> Self {
        Self {
            behaviour: MockBehaviour::Catalog(actions),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that always fails.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self {
            behaviour: MockBehaviour::Unavailable(msg.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times the catalog has been requested.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActionRegistry for MockRegistry {
    async fn list_actions(&self) -> Result<Vec<AutomationAction>, ActionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behaviour {
            MockBehaviour::Catalog(actions) => Ok(actions.clone()),
            MockBehaviour::Unavailable(msg) => Err(ActionError::Unavailable(msg.clone())),
        }
    }
}
