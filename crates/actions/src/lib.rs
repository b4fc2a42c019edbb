//! `actions` crate — the automation-action catalog and the registries that serve it.
//!
//! An Automated node references an [`AutomationAction`] by id. The engine
//! never owns a catalog: callers fetch one from an [`ActionRegistry`] and pass
//! it into each evaluation.

pub mod error;
pub mod traits;
pub mod catalog;
pub mod mock;

pub use error::ActionError;
pub use traits::{ActionRegistry, AutomationAction};
pub use catalog::{builtin_actions, StaticCatalog};
