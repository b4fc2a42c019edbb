//! `engine` crate — the workflow graph model, validation/simulation, and the
//! editor's JSON interchange format.

pub mod models;
pub mod error;
pub mod simulation;
pub mod interchange;

pub use models::{
    GraphModel, NodeRecord, EdgeRecord, NodeData, NodeKind, SimulationResult, SimulationStep,
    StepStatus,
};
pub use error::EngineError;
pub use simulation::evaluate;
pub use actions::AutomationAction;
