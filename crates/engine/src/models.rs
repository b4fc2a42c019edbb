//! Core domain models for the simulation engine.
//!
//! These types are the in-memory snapshot of one workflow design. The engine
//! borrows a [`GraphModel`] for a single evaluation and never mutates it.
//! Reading and writing the editor's JSON format lives in
//! [`crate::interchange`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// The five step types a workflow is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Start,
    Task,
    Approval,
    Automated,
    End,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Task => "task",
            NodeKind::Approval => "approval",
            NodeKind::Automated => "automated",
            NodeKind::End => "end",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NodeData
// ---------------------------------------------------------------------------

/// Ordered key/value pair used for start metadata and task custom fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartData {
    #[serde(default)]
    pub metadata: Vec<KeyValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<KeyValue>,
}

/// Approval gate. An unset threshold means "always ask a human"; a threshold
/// of `0` is a real threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalData {
    #[serde(default)]
    pub approver_role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_approve_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulated_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomatedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_message: Option<String>,
    #[serde(default)]
    pub summary_flag: bool,
}

/// Per-kind payload. The variant *is* the node's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeData {
    Start(StartData),
    Task(TaskData),
    Approval(ApprovalData),
    Automated(AutomatedData),
    End(EndData),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Start(_) => NodeKind::Start,
            NodeData::Task(_) => NodeKind::Task,
            NodeData::Approval(_) => NodeKind::Approval,
            NodeData::Automated(_) => NodeKind::Automated,
            NodeData::End(_) => NodeKind::End,
        }
    }
}

// ---------------------------------------------------------------------------
// NodeRecord / EdgeRecord
// ---------------------------------------------------------------------------

/// A single step in the workflow graph.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    /// Referenced by edges. Uniqueness is the caller's job.
    pub id: String,
    /// Caption reported as `nodeLabel` in simulation steps.
    pub label: String,
    pub data: NodeData,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, label: impl Into<String>, data: NodeData) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            data,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }
}

/// Directed edge from one node to another. Endpoints are not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRecord {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl EdgeRecord {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Edge with the editor's default id, `"{source}-{target}"`.
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{source}-{target}"),
            source,
            target,
        }
    }
}

// ---------------------------------------------------------------------------
// GraphModel
// ---------------------------------------------------------------------------

/// A complete workflow design: nodes and edges, both in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphModel {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphModel {
    pub fn new(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Self {
        Self { nodes, edges }
    }
}

// ---------------------------------------------------------------------------
// Simulation output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Ok,
    Error,
}

/// One entry in the execution trace, one per visited node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStep {
    /// 1-based position in the trace, as a string.
    pub step_id: String,
    pub node_label: String,
    pub status: StepStatus,
    pub message: String,
}

/// Outcome of one evaluation. `valid` is exactly `issues.is_empty()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub valid: bool,
    pub issues: Vec<String>,
    pub steps: Vec<SimulationStep>,
}

impl SimulationResult {
    pub fn new(issues: Vec<String>, steps: Vec<SimulationStep>) -> Self {
        Self {
            valid: issues.is_empty(),
            issues,
            steps,
        }
    }
}
