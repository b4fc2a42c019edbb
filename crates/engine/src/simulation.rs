//! Workflow validation and dry-run simulation.
//!
//! Checks applied, in order:
//! 1. Exactly one Start node.
//! 2. At least one End node.
//! 3. Depth-first walk from Start, one step per first visit, following edges
//!    in input order. Any re-entry into a visited node is reported as a cycle.
//! 4. Unreached nodes, reported only when nothing else was wrong.
//!
//! Nothing here fails: every anomaly becomes an entry in
//! [`SimulationResult::issues`] and the walk continues as far as it can.
//!
//! Known limitation: the re-entry check cannot tell a real cycle from two
//! acyclic paths converging on the same node (a diamond). Both report
//! "Cycle detected in workflow".

use std::collections::{HashMap, HashSet};

use actions::AutomationAction;
use tracing::{debug, info, instrument, warn};

use crate::models::{
    ApprovalData, AutomatedData, GraphModel, NodeData, NodeKind, NodeRecord, SimulationResult,
    SimulationStep, StepStatus, TaskData,
};

const UNASSIGNED: &str = "Unassigned";
const NO_DUE_DATE: &str = "—";
const UNKNOWN_ROLE: &str = "Unknown role";
const UNKNOWN_ACTION: &str = "Unknown action";

/// Validate `graph` and produce its simulated execution trace.
///
/// `action_catalog` resolves the `action_id` of Automated nodes; it is read,
/// never retained. The result depends only on the two inputs.
#[instrument(skip_all, fields(nodes = graph.nodes.len(), edges = graph.edges.len()))]
pub fn evaluate(graph: &GraphModel, action_catalog: &[AutomationAction]) -> SimulationResult {
    let mut issues: Vec<String> = Vec::new();
    let mut steps: Vec<SimulationStep> = Vec::new();

    // -----------------------------------------------------------------------
    // 1. Start / End presence
    // -----------------------------------------------------------------------
    let start_ids: Vec<&str> = graph
        .nodes
        .iter()
        .filter(|n| n.kind() == NodeKind::Start)
        .map(|n| n.id.as_str())
        .collect();

    if start_ids.len() != 1 {
        raise(
            &mut issues,
            format!("Exactly one Start node required (found {})", start_ids.len()),
        );
    }

    if !graph.nodes.iter().any(|n| n.kind() == NodeKind::End) {
        raise(&mut issues, "At least one End node required".to_owned());
    }

    // -----------------------------------------------------------------------
    // 2. Adjacency (edge input order) and id lookup (first record wins)
    // -----------------------------------------------------------------------
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut lookup: HashMap<&str, &NodeRecord> = HashMap::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        lookup.entry(node.id.as_str()).or_insert(node);
    }

    // -----------------------------------------------------------------------
    // 3. Depth-first walk
    // -----------------------------------------------------------------------
    // Explicit stack; children are pushed in reverse so the first edge's
    // subtree is finished before the second edge is entered.
    let mut visited: HashSet<&str> = HashSet::new();

    if let [start_id] = start_ids.as_slice() {
        let mut stack: Vec<&str> = vec![*start_id];

        while let Some(node_id) = stack.pop() {
            if !visited.insert(node_id) {
                raise(&mut issues, "Cycle detected in workflow".to_owned());
                continue;
            }

            // Dangling edge target: counted as visited, produces nothing.
            let Some(node) = lookup.get(node_id) else {
                debug!("edge target '{}' has no node record", node_id);
                continue;
            };

            let outcome = describe(node, action_catalog);
            if let Some(issue) = outcome.issue {
                raise(&mut issues, issue);
            }

            let step = SimulationStep {
                step_id: (steps.len() + 1).to_string(),
                node_label: node.label.clone(),
                status: outcome.status,
                message: outcome.message,
            };
            debug!(
                step_id = %step.step_id,
                kind = %node.kind(),
                "{}: {}",
                step.node_label,
                step.message
            );
            steps.push(step);

            if let Some(targets) = adjacency.get(node_id) {
                stack.extend(targets.iter().rev());
            }
        }
    }

    // -----------------------------------------------------------------------
    // 4. Connectivity, only as a last resort
    // -----------------------------------------------------------------------
    if graph.nodes.len() > visited.len() && issues.is_empty() {
        raise(
            &mut issues,
            "Some nodes are not connected to the workflow".to_owned(),
        );
    }

    let result = SimulationResult::new(issues, steps);
    info!(
        "simulation finished: valid={} steps={} issues={}",
        result.valid,
        result.steps.len(),
        result.issues.len()
    );
    result
}

fn raise(issues: &mut Vec<String>, issue: String) {
    warn!("workflow issue: {}", issue);
    issues.push(issue);
}

// ---------------------------------------------------------------------------
// Per-kind step messages
// ---------------------------------------------------------------------------

struct StepOutcome {
    status: StepStatus,
    message: String,
    issue: Option<String>,
}

impl StepOutcome {
    fn ok(message: String) -> Self {
        Self {
            status: StepStatus::Ok,
            message,
            issue: None,
        }
    }
}

fn describe(node: &NodeRecord, action_catalog: &[AutomationAction]) -> StepOutcome {
    match &node.data {
        NodeData::Start(_) => StepOutcome::ok("Workflow started".to_owned()),
        NodeData::Task(task) => StepOutcome::ok(describe_task(task)),
        NodeData::Approval(approval) => describe_approval(&node.label, approval),
        NodeData::Automated(automated) => {
            StepOutcome::ok(describe_automated(automated, action_catalog))
        }
        NodeData::End(_) => StepOutcome::ok("Workflow completed".to_owned()),
    }
}

fn describe_task(task: &TaskData) -> String {
    format!(
        "Task -> Assignee: {}; Due: {}",
        or_placeholder(task.assignee.as_deref(), UNASSIGNED),
        or_placeholder(task.due_date.as_deref(), NO_DUE_DATE),
    )
}

fn describe_approval(label: &str, approval: &ApprovalData) -> StepOutcome {
    let role = or_placeholder(Some(approval.approver_role.as_str()), UNKNOWN_ROLE);

    match (approval.auto_approve_threshold, approval.simulated_score) {
        (Some(threshold), Some(score)) if score >= threshold => StepOutcome::ok(format!(
            "Auto-approved by {role} (score {} ≥ {})",
            js_number(score),
            js_number(threshold)
        )),
        (Some(threshold), Some(score)) => StepOutcome {
            status: StepStatus::Error,
            message: format!(
                "Auto-approval failed (score {} < {}); manual approval required from {role}",
                js_number(score),
                js_number(threshold)
            ),
            issue: Some(format!("Auto-approve threshold not met at \"{label}\"")),
        },
        // A missing score asks for a human but is not treated as a failure.
        (Some(threshold), None) => StepOutcome::ok(format!(
            "Auto-approve threshold {} set, but no simulated score provided; \
             manual approval required from {role}",
            js_number(threshold)
        )),
        (None, _) => StepOutcome::ok(format!("Approval requested from {role}")),
    }
}

/// Number text as the editor printed it (JavaScript `Number#toString`).
///
/// `f64` `Display` already agrees inside `[1e-6, 1e21)`; outside it JavaScript
/// switches to exponent notation with an explicit sign.
fn js_number(n: f64) -> String {
    if n == 0.0 {
        // Also catches -0.
        return "0".to_owned();
    }
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }

    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

fn describe_automated(automated: &AutomatedData, action_catalog: &[AutomationAction]) -> String {
    let label = automated
        .action_id
        .as_deref()
        .and_then(|id| action_catalog.iter().find(|a| a.id == id))
        .map(|a| a.label.as_str());
    format!(
        "Automated action: {}",
        or_placeholder(label, UNKNOWN_ACTION)
    )
}

/// Empty strings count as unset, as they did in the editor.
fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => placeholder,
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EdgeRecord, EndData, StartData};

    fn approval(threshold: Option<f64>, score: Option<f64>) -> NodeRecord {
        NodeRecord::new(
            "gate",
            "Manager gate",
            NodeData::Approval(ApprovalData {
                approver_role: "Manager".into(),
                auto_approve_threshold: threshold,
                simulated_score: score,
            }),
        )
    }

    #[test]
    fn approval_at_threshold_is_auto_approved() {
        let outcome = describe(&approval(Some(80.0), Some(80.0)), &[]);
        assert_eq!(outcome.status, StepStatus::Ok);
        assert_eq!(outcome.message, "Auto-approved by Manager (score 80 ≥ 80)");
        assert!(outcome.issue.is_none());
    }

    #[test]
    fn approval_below_threshold_fails_with_issue() {
        let outcome = describe(&approval(Some(80.0), Some(50.0)), &[]);
        assert_eq!(outcome.status, StepStatus::Error);
        assert_eq!(
            outcome.message,
            "Auto-approval failed (score 50 < 80); manual approval required from Manager"
        );
        assert_eq!(
            outcome.issue.as_deref(),
            Some("Auto-approve threshold not met at \"Manager gate\"")
        );
    }

    #[test]
    fn threshold_without_score_asks_for_manual_approval_silently() {
        let outcome = describe(&approval(Some(0.0), None), &[]);
        assert_eq!(outcome.status, StepStatus::Ok);
        assert_eq!(
            outcome.message,
            "Auto-approve threshold 0 set, but no simulated score provided; \
             manual approval required from Manager"
        );
        assert!(outcome.issue.is_none());
    }

    #[test]
    fn score_without_threshold_is_a_plain_request() {
        let outcome = describe(&approval(None, Some(99.0)), &[]);
        assert_eq!(outcome.message, "Approval requested from Manager");
    }

    #[test]
    fn fractional_scores_keep_their_decimals() {
        let outcome = describe(&approval(Some(0.75), Some(0.5)), &[]);
        assert!(outcome.message.contains("(score 0.5 < 0.75)"));
    }

    #[test]
    fn numbers_outside_plain_range_use_exponent_text() {
        let outcome = describe(&approval(Some(1e21), Some(2e21)), &[]);
        assert_eq!(outcome.message, "Auto-approved by Manager (score 2e+21 ≥ 1e+21)");

        let outcome = describe(&approval(Some(1e-7), Some(2.5e-7)), &[]);
        assert_eq!(outcome.message, "Auto-approved by Manager (score 2.5e-7 ≥ 1e-7)");

        let outcome = describe(&approval(Some(-0.0), Some(0.0)), &[]);
        assert_eq!(outcome.message, "Auto-approved by Manager (score 0 ≥ 0)");
    }

    #[test]
    fn js_number_matches_editor_text() {
        assert_eq!(js_number(90.0), "90");
        assert_eq!(js_number(0.000001), "0.000001");
        assert_eq!(js_number(123456789012345680000.0), "123456789012345680000");
        assert_eq!(js_number(-1.5e22), "-1.5e+22");
        assert_eq!(js_number(f64::NAN), "NaN");
        assert_eq!(js_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn empty_role_falls_back() {
        let mut node = approval(None, None);
        if let NodeData::Approval(data) = &mut node.data {
            data.approver_role.clear();
        }
        assert_eq!(
            describe(&node, &[]).message,
            "Approval requested from Unknown role"
        );
    }

    #[test]
    fn task_placeholders_cover_unset_and_empty() {
        let task = TaskData {
            assignee: Some(String::new()),
            due_date: None,
            ..TaskData::default()
        };
        assert_eq!(describe_task(&task), "Task -> Assignee: Unassigned; Due: —");

        let task = TaskData {
            assignee: Some("Priya".into()),
            due_date: Some("2026-11-01".into()),
            ..TaskData::default()
        };
        assert_eq!(
            describe_task(&task),
            "Task -> Assignee: Priya; Due: 2026-11-01"
        );
    }

    #[test]
    fn automated_action_resolves_against_catalog() {
        let catalog = vec![AutomationAction::new("send_email", "Send Email", ["to"])];
        let known = AutomatedData {
            action_id: Some("send_email".into()),
            ..AutomatedData::default()
        };
        let unknown = AutomatedData {
            action_id: Some("fax".into()),
            ..AutomatedData::default()
        };

        assert_eq!(
            describe_automated(&known, &catalog),
            "Automated action: Send Email"
        );
        assert_eq!(
            describe_automated(&unknown, &catalog),
            "Automated action: Unknown action"
        );
        assert_eq!(
            describe_automated(&AutomatedData::default(), &catalog),
            "Automated action: Unknown action"
        );
    }

    #[test]
    fn dangling_edge_is_inert_but_counts_as_visited() {
        // start -> ghost, start -> end; "ghost" has no record.
        let graph = GraphModel::new(
            vec![
                NodeRecord::new("start", "Start", NodeData::Start(StartData::default())),
                NodeRecord::new("end", "End", NodeData::End(EndData::default())),
            ],
            vec![
                EdgeRecord::between("start", "ghost"),
                EdgeRecord::between("start", "end"),
            ],
        );

        let result = evaluate(&graph, &[]);

        assert!(result.valid, "unexpected issues: {:?}", result.issues);
        let labels: Vec<_> = result.steps.iter().map(|s| s.node_label.as_str()).collect();
        assert_eq!(labels, vec!["Start", "End"]);
        assert_eq!(result.steps[1].step_id, "2");
    }

    #[test]
    fn empty_graph_reports_both_presence_issues() {
        let result = evaluate(&GraphModel::default(), &[]);
        assert_eq!(
            result.issues,
            vec![
                "Exactly one Start node required (found 0)",
                "At least one End node required",
            ]
        );
        assert!(result.steps.is_empty());
        assert!(!result.valid);
    }
}
