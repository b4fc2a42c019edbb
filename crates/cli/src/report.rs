//! Plain-text rendering of a simulation result.

use engine::{SimulationResult, StepStatus};

pub fn render(result: &SimulationResult) -> String {
    let mut out = String::new();

    if result.valid {
        out.push_str("Valid workflow ✅\n");
    } else {
        out.push_str("Issues Found ❌\n");
        for issue in &result.issues {
            out.push_str(&format!("  - {issue}\n"));
        }
    }

    out.push_str("\nExecution Steps\n");
    if result.steps.is_empty() {
        out.push_str("  (none)\n");
    }
    for step in &result.steps {
        let marker = match step.status {
            StepStatus::Ok => "",
            StepStatus::Error => " [error]",
        };
        out.push_str(&format!(
            "  {}. {}: {}{}\n",
            step.step_id, step.node_label, step.message, marker
        ));
    }

    out
}
