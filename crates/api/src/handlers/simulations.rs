use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use engine::{interchange, SimulationResult};
use crate::AppState;

/// Validate and dry-run the workflow in the request body.
///
/// An invalid workflow is a normal `200` answer with `valid: false`; only an
/// unreadable document (`400`) or a failing catalog lookup (`502`) is an
/// HTTP error.
#[instrument(skip_all, fields(simulation_id = %Uuid::new_v4()))]
pub async fn simulate(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<SimulationResult>, StatusCode> {
    let graph = match interchange::from_value(&payload) {
        Ok(graph) => graph,
        Err(e) => {
            warn!("rejecting workflow document: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let catalog = match state.registry.list_actions().await {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("cannot fetch action catalog: {}", e);
            return Err(StatusCode::BAD_GATEWAY);
        }
    };

    if !state.config.simulate_delay.is_zero() {
        tokio::time::sleep(state.config.simulate_delay).await;
    }

    let result = engine::evaluate(&graph, &catalog);
    info!(
        "simulated {} nodes: valid={} steps={}",
        graph.nodes.len(),
        result.valid,
        result.steps.len()
    );

    Ok(Json(result))
}
