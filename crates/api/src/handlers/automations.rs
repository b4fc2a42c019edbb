use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use actions::AutomationAction;
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<AutomationAction>>, StatusCode> {
    match state.registry.list_actions().await {
        Ok(actions) => Ok(Json(actions)),
        Err(e) => {
            error!("cannot list automations: {}", e);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}
