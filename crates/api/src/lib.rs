//! `api` crate — HTTP surface over the simulation engine.
//!
//! Exposes:
//!   GET    /api/v1/health
//!   GET    /api/v1/automations
//!   POST   /api/v1/simulate
//!
//! Every request is independent: the workflow arrives in the body, the
//! catalog is fetched fresh from the registry, nothing is stored.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use actions::ActionRegistry;

pub mod handlers;

/// Tuning knobs for the HTTP surface.
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    /// Artificial delay before answering a simulation, for UI demos.
    pub simulate_delay: Duration,
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn ActionRegistry>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(registry: Arc<dyn ActionRegistry>, config: ApiConfig) -> Self {
        Self { registry, config }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/automations", get(handlers::automations::list))
        .route("/api/v1/simulate", post(handlers::simulations::simulate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `bind` and serve until the process is stopped.
///
/// # Errors
/// Returns the I/O error if the address can't be bound or the server fails.
pub async fn serve(bind: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(bind = %bind, "API listening");
    axum::serve(listener, router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actions::builtin_actions;
    use actions::mock::MockRegistry;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(registry: MockRegistry) -> Router {
        router(AppState::new(Arc::new(registry), ApiConfig::default()))
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn simulate_request(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/simulate")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let resp = app(MockRegistry::returning(vec![]))
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn automations_lists_registry_catalog() {
        let resp = app(MockRegistry::returning(builtin_actions()))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/automations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body[0]["id"], "send_email");
        assert_eq!(body[2]["params"], json!(["channel", "message"]));
    }

    #[tokio::test]
    async fn automations_fails_when_registry_is_down() {
        let resp = app(MockRegistry::unavailable("offline"))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/automations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn simulate_returns_trace_for_valid_workflow() {
        let doc = json!({
            "nodes": [
                { "id": "s", "type": "start", "data": { "type": "start", "label": "Begin" } },
                { "id": "a", "type": "automated",
                  "data": { "type": "automated", "label": "Mail", "actionId": "send_email" } },
                { "id": "e", "type": "end", "data": { "type": "end", "label": "Done" } }
            ],
            "edges": [
                { "id": "1", "source": "s", "target": "a" },
                { "id": "2", "source": "a", "target": "e" }
            ]
        });

        let resp = app(MockRegistry::returning(builtin_actions()))
            .oneshot(simulate_request(&doc))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["steps"][1]["stepId"], "2");
        assert_eq!(body["steps"][1]["message"], "Automated action: Send Email");
        assert_eq!(body["steps"][1]["status"], "ok");
    }

    #[tokio::test]
    async fn invalid_workflow_is_still_a_successful_response() {
        let resp = app(MockRegistry::returning(vec![]))
            .oneshot(simulate_request(&json!({ "nodes": [], "edges": [] })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["valid"], false);
        assert_eq!(
            body["issues"],
            json!([
                "Exactly one Start node required (found 0)",
                "At least one End node required"
            ])
        );
    }

    #[tokio::test]
    async fn unreadable_document_is_bad_request() {
        let registry = Arc::new(MockRegistry::returning(vec![]));
        let app = router(AppState::new(registry.clone(), ApiConfig::default()));

        let resp = app
            .oneshot(simulate_request(&json!({ "nodes": [ { "id": "x" } ] })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        // The catalog is not fetched for a document that can't be read.
        assert_eq!(registry.call_count(), 0);
    }

    #[tokio::test]
    async fn simulate_fails_when_catalog_is_unavailable() {
        let doc = json!({
            "nodes": [ { "id": "s", "data": { "type": "start", "label": "S" } } ]
        });
        let resp = app(MockRegistry::unavailable("offline"))
            .oneshot(simulate_request(&doc))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test(start_paused = true)]
    async fn simulate_delay_is_honoured() {
        let config = ApiConfig {
            simulate_delay: Duration::from_millis(700),
        };
        let app = router(AppState::new(Arc::new(MockRegistry::returning(vec![])), config));
        let started = tokio::time::Instant::now();

        let resp = app.oneshot(simulate_request(&json!({}))).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(started.elapsed() >= Duration::from_millis(700));
    }
}
