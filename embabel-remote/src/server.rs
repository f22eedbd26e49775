//! Server side of the remote action REST protocol: an axum router exposing
//! `/api/v1/actions`, `/api/v1/types`, `/api/v1/actions/execute`, and a
//! registry endpoint other remote servers announce themselves through.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::dto::{ActionDto, ExecuteActionRequest, RegisterRemoteRequest, TypeDescriptorDto};

/// Supplies the actions/types a remote action server exposes, and runs a
/// named action against caller-supplied parameters. Implemented by whatever
/// owns the actual domain logic; this crate only wires it to HTTP.
#[async_trait::async_trait]
pub trait RemoteActionProvider: Send + Sync {
    fn actions(&self) -> Vec<ActionDto>;
    fn types(&self) -> Vec<TypeDescriptorDto>;
    async fn execute(&self, action_name: &str, parameters: BTreeMap<String, Value>) -> Result<Value, String>;
}

/// In-memory registry of remote action servers that have announced
/// themselves via `POST /api/v1/remote/register`. The core does not
/// prescribe how a platform uses this beyond recording it; the default
/// registry here is the in-memory realization the spec's "persistence
/// beyond an in-memory default" non-goal anticipates being swapped out.
#[derive(Default)]
pub struct RemoteRegistry {
    entries: RwLock<Vec<RegisterRemoteRequest>>,
}

impl RemoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, request: RegisterRemoteRequest) {
        let mut entries = self.entries.write().expect("registry lock poisoned");
        entries.retain(|e| e.base_url != request.base_url);
        entries.push(request);
    }

    pub fn list(&self) -> Vec<RegisterRemoteRequest> {
        self.entries.read().expect("registry lock poisoned").clone()
    }
}

struct ServerState {
    provider: Arc<dyn RemoteActionProvider>,
    registry: Arc<RemoteRegistry>,
}

/// Build the axum router for a remote action server backed by `provider`,
/// recording registrations from other remotes into `registry`.
pub fn router(provider: Arc<dyn RemoteActionProvider>, registry: Arc<RemoteRegistry>) -> Router {
    let state = Arc::new(ServerState { provider, registry });
    Router::new()
        .route("/api/v1/actions", get(list_actions))
        .route("/api/v1/types", get(list_types))
        .route("/api/v1/actions/execute", post(execute_action))
        .route("/api/v1/remote/register", post(register_remote))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn list_actions(State(state): State<Arc<ServerState>>) -> Json<Vec<ActionDto>> {
    Json(state.provider.actions())
}

async fn list_types(State(state): State<Arc<ServerState>>) -> Json<Vec<TypeDescriptorDto>> {
    Json(state.provider.types())
}

async fn execute_action(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ExecuteActionRequest>,
) -> impl IntoResponse {
    match state.provider.execute(&request.action_name, request.parameters).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(message) => {
            tracing::warn!(action = %request.action_name, %message, "remote action execution failed");
            (StatusCode::BAD_REQUEST, Json(serde_json::json!({"error": message}))).into_response()
        }
    }
}

async fn register_remote(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<RegisterRemoteRequest>,
) -> impl IntoResponse {
    tracing::info!(base_url = %request.base_url, name = %request.name, "registered remote action server");
    state.registry.register(request);
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct GreetProvider;

    #[async_trait::async_trait]
    impl RemoteActionProvider for GreetProvider {
        fn actions(&self) -> Vec<ActionDto> {
            vec![ActionDto {
                name: "greet".to_string(),
                description: "greets someone".to_string(),
                inputs: vec![],
                outputs: vec![],
                pre: vec![],
                post: vec![],
                cost: 0.1,
                value: 0.5,
                can_rerun: true,
            }]
        }

        fn types(&self) -> Vec<TypeDescriptorDto> {
            Vec::new()
        }

        async fn execute(&self, action_name: &str, parameters: BTreeMap<String, Value>) -> Result<Value, String> {
            if action_name != "greet" {
                return Err(format!("unknown action `{action_name}`"));
            }
            let name = parameters.get("name").and_then(|v| v.as_str()).unwrap_or("world");
            let language = parameters.get("language").and_then(|v| v.as_str()).unwrap_or("en");
            let text = if language == "en" { format!("Hello, {name}!") } else { format!("Bonjour, {name}!") };
            Ok(serde_json::json!({"text": text}))
        }
    }

    #[tokio::test]
    async fn execute_action_round_trips_declared_parameters() {
        let router = router(Arc::new(GreetProvider), Arc::new(RemoteRegistry::new()));

        let body = serde_json::json!({
            "action_name": "greet",
            "parameters": {"name": "Bob", "language": "en"}
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/actions/execute")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["text"], "Hello, Bob!");
    }

    #[tokio::test]
    async fn unknown_action_returns_bad_request() {
        let router = router(Arc::new(GreetProvider), Arc::new(RemoteRegistry::new()));

        let body = serde_json::json!({"action_name": "nope", "parameters": {}});
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/actions/execute")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn registration_is_recorded_and_listable() {
        let registry = Arc::new(RemoteRegistry::new());
        let router = router(Arc::new(GreetProvider), registry.clone());

        let body = serde_json::json!({
            "base_url": "https://remote.example/zoo",
            "name": "zoo-remote",
            "description": "remote zoo actions"
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/remote/register")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.list()[0].name, "zoo-remote");
    }
}
