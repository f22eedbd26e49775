//! End-to-end scenario 6: a remote server exposes `greet`; calling it
//! through the local client shim round-trips the declared parameters and
//! lands exactly one POST against `/api/v1/actions/execute`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use embabel_remote::dto::{ActionDto, TypeDescriptorDto};
use embabel_remote::server::RemoteActionProvider;
use embabel_remote::{router, RemoteActionClient, RemoteRegistry};
use serde_json::Value;

struct CountingGreetProvider {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl RemoteActionProvider for CountingGreetProvider {
    fn actions(&self) -> Vec<ActionDto> {
        vec![ActionDto {
            name: "greet".to_string(),
            description: "greets someone in a language".to_string(),
            inputs: vec![],
            outputs: vec![],
            pre: vec![],
            post: vec![],
            cost: 0.1,
            value: 0.3,
            can_rerun: true,
        }]
    }

    fn types(&self) -> Vec<TypeDescriptorDto> {
        Vec::new()
    }

    async fn execute(&self, action_name: &str, parameters: BTreeMap<String, Value>) -> Result<Value, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if action_name != "greet" {
            return Err(format!("unknown action `{action_name}`"));
        }
        let name = parameters.get("name").and_then(|v| v.as_str()).ok_or("missing `name`")?;
        let language = parameters.get("language").and_then(|v| v.as_str()).ok_or("missing `language`")?;
        let text = match language {
            "en" => format!("Hello, {name}!"),
            "fr" => format!("Bonjour, {name}!"),
            other => return Err(format!("unsupported language `{other}`")),
        };
        Ok(serde_json::json!({ "text": text }))
    }
}

#[tokio::test]
async fn calling_the_shim_executes_exactly_once_and_returns_the_declared_output() {
    let provider = Arc::new(CountingGreetProvider { calls: AtomicUsize::new(0) });
    let app = router(provider.clone(), Arc::new(RemoteRegistry::new()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = RemoteActionClient::new(format!("http://{addr}"));

    let actions = client.list_actions().await.unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].name, "greet");

    let parameters: BTreeMap<String, Value> = [
        ("name".to_string(), serde_json::json!("Bob")),
        ("language".to_string(), serde_json::json!("en")),
    ]
    .into_iter()
    .collect();

    let result = client.execute_action("greet", parameters).await.unwrap();
    assert_eq!(result["text"], "Hello, Bob!");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn registering_with_a_platform_is_recorded_in_its_registry() {
    let provider = Arc::new(CountingGreetProvider { calls: AtomicUsize::new(0) });
    let registry = Arc::new(RemoteRegistry::new());
    let app = router(provider, registry.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = RemoteActionClient::new(format!("http://{addr}/zoo-remote"));
    client
        .register_with(&format!("http://{addr}"), "zoo-remote", "remote zoo actions")
        .await
        .unwrap();

    let registered = registry.list();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].name, "zoo-remote");
}
