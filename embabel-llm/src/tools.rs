//! Tool callbacks exposed to an LLM invocation, and the "goals as tools"
//! pattern: wrap every currently achievable goal as a callable tool an LLM
//! can pick to decide what to pursue next.
//!
//! Per the redesign note on deep interface hierarchies (no subclassing), a
//! tool is a small record -- name, description, a JSON parameter schema, and
//! a callback -- not a trait object hierarchy of tool kinds.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// What invoking a tool callback produces.
pub type ToolResult = Result<Value, String>;

/// A single callable tool. `invoke` is async because the most common
/// implementations (goal handoff, a declared tool-object method, an ad-hoc
/// tool-group member) all do I/O -- spawning a sub-process, calling an
/// external service.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn invoke(&self, arguments: Value) -> ToolResult;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(Value) -> ToolResult + Send + Sync,
{
    async fn invoke(&self, arguments: Value) -> ToolResult {
        (self.0)(arguments)
    }
}

/// A named, described tool with a JSON Schema for its parameters and the
/// handler that runs when an LLM calls it.
#[derive(Clone)]
pub struct ToolCallback {
    name: String,
    description: String,
    parameters_schema: Value,
    handler: Arc<dyn ToolHandler>,
}

impl ToolCallback {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: Value,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema,
            handler,
        }
    }

    pub fn from_fn(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: Value,
        handler: impl Fn(Value) -> ToolResult + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, description, parameters_schema, Arc::new(FnHandler(handler)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters_schema(&self) -> &Value {
        &self.parameters_schema
    }

    pub async fn invoke(&self, arguments: Value) -> ToolResult {
        self.handler.invoke(arguments).await
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters_schema: self.parameters_schema.clone(),
        }
    }
}

impl std::fmt::Debug for ToolCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCallback").field("name", &self.name).finish()
    }
}

/// The wire-shape description of a tool, without its callback -- what gets
/// sent to the LLM vendor, not invoked directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters_schema: Value,
}

/// Configuration for the "goals as tools" builder: how a goal's name becomes
/// a tool name, and which goals (by name) are excluded regardless of
/// reachability.
#[derive(Clone)]
pub struct GoalToolConfig {
    naming_strategy: Arc<dyn Fn(&str) -> String + Send + Sync>,
    excluded_goal_names: Vec<String>,
}

impl GoalToolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_naming_strategy(mut self, strategy: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.naming_strategy = Arc::new(strategy);
        self
    }

    pub fn excluding(mut self, goal_names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_goal_names = goal_names.into_iter().map(Into::into).collect();
        self
    }

    fn tool_name(&self, goal_name: &str) -> String {
        (self.naming_strategy)(goal_name)
    }
}

impl Default for GoalToolConfig {
    fn default() -> Self {
        Self {
            naming_strategy: Arc::new(sanitize_to_identifier),
            excluded_goal_names: Vec::new(),
        }
    }
}

/// Default naming strategy: lower-case, non-alphanumeric runs collapsed to a
/// single underscore, leading/trailing underscores trimmed.
fn sanitize_to_identifier(goal_name: &str) -> String {
    let mut out = String::with_capacity(goal_name.len());
    let mut last_was_separator = true;
    for ch in goal_name.chars() {
        if ch.is_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_was_separator = false;
        } else if !last_was_separator {
            out.push('_');
            last_was_separator = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Build one tool per currently achievable goal: `is_achievable(goal_name)`
/// is the caller-supplied reachability predicate (typically backed by a
/// one-step utility-planner check or a full GOAP search, which this crate
/// does not itself depend on to avoid a dependency cycle with the planner
/// crates), `handoff` spawns the sub-process pursuing that goal when the
/// tool is invoked. Goals named in `config`'s exclusion set are filtered out
/// regardless of reachability.
pub fn achievable_goal_tools<'a>(
    goal_names: impl IntoIterator<Item = &'a str>,
    is_achievable: impl Fn(&str) -> bool,
    handoff: Arc<dyn Fn(&str, Value) -> ToolResult + Send + Sync>,
    config: &GoalToolConfig,
) -> Vec<ToolCallback> {
    goal_names
        .into_iter()
        .filter(|name| !config.excluded_goal_names.iter().any(|excluded| excluded == name))
        .filter(|name| is_achievable(name))
        .map(|goal_name| {
            let tool_name = config.tool_name(goal_name);
            let goal_name = goal_name.to_string();
            let handoff = handoff.clone();
            ToolCallback::from_fn(
                tool_name,
                format!("Pursue the `{goal_name}` goal"),
                serde_json::json!({"type": "object", "properties": {}}),
                move |arguments| handoff(&goal_name, arguments),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tool_callback_invokes_its_handler() {
        let tool = ToolCallback::from_fn("ping", "pings back", serde_json::json!({}), |_args| {
            Ok(serde_json::json!({"pong": true}))
        });
        let result = tool.invoke(serde_json::json!({})).await.unwrap();
        assert_eq!(result, serde_json::json!({"pong": true}));
    }

    #[test]
    fn default_naming_strategy_sanitizes_to_identifier() {
        assert_eq!(sanitize_to_identifier("Have Zoo!"), "have_zoo");
        assert_eq!(sanitize_to_identifier("  leading"), "leading");
        assert_eq!(sanitize_to_identifier("trailing  "), "trailing");
    }

    #[test]
    fn achievable_goal_tools_includes_only_reachable_unexcluded_goals() {
        let config = GoalToolConfig::new().excluding(["g2"]);
        let handoff = Arc::new(|goal_name: &str, _args: Value| Ok(serde_json::json!({"goal": goal_name})));

        let tools = achievable_goal_tools(
            ["g1", "g2", "g3"],
            |name| name != "g3",
            handoff,
            &config,
        );

        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["g1"]);
    }

    #[tokio::test]
    async fn invoking_a_goal_tool_triggers_its_handoff_with_the_goal_name() {
        let config = GoalToolConfig::new();
        let handoff = Arc::new(|goal_name: &str, _args: Value| Ok(serde_json::json!({"handed_off_to": goal_name})));
        let tools = achievable_goal_tools(["haveZoo"], |_| true, handoff, &config);

        let result = tools[0].invoke(serde_json::json!({})).await.unwrap();
        assert_eq!(result, serde_json::json!({"handed_off_to": "haveZoo"}));
    }
}
