use std::sync::Arc;
use std::time::Duration;

use crate::condition::EffectSpec;
use crate::world::WorldState;

/// A named, typed input or output binding on an `Action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub type_name: String,
}

impl Binding {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Quality-of-service configuration: retries, backoff, timeout.
///
/// Transient failures (rate-limit, network, 5xx) are retried with exponential
/// backoff up to `max_attempts`; non-transient failures are not retried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Qos {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub backoff_multiplier: f64,
    pub max_backoff: Duration,
    pub timeout: Option<Duration>,
}

impl Default for Qos {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::from_millis(200),
            backoff_multiplier: 2.0,
            max_backoff: Duration::from_secs(30),
            timeout: None,
        }
    }
}

impl Qos {
    pub fn retrying(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Backoff delay before attempt `attempt` (1-indexed: the delay before
    /// the *second* attempt is `backoff_for(1)`).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
        let millis = (self.initial_backoff.as_millis() as f64 * factor) as u64;
        Duration::from_millis(millis).min(self.max_backoff)
    }
}

#[derive(Clone)]
enum CostFn {
    Constant(f64),
    Dynamic(Arc<dyn Fn(&WorldState) -> f64 + Send + Sync>),
}

impl CostFn {
    fn eval(&self, state: &WorldState) -> f64 {
        match self {
            CostFn::Constant(v) => *v,
            CostFn::Dynamic(f) => f(state),
        }
    }
}

/// Immutable descriptor of an action: preconditions, effects, cost/value
/// (which may depend on the current world state), idempotence marker, and
/// required tool-group capabilities. Execution behavior is a separate
/// callable bound to `name` by the agent runtime.
#[derive(Clone)]
pub struct Action {
    pub name: String,
    pub description: String,
    pub inputs: Vec<Binding>,
    pub outputs: Vec<Binding>,
    pub preconditions: EffectSpec,
    pub effects: EffectSpec,
    pub can_rerun: bool,
    pub tool_groups: Vec<String>,
    pub qos: Qos,
    cost_fn: CostFn,
    value_fn: CostFn,
}

impl Action {
    pub fn new(name: impl Into<String>, preconditions: EffectSpec, effects: EffectSpec) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            preconditions,
            effects,
            can_rerun: true,
            tool_groups: Vec::new(),
            qos: Qos::default(),
            cost_fn: CostFn::Constant(1.0),
            value_fn: CostFn::Constant(0.0),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_inputs(mut self, inputs: Vec<Binding>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<Binding>) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost_fn = CostFn::Constant(cost.max(0.0));
        self
    }

    pub fn with_dynamic_cost(mut self, cost_fn: impl Fn(&WorldState) -> f64 + Send + Sync + 'static) -> Self {
        self.cost_fn = CostFn::Dynamic(Arc::new(cost_fn));
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value_fn = CostFn::Constant(value.max(0.0));
        self
    }

    pub fn with_can_rerun(mut self, can_rerun: bool) -> Self {
        self.can_rerun = can_rerun;
        self
    }

    pub fn with_tool_groups(mut self, groups: Vec<String>) -> Self {
        self.tool_groups = groups;
        self
    }

    pub fn with_qos(mut self, qos: Qos) -> Self {
        self.qos = qos;
        self
    }

    pub fn cost(&self, state: &WorldState) -> f64 {
        self.cost_fn.eval(state).max(0.0)
    }

    pub fn value(&self, state: &WorldState) -> f64 {
        self.value_fn.eval(state).max(0.0)
    }

    pub fn is_achievable(&self, state: &WorldState) -> bool {
        state.satisfies(&self.preconditions)
    }

    pub fn apply(&self, state: &WorldState) -> WorldState {
        state.apply_effects(&self.effects)
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("preconditions", &self.preconditions)
            .field("effects", &self.effects)
            .field("can_rerun", &self.can_rerun)
            .finish()
    }
}

/// Outcome of executing a single action within a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Succeeded,
    Failed { reason: String },
    Paused { reason: String },
    Waiting { reason: String },
}

impl ActionStatus {
    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, ActionStatus::Failed { .. })
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, ActionStatus::Succeeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_application_satisfies_its_effects() {
        let action = Action::new(
            "makeElephant",
            EffectSpec::new(),
            EffectSpec::new().with("hasElephant", true),
        );
        let start = WorldState::new();
        assert!(start.satisfies(&action.preconditions));
        let next = action.apply(&start);
        assert!(next.satisfies(&action.effects));
    }

    #[test]
    fn backoff_grows_exponentially_and_is_capped() {
        let qos = Qos {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(100),
            backoff_multiplier: 2.0,
            max_backoff: Duration::from_millis(350),
            timeout: None,
        };
        assert_eq!(qos.backoff_for(1), Duration::from_millis(100));
        assert_eq!(qos.backoff_for(2), Duration::from_millis(200));
        assert_eq!(qos.backoff_for(3), Duration::from_millis(350)); // capped from 400
    }
}
