//! Assembles an `AgentDefinition`: the immutable set of actions (each paired
//! with the body that runs it), goals, and condition evaluators a process
//! plans and executes against.

use std::collections::HashMap;
use std::sync::Arc;

use embabel_core::{Action, ConditionEvaluator, Goal, PlanningSystem};

use crate::action_runtime::ActionBody;

/// An agent's static definition: what it's named, what it can do (actions
/// plus their bodies), what it's trying to achieve (goals), and how it reads
/// the world (condition evaluators). Shared (via `Arc`) across every process
/// spawned from it -- a definition is immutable once built.
pub struct AgentDefinition {
    pub name: String,
    pub description: String,
    pub provider: String,
    pub actions: Vec<Action>,
    pub goals: Vec<Goal>,
    pub system: PlanningSystem,
    bodies: HashMap<String, Arc<dyn ActionBody>>,
}

impl AgentDefinition {
    pub fn action_by_name(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn actions_by_name(&self) -> HashMap<String, Action> {
        self.actions.iter().map(|a| (a.name.clone(), a.clone())).collect()
    }

    pub fn body_for(&self, name: &str) -> Option<Arc<dyn ActionBody>> {
        self.bodies.get(name).cloned()
    }
}

impl std::fmt::Debug for AgentDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentDefinition")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("actions", &self.actions.iter().map(|a| &a.name).collect::<Vec<_>>())
            .field("goals", &self.goals.iter().map(|g| &g.name).collect::<Vec<_>>())
            .finish()
    }
}

/// Builds an `AgentDefinition` one action/goal/condition at a time.
pub struct AgentBuilder {
    name: String,
    description: String,
    provider: String,
    actions: Vec<Action>,
    bodies: HashMap<String, Arc<dyn ActionBody>>,
    goals: Vec<Goal>,
    system: PlanningSystem,
    with_nirvana: bool,
}

impl AgentBuilder {
    pub fn new(name: impl Into<String>, description: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            provider: provider.into(),
            actions: Vec::new(),
            bodies: HashMap::new(),
            goals: Vec::new(),
            system: PlanningSystem::new(),
            with_nirvana: true,
        }
    }

    pub fn with_action(mut self, action: Action, body: Arc<dyn ActionBody>) -> Self {
        self.bodies.insert(action.name.clone(), body);
        self.actions.push(action);
        self
    }

    pub fn with_goal(mut self, goal: Goal) -> Self {
        self.goals.push(goal);
        self
    }

    pub fn with_condition(mut self, evaluator: ConditionEvaluator) -> Self {
        self.system.register(evaluator);
        self
    }

    /// A terminal Nirvana goal (trivially satisfied, zero value) is added by
    /// default so a utility-planned agent with nothing more profitable to do
    /// still has something to plan toward instead of going STUCK the moment
    /// its declared goals are all satisfied. Agents that want STUCK to mean
    /// exactly "no declared goal is reachable" can opt out.
    pub fn without_nirvana(mut self) -> Self {
        self.with_nirvana = false;
        self
    }

    pub fn build(mut self) -> AgentDefinition {
        if self.with_nirvana && !self.goals.iter().any(|g| g.is_nirvana()) {
            self.goals.push(Goal::nirvana());
        }
        AgentDefinition {
            name: self.name,
            description: self.description,
            provider: self.provider,
            actions: self.actions,
            goals: self.goals,
            system: self.system,
            bodies: self.bodies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_runtime::{from_fn, BodyOutcome};
    use embabel_core::condition::EffectSpec;

    #[test]
    fn build_auto_adds_nirvana_goal_by_default() {
        let definition = AgentBuilder::new("demo", "a demo agent", "test").build();
        assert!(definition.goals.iter().any(|g| g.is_nirvana()));
    }

    #[test]
    fn without_nirvana_opts_out() {
        let definition = AgentBuilder::new("demo", "", "test").without_nirvana().build();
        assert!(!definition.goals.iter().any(|g| g.is_nirvana()));
    }

    #[test]
    fn registered_action_is_retrievable_with_its_body() {
        let action = Action::new("ping", EffectSpec::new(), EffectSpec::new().with("pinged", true));
        let body = from_fn(|_bb| Ok(BodyOutcome::Succeeded));
        let definition = AgentBuilder::new("demo", "", "test").with_action(action, body).build();

        assert!(definition.action_by_name("ping").is_some());
        assert!(definition.body_for("ping").is_some());
        assert!(definition.body_for("missing").is_none());
    }
}
