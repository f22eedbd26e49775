//! The world-state determiner: turns a blackboard's contents into a
//! `WorldState` by running a registry of per-condition evaluators against it.
//!
//! This is the "Planning system" component from the system overview: the
//! thing a planner asks "what do we currently know" before (and, for the
//! GOAP optimizing extension, during) a search.

use std::collections::HashMap;
use std::sync::Arc;

use crate::blackboard::Blackboard;
use crate::condition::{ConditionName, Determination};
use crate::world::WorldState;

/// A single condition's evaluator: given the current blackboard, produce a
/// determination. Implementations that cannot decide (missing input, a
/// collaborator call that failed) should return `Determination::Unknown`
/// rather than panicking -- the determiner has no way to distinguish "really
/// unknown" from "evaluator bug" and treats both the same way the rest of
/// the system treats UNKNOWN: as "not yet known", never as an error that
/// aborts planning.
#[derive(Clone)]
pub struct ConditionEvaluator {
    name: ConditionName,
    eval: Arc<dyn Fn(&Blackboard) -> Determination + Send + Sync>,
}

impl ConditionEvaluator {
    pub fn new(
        name: impl Into<ConditionName>,
        eval: impl Fn(&Blackboard) -> Determination + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            eval: Arc::new(eval),
        }
    }

    pub fn name(&self) -> &ConditionName {
        &self.name
    }

    pub fn evaluate(&self, blackboard: &Blackboard) -> Determination {
        (self.eval)(blackboard)
    }
}

impl std::fmt::Debug for ConditionEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionEvaluator")
            .field("name", &self.name)
            .finish()
    }
}

/// Registry of condition evaluators, used to determine a `WorldState` from a
/// `Blackboard` either in bulk (`determine_state`) or one condition at a
/// time (`determine_condition`, used by the GOAP optimizing extension to
/// resolve a single UNKNOWN without re-evaluating everything else).
#[derive(Clone, Default)]
pub struct PlanningSystem {
    evaluators: HashMap<ConditionName, ConditionEvaluator>,
}

impl PlanningSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, evaluator: ConditionEvaluator) {
        self.evaluators.insert(evaluator.name().clone(), evaluator);
    }

    pub fn with(mut self, evaluator: ConditionEvaluator) -> Self {
        self.register(evaluator);
        self
    }

    pub fn conditions(&self) -> impl Iterator<Item = &ConditionName> {
        self.evaluators.keys()
    }

    /// Evaluate a single named condition. A condition with no registered
    /// evaluator is UNKNOWN, not an error: the planner treats an
    /// unregistered condition exactly like one whose evaluator declined to
    /// decide.
    pub fn determine_condition(&self, name: &ConditionName, blackboard: &Blackboard) -> Determination {
        self.evaluators
            .get(name)
            .map(|evaluator| evaluator.evaluate(blackboard))
            .unwrap_or(Determination::Unknown)
    }

    /// Evaluate every registered condition against `blackboard`, producing a
    /// full snapshot. Conditions that evaluate to UNKNOWN are omitted from
    /// the resulting state (consistent with `WorldState::get` already
    /// returning UNKNOWN for absent entries), keeping the state compact.
    pub fn determine_state(&self, blackboard: &Blackboard) -> WorldState {
        self.evaluators
            .values()
            .filter_map(|evaluator| {
                let value = evaluator.evaluate(blackboard);
                if value.is_unknown() {
                    None
                } else {
                    Some((evaluator.name().clone(), value))
                }
            })
            .collect()
    }
}
