use std::collections::HashMap;

use crate::action::Action;
use crate::goal::Goal;
use crate::world::WorldState;

/// An ordered sequence of action names, together with the state it starts
/// from and the goal it was built to satisfy.
///
/// `Plan` names actions rather than owning them: the planner that produced
/// it and the action registry it drew from are expected to agree on names.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub actions: Vec<String>,
    pub goal_name: String,
    pub start: WorldState,
    pub cost: f64,
}

impl Plan {
    pub fn new(actions: Vec<String>, goal_name: impl Into<String>, start: WorldState, cost: f64) -> Self {
        Self {
            actions,
            goal_name: goal_name.into(),
            start,
            cost,
        }
    }

    pub fn empty_for(goal_name: impl Into<String>, start: WorldState) -> Self {
        Self {
            actions: Vec::new(),
            goal_name: goal_name.into(),
            start,
            cost: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Replays the plan's actions from `start` against `actions_by_name`
    /// and checks the resulting state against `goal`. An action name with
    /// no registry entry is treated as a no-op step (it cannot have
    /// contributed any effect).
    pub fn is_complete(&self, actions_by_name: &HashMap<String, Action>, goal: &Goal) -> bool {
        self.resulting_state(actions_by_name).satisfies_goal(goal)
    }

    pub fn resulting_state(&self, actions_by_name: &HashMap<String, Action>) -> WorldState {
        let mut state = self.start.clone();
        for name in &self.actions {
            if let Some(action) = actions_by_name.get(name) {
                state = action.apply(&state);
            }
        }
        state
    }
}
