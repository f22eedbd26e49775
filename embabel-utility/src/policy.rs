use embabel_core::{Action, Goal, Plan, WorldState};

/// Single-step greedy planner: achievable actions are ranked by net value
/// and the best one is tried once. Never looks more than one step ahead --
/// `embabel-goap` is the fallback when a multi-step plan is required.
#[derive(Debug, Clone, Default)]
pub struct UtilityPlanner {
    actions: Vec<Action>,
}

impl UtilityPlanner {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// `netValue(state) = value(state) - cost(state)`. NaN (from a
    /// misbehaving dynamic cost/value closure) sorts last, never winning.
    fn net_value(action: &Action, state: &WorldState) -> f64 {
        let net = action.value(state) - action.cost(state);
        if net.is_nan() {
            f64::NEG_INFINITY
        } else {
            net
        }
    }

    /// Rank the actions achievable in `state` by net value, best first.
    fn ranked(&self, state: &WorldState) -> Vec<&Action> {
        let mut achievable: Vec<&Action> = self.actions.iter().filter(|a| a.is_achievable(state)).collect();
        achievable.sort_by(|a, b| {
            Self::net_value(b, state)
                .partial_cmp(&Self::net_value(a, state))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        achievable
    }

    /// Produce a zero- or one-action plan toward `goal`, or `None` if the
    /// goal is not reachable in a single step from `state`.
    pub fn plan(&self, state: &WorldState, goal: &Goal) -> Option<Plan> {
        let ranked = self.ranked(state);

        if goal.is_nirvana() {
            return ranked
                .first()
                .map(|action| Plan::new(vec![action.name.clone()], &goal.name, state.clone(), action.cost(state)));
        }

        if state.satisfies_goal(goal) {
            return Some(Plan::empty_for(&goal.name, state.clone()));
        }

        let top = ranked.first()?;
        let resulting = top.apply(state);
        if resulting.satisfies_goal(goal) {
            Some(Plan::new(vec![top.name.clone()], &goal.name, state.clone(), top.cost(state)))
        } else {
            None
        }
    }
}
