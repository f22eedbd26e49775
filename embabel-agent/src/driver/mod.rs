//! Shared planning/status-mapping helpers used by both drivers.

pub mod concurrent;
pub mod sequential;

use std::collections::HashMap;

use embabel_core::{Action, ActionStatus, Blackboard, GoapError, Plan, WorldState};
use embabel_goap::GoapPlanner;
use embabel_utility::UtilityPlanner;

use crate::builder::AgentDefinition;
use crate::process::{PlannerType, ProcessStatus};

/// Ask the planner named by `planner_type` for the best plan across
/// `definition`'s goals from `state`. `GOAP` search errors (only the
/// unresolved-unknowns bound) propagate: they indicate a bug in the agent
/// definition, not a recoverable process condition, so neither driver
/// swallows them into a process status.
pub(crate) fn select_plan(
    definition: &AgentDefinition,
    blackboard: &Blackboard,
    state: &WorldState,
    planner_type: PlannerType,
    registry: &HashMap<String, Action>,
) -> Result<Option<Plan>, GoapError> {
    match planner_type {
        PlannerType::Goap => {
            let planner = GoapPlanner::new(definition.actions.clone());
            planner.best_plan(&definition.system, blackboard, state, &definition.goals)
        }
        PlannerType::Utility => {
            let planner = UtilityPlanner::new(definition.actions.clone());
            Ok(best_utility_plan(&planner, &definition.goals, state, registry))
        }
    }
}

/// Mirrors `GoapPlanner::best_plan`'s goal-selection tie-break (max net
/// value, then lexicographically smaller goal name) over the utility
/// planner's single-goal `plan`, since `UtilityPlanner` itself only
/// evaluates one goal at a time.
fn best_utility_plan(
    planner: &UtilityPlanner,
    goals: &[embabel_core::Goal],
    state: &WorldState,
    registry: &HashMap<String, Action>,
) -> Option<Plan> {
    let mut best: Option<(f64, Plan)> = None;
    for goal in goals {
        let Some(plan) = planner.plan(state, goal) else {
            continue;
        };
        let resulting = plan.resulting_state(registry);
        let net = goal.value(&resulting) - plan.cost;
        let take = match &best {
            None => true,
            Some((best_net, best_plan)) => net > *best_net || (net == *best_net && plan.goal_name < best_plan.goal_name),
        };
        if take {
            best = Some((net, plan));
        }
    }
    best.map(|(_, plan)| plan)
}

/// Maps a just-executed action's outcome onto the process-level status a
/// driver should leave behind for this tick.
pub(crate) fn map_action_status(status: ActionStatus) -> ProcessStatus {
    match status {
        ActionStatus::Succeeded => ProcessStatus::Running,
        ActionStatus::Failed { reason } => ProcessStatus::Failed { reason },
        ActionStatus::Paused { reason } => ProcessStatus::Paused { reason },
        ActionStatus::Waiting { reason } => ProcessStatus::Waiting { reason },
    }
}

/// Relative priority used to reduce several actions' simultaneous outcomes
/// down to one process status: a failure anywhere outranks a pause, which
/// outranks a wait, which outranks every action having simply succeeded.
pub(crate) fn status_priority(status: &ActionStatus) -> u8 {
    match status {
        ActionStatus::Failed { .. } => 3,
        ActionStatus::Paused { .. } => 2,
        ActionStatus::Waiting { .. } => 1,
        ActionStatus::Succeeded => 0,
    }
}
