//! Sequential driver: one tick plans, then executes exactly the first
//! action of the chosen plan, then stops -- the next tick re-plans from
//! whatever the blackboard looks like afterward. This is the simple,
//! single-threaded cousin of the concurrent driver; it never dispatches
//! more than one action at a time.

use embabel_core::GoapError;

use crate::driver::{map_action_status, select_plan};
use crate::process::{AgentProcess, ProcessStatus};
use crate::{action_runtime, builder::AgentDefinition};

/// Plan, then execute the first step of the chosen plan (if any), updating
/// `process` in place. Returns `Ok(())` having left a non-`Running` status
/// in `process.status` when the tick reached a terminal/paused/waiting
/// condition; a GOAP planner error propagates rather than becoming a status.
pub async fn tick(process: &mut AgentProcess) -> Result<(), GoapError> {
    let definition = process.definition.clone();
    let state = definition.system.determine_state(&process.blackboard);
    let registry = definition.actions_by_name();

    let plan = select_plan(
        &definition,
        &process.blackboard,
        &state,
        process.options.planner_type,
        &registry,
    )?;

    let Some(plan) = plan else {
        process.status = ProcessStatus::Stuck;
        process
            .options
            .output_channel
            .logging(embabel_events::LogLevel::Warn, "no plan found to any goal");
        return Ok(());
    };

    process.current_goal = Some(plan.goal_name.clone());
    if process.options.verbosity.show_planning {
        process
            .options
            .output_channel
            .progress(format!("planned toward `{}`: {:?}", plan.goal_name, plan.actions));
    }

    if plan.is_empty() {
        process.status = ProcessStatus::Completed;
        process.options.output_channel.completion(plan.goal_name.clone());
        return Ok(());
    }

    let action_name = plan.actions[0].clone();
    execute_step(process, &definition, &state, action_name).await;
    Ok(())
}

async fn execute_step(process: &mut AgentProcess, definition: &AgentDefinition, state: &embabel_core::WorldState, action_name: String) {
    let Some(action) = definition.action_by_name(&action_name).cloned() else {
        process.status = ProcessStatus::Failed {
            reason: format!("plan named action `{action_name}`, which is not in this agent's action set"),
        };
        return;
    };

    if !action.is_achievable(state) {
        let reason = format!("precondition for `{action_name}` no longer holds at execution time");
        process.record(
            action_name.clone(),
            embabel_core::ActionStatus::Failed { reason: reason.clone() },
        );
        process.status = ProcessStatus::Failed { reason };
        return;
    }

    let body = definition.body_for(&action_name);
    let status = action_runtime::execute(&action, body.as_deref(), &mut process.blackboard).await;
    process.record(action_name, status.clone());
    process.status = map_action_status(status);
}

/// Ticks `process` until it leaves `Running`/`Created` or `max_ticks` ticks
/// have run, checking early-termination policies after each tick.
pub async fn run(process: &mut AgentProcess, max_ticks: usize) -> Result<ProcessStatus, GoapError> {
    process.status = ProcessStatus::Running;
    for _ in 0..max_ticks {
        if process.status.is_terminal() {
            break;
        }
        tick(process).await?;
        if let Some(reason) = process.check_early_termination() {
            process.status = ProcessStatus::Terminated { reason };
            break;
        }
    }
    Ok(process.status.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_runtime::{from_fn, BodyOutcome};
    use crate::builder::AgentBuilder;
    use crate::process::ProcessOptions;
    use embabel_core::condition::EffectSpec;
    use embabel_core::{Action, ConditionEvaluator, Goal};
    use std::sync::Arc;

    fn bool_condition(name: &str) -> ConditionEvaluator {
        let key = name.to_string();
        ConditionEvaluator::new(name, move |bb| embabel_core::Determination::from(bb.by_name::<bool>(&key).map(|v| *v)))
    }

    #[tokio::test]
    async fn completes_immediately_when_goal_already_satisfied() {
        let goal = Goal::new("done", EffectSpec::new().with("flag", true), 1.0);
        let definition = Arc::new(
            AgentBuilder::new("demo", "", "test")
                .with_condition(bool_condition("flag"))
                .with_goal(goal)
                .without_nirvana()
                .build(),
        );
        let mut options = ProcessOptions::default();
        options.blackboard.bind("flag", true);
        let mut process = AgentProcess::new(definition, options);

        let status = run(&mut process, 5).await.unwrap();
        assert_eq!(status, ProcessStatus::Completed);
    }

    #[tokio::test]
    async fn executes_a_single_step_plan_to_completion() {
        let action = Action::new("setFlag", EffectSpec::new(), EffectSpec::new().with("flag", true)).with_value(1.0);
        let body = from_fn(|bb| {
            bb.bind("flag", true);
            Ok(BodyOutcome::Succeeded)
        });
        let goal = Goal::new("done", EffectSpec::new().with("flag", true), 1.0);
        let definition = Arc::new(
            AgentBuilder::new("demo", "", "test")
                .with_condition(bool_condition("flag"))
                .with_action(action, body)
                .with_goal(goal)
                .without_nirvana()
                .build(),
        );
        let mut process = AgentProcess::new(definition, ProcessOptions::default());

        let status = run(&mut process, 5).await.unwrap();
        assert_eq!(status, ProcessStatus::Completed);
        assert_eq!(process.history.len(), 1);
        assert_eq!(process.history[0].action_name, "setFlag");
    }

    #[tokio::test]
    async fn goes_stuck_when_no_plan_reaches_any_goal() {
        let goal = Goal::new("unreachable", EffectSpec::new().with("flag", true), 1.0);
        let definition = Arc::new(
            AgentBuilder::new("demo", "", "test")
                .with_condition(bool_condition("flag"))
                .with_goal(goal)
                .without_nirvana()
                .build(),
        );
        let mut process = AgentProcess::new(definition, ProcessOptions::default());

        let status = run(&mut process, 3).await.unwrap();
        assert_eq!(status, ProcessStatus::Stuck);
    }
}
