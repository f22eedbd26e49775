//! Concurrent driver: dispatches every currently-achievable action named by
//! the chosen plan in parallel, each against its own snapshot of the
//! blackboard, then reduces their outcomes back into a single process
//! status and merges their writes back deterministically.

use std::collections::HashSet;

use embabel_core::{ActionStatus, GoapError};

use crate::driver::{map_action_status, select_plan, status_priority};
use crate::process::{AgentProcess, ProcessStatus};
use crate::action_runtime;

/// Plan, then dispatch every achievable action named by the chosen plan at
/// once. Each runs against its own clone of the blackboard as it stood at
/// the start of the tick; on return, actions are merged back in
/// deterministic (action-name) order, and a later action's write to a
/// binding name an earlier one also wrote this tick fails that later
/// action instead of silently overwriting.
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
    if plan.is_empty() {
        process.status = ProcessStatus::Completed;
        process.options.output_channel.completion(plan.goal_name.clone());
        return Ok(());
    }

    let achievable: Vec<String> = plan
        .actions
        .iter()
        .filter(|name| {
            definition
                .action_by_name(name)
                .map(|action| action.is_achievable(&state))
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    if achievable.is_empty() {
        process.status = ProcessStatus::Stuck;
        return Ok(());
    }

    let snapshot_len = process.blackboard.len();
    let mut handles = Vec::with_capacity(achievable.len());
    for name in &achievable {
        let action = definition
            .action_by_name(name)
            .cloned()
            .expect("achievable names are drawn from this definition's own actions");
        let body = definition.body_for(name);
        let mut scoped = process.blackboard.clone();
        let output_channel = process.options.output_channel.clone();
        let launched = name.clone();
        output_channel.progress(format!("launching `{launched}`"));
        handles.push(tokio::spawn(async move {
            let status = action_runtime::execute(&action, body.as_deref(), &mut scoped).await;
            (launched, status, scoped)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (handle, name) in handles.into_iter().zip(achievable.iter()) {
        match handle.await {
            Ok(result) => results.push(result),
            Err(join_error) => results.push((
                name.clone(),
                ActionStatus::Failed {
                    reason: format!("action task for `{name}` panicked: {join_error}"),
                },
                process.blackboard.clone(),
            )),
        }
    }
    results.sort_by(|a, b| a.0.cmp(&b.0));

    let mut used_names: HashSet<String> = HashSet::new();
    let mut worst: Option<ActionStatus> = None;
    for (name, mut status, scoped) in results {
        if status.is_succeeded() {
            let written = scoped.suffix_binding_names(snapshot_len);
            let collides = written.iter().flatten().any(|n| used_names.contains(n));
            if collides {
                status = ActionStatus::Failed {
                    reason: format!("`{name}` wrote a binding name another action dispatched this tick also wrote"),
                };
                process.options.output_channel.logging(
                    embabel_events::LogLevel::Warn,
                    format!("same-tick write collision involving `{name}`"),
                );
            } else {
                for written_name in written.into_iter().flatten() {
                    used_names.insert(written_name);
                }
                process.blackboard.merge_suffix(&scoped, snapshot_len);
            }
        }

        process.record(name, status.clone());
        worst = Some(match worst {
            None => status,
            Some(current) if status_priority(&status) > status_priority(&current) => status,
            Some(current) => current,
        });
    }

    process.status = worst.map(map_action_status).unwrap_or(ProcessStatus::Running);
    Ok(())
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
