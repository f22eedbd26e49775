//! Early-termination policies: checked by a driver after each tick, a
//! policy can cut a process short of its natural terminal status (for
//! example turning an endless STUCK loop into a clean TERMINATED) without
//! the driver itself needing to know why.

use std::sync::Arc;

use crate::process::{AgentProcess, ProcessStatus};

/// A named predicate over the process's current state. Returns `Some(reason)`
/// when the process should stop now; `None` to let it continue.
#[derive(Clone)]
pub struct EarlyTerminationPolicy {
    name: String,
    check: Arc<dyn Fn(&AgentProcess) -> Option<String> + Send + Sync>,
}

impl EarlyTerminationPolicy {
    pub fn new(name: impl Into<String>, check: impl Fn(&AgentProcess) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self, process: &AgentProcess) -> Option<String> {
        (self.check)(process)
    }

    /// A process the planner has declared STUCK (no plan found to any goal)
    /// is not going to un-stick itself without a blackboard change no future
    /// tick will produce on its own; this policy turns that into a clean,
    /// non-error termination instead of leaving the process spinning in
    /// STUCK forever.
    pub fn on_stuck() -> Self {
        Self::new("ON_STUCK", |process| {
            if matches!(process.status, ProcessStatus::Stuck) {
                Some("terminated after the planner found no plan to any goal".to_string())
            } else {
                None
            }
        })
    }
}

impl std::fmt::Debug for EarlyTerminationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EarlyTerminationPolicy").field("name", &self.name).finish()
    }
}
