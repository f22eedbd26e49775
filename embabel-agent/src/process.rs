//! An `AgentProcess`: one run of an `AgentDefinition`, its own blackboard,
//! status, and action history.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use embabel_core::{ActionStatus, Blackboard};
use embabel_events::OutputChannel;
use uuid::Uuid;

use crate::builder::AgentDefinition;
use crate::policy::EarlyTerminationPolicy;

/// Which planner a process uses to turn its goals into a next action.
///
/// `Goap` searches for a multi-step plan; `Utility` greedily tries the
/// single best-scoring achievable action. An agent definition with actions
/// whose effects chain together (one action's effect satisfying another's
/// precondition) needs `Goap`; a reactive, single-step agent can use the
/// cheaper `Utility` planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlannerType {
    #[default]
    Goap,
    Utility,
}

/// How much of a process's internal reasoning is surfaced as `Logging`
/// events on its output channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbosity {
    pub show_prompts: bool,
    pub show_planning: bool,
    pub show_long_plans: bool,
}

/// Who a process is acting on behalf of, for audit/attribution.
#[derive(Debug, Clone, Default)]
pub struct Identities {
    pub for_user: Option<String>,
}

/// Configuration a process is created with: which planner to use, how
/// chatty to be, whose blackboard to start from, and which early-termination
/// policies to check after each tick.
pub struct ProcessOptions {
    pub planner_type: PlannerType,
    pub verbosity: Verbosity,
    pub identities: Identities,
    pub output_channel: Arc<OutputChannel>,
    pub early_termination_policies: Vec<EarlyTerminationPolicy>,
    pub blackboard: Blackboard,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            planner_type: PlannerType::default(),
            verbosity: Verbosity::default(),
            identities: Identities::default(),
            output_channel: Arc::new(OutputChannel::default()),
            early_termination_policies: Vec::new(),
            blackboard: Blackboard::new(),
        }
    }
}

impl ProcessOptions {
    /// Coerce `requested` to a planner type this runtime can actually run
    /// under the agent definition at hand, logging and emitting an event
    /// when the coercion changes anything.
    ///
    /// `Utility` is always runnable (it only needs achievable actions).
    /// `Goap` additionally requires an agent that has at least one
    /// multi-step-capable action set up (in practice: any actions at all,
    /// since a zero-action agent can't plan under either planner); this
    /// runtime does not reject `Goap` for that reason, but a caller who
    /// explicitly asked for a planner type this build does not support
    /// (there is currently only Goap and Utility) gets coerced to Utility
    /// with a logged warning rather than a hard failure, consistent with
    /// the rest of the runtime's "unknown is not an error" stance.
    pub fn coerce_planner_type(requested: PlannerType, supports_goap: bool, output_channel: &OutputChannel) -> PlannerType {
        if requested == PlannerType::Goap && !supports_goap {
            tracing::warn!("requested GOAP planner is unavailable for this agent; coercing to UTILITY");
            output_channel.logging(
                embabel_events::LogLevel::Warn,
                "requested GOAP planner is unavailable for this agent; coercing to UTILITY",
            );
            PlannerType::Utility
        } else {
            requested
        }
    }
}

/// Outcome of executing one action within a tick, recorded for audit.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub action_name: String,
    pub status: ActionStatus,
    pub at: DateTime<Utc>,
}

/// The state of a process at a point in time.
///
/// `Stuck` and `Waiting`/`Paused` are not failures: `Stuck` means the
/// planner found no plan to any goal from the current world state (it may
/// become reachable after some external change); `Waiting`/`Paused` mean an
/// action is blocked on something outside the process (another system,
/// human input). `Terminated` is reserved for early-termination policies
/// cutting a process short of its natural terminal status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessStatus {
    Created,
    Running,
    Completed,
    Failed { reason: String },
    Stuck,
    Paused { reason: String },
    Waiting { reason: String },
    Terminated { reason: String },
}

impl ProcessStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProcessStatus::Running | ProcessStatus::Created)
    }
}

/// One run of an `AgentDefinition`.
pub struct AgentProcess {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub definition: Arc<AgentDefinition>,
    pub options: ProcessOptions,
    pub blackboard: Blackboard,
    pub status: ProcessStatus,
    pub current_goal: Option<String>,
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
}

impl AgentProcess {
    pub fn new(definition: Arc<AgentDefinition>, options: ProcessOptions) -> Self {
        let blackboard = options.blackboard.clone();
        Self {
            id: Uuid::new_v4(),
            parent_id: None,
            definition,
            options,
            blackboard,
            status: ProcessStatus::Created,
            current_goal: None,
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// A sub-process sharing no mutable blackboard state with its parent,
    /// scoped off `parent.blackboard` the same way `Blackboard::spawn_child`
    /// scopes any other blackboard branch.
    pub fn spawn_child(&self, definition: Arc<AgentDefinition>, options: ProcessOptions) -> Self {
        let mut child = Self::new(definition, options);
        child.parent_id = Some(self.id);
        child.blackboard = self.blackboard.spawn_child();
        child
    }

    pub fn record(&mut self, action_name: impl Into<String>, status: ActionStatus) {
        self.history.push(HistoryEntry {
            action_name: action_name.into(),
            status,
            at: Utc::now(),
        });
    }

    /// Evaluate the process's configured early-termination policies against
    /// its current state, returning the first one that fires.
    pub fn check_early_termination(&self) -> Option<String> {
        self.options
            .early_termination_policies
            .iter()
            .find_map(|policy| policy.evaluate(self))
    }
}
