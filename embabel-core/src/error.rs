use thiserror::Error;

use crate::condition::ConditionName;

/// Error taxonomy for the action/blackboard boundary.
///
/// These are the kinds an action's body can raise or the runtime can detect
/// before invoking one; the agent-process driver classifies each into an
/// `ActionStatus` rather than propagating it past the tick boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("required input `{binding}` of type `{type_name}` was not found on the blackboard")]
    InputMissing { binding: String, type_name: String },

    #[error("action `{action}` was dispatched but precondition `{condition}` no longer holds")]
    PreconditionViolated {
        action: String,
        condition: ConditionName,
    },

    #[error("{operation} is not supported by this collaborator")]
    UnsupportedOperation { operation: String },

    #[error("process was cancelled: {reason}")]
    Cancelled { reason: String },
}

/// Errors raised by the GOAP planner.
///
/// Lives alongside `CoreError` rather than in `embabel-goap` because the
/// planning system (`crate::system::PlanningSystem`) is a core-crate type
/// that any planner implementation may need to report against.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GoapError {
    /// More than `MAX_UNKNOWN_RESOLUTIONS` conditions relevant to a goal were
    /// left UNKNOWN after on-demand evaluation. Enumerating every combination
    /// of resolutions is exponential in the unknown count, so the planner
    /// gives up with a typed error rather than silently searching a subset.
    #[error(
        "goal `{goal}` has {unknown_count} unresolved unknown condition(s), exceeding the bound of {bound}"
    )]
    MultipleUnknownsUnhandled {
        goal: String,
        unknown_count: usize,
        bound: usize,
    },

    /// The search exhausted its node-expansion budget without reaching the
    /// goal.
    #[error("no plan found for goal `{goal}` within {expansions} expansions")]
    NoPlanFound { goal: String, expansions: usize },
}
