//! Agent process runtime: the state machine that turns an `AgentDefinition`
//! (actions, goals, condition evaluators) into a running, plan-and-execute
//! loop over a shared blackboard.
//!
//! `embabel-core` defines the data (actions, conditions, the blackboard);
//! `embabel-goap`/`embabel-utility` define the two planners; this crate
//! wires both into an `AgentProcess` driven either sequentially (one action
//! at a time, replanning every tick) or concurrently (every achievable
//! action in the current plan dispatched at once, reduced back to a single
//! status).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action_runtime;
pub mod builder;
#[cfg(feature = "serde")]
pub mod config;
pub mod driver;
pub mod policy;
pub mod process;

pub use action_runtime::{ActionBody, BodyOutcome, BodyResult};
pub use builder::{AgentBuilder, AgentDefinition};
pub use policy::EarlyTerminationPolicy;
pub use process::{AgentProcess, HistoryEntry, Identities, PlannerType, ProcessOptions, ProcessStatus, Verbosity};
