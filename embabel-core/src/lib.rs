//! Engine-agnostic data model for the Embabel agent runtime: conditions, the
//! blackboard, actions, goals, plans, and the world-state determiner that
//! ties them to a shared object store.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod blackboard;
pub mod condition;
pub mod error;
pub mod expr;
pub mod goal;
pub mod plan;
pub mod system;
pub mod world;

pub use action::{Action, ActionStatus, Binding, Qos};
pub use blackboard::Blackboard;
pub use condition::{ConditionName, Determination, EffectSpec};
pub use error::{CoreError, GoapError};
pub use expr::{ExprValue, Expression};
pub use goal::{Goal, NIRVANA_NAME};
pub use plan::Plan;
pub use system::{ConditionEvaluator, PlanningSystem};
pub use world::WorldState;
