//! GOAP planner: forward search from a start `WorldState` to a `Goal`,
//! across a registered `Action` set, honoring `canRerun=false` and
//! resolving a bounded number of UNKNOWN start-state conditions on demand.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod planner;

pub use planner::{GoapPlanner, GoapPlannerConfig, MAX_UNKNOWN_RESOLUTIONS};
