//! Single-step greedy (utility) planner: rank achievable actions by
//! `value(state) - cost(state)` and try the best one once.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod policy;

pub use policy::UtilityPlanner;
