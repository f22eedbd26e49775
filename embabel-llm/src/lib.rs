//! The LLM interaction boundary: the narrow collaborator interface the
//! agent process runtime calls out through, never an LLM vendor client
//! itself (those are external collaborators per the runtime's scope).
//!
//! `embabel-core` and `embabel-agent` depend on nothing in this crate --
//! the dependency points the other way, this crate consumes `embabel-core`
//! types (`Blackboard`, `Goal`, `WorldState`) to build requests and
//! goals-as-tools, but an agent process can run with no `LlmOperations`
//! collaborator configured at all.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod interaction;
pub mod operations;
pub mod streaming;
pub mod tools;

pub use interaction::{InteractionId, LlmInteraction, PromptContributor};
pub use operations::{LlmOperations, LlmOperationsError};
pub use streaming::{StreamEvent, StreamingCapabilityCache};
pub use tools::{achievable_goal_tools, GoalToolConfig, ToolCallback, ToolDescriptor};
