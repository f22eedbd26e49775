//! Single-writer, many-listener event/output channel attached to an agent
//! process, and the typed event payloads it carries.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod channel;
pub mod event;

pub use channel::{OutputChannel, DEFAULT_CAPACITY};
pub use event::{Event, EventKind, LogLevel, MessageRole};
