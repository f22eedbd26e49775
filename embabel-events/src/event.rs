use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Who produced a `Message` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MessageRole {
    Assistant,
    User,
}

/// Severity of a `Logging` event, mirroring `tracing::Level`'s ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// The payload of one event flowing through a process's `OutputChannel`.
///
/// Every variant named in the system overview's event/output channel
/// component is represented; none carry a raw exception or `Debug`-formatted
/// error -- `Failure` and action-status reasons are always a classified,
/// human-readable string (see `embabel-core::error` and `ActionStatus`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EventKind {
    Message { role: MessageRole, content: String },
    Progress { message: String },
    Logging { level: LogLevel, message: String },
    #[cfg(feature = "serde")]
    Content { type_name: String, payload: serde_json::Value },
    #[cfg(not(feature = "serde"))]
    Content { type_name: String, payload: String },
    Completion { goal_name: String },
    Failure { reason: String },
    RagRequest { query: String },
    RagResponse { summary: String },
}

/// One emitted event: a monotonic sequence number (per channel, assigned at
/// emission time so listeners can detect gaps/reordering), a timestamp, and
/// the event payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}
