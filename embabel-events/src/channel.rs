use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::broadcast;

use crate::event::{Event, EventKind, LogLevel};

/// Default broadcast buffer: a slow listener can fall behind by this many
/// events before `tokio::sync::broadcast` starts dropping the oldest ones
/// for it (surfaced to that listener as `RecvError::Lagged`).
pub const DEFAULT_CAPACITY: usize = 1024;

/// Single-writer, many-listener channel attached to an agent process.
///
/// Every event emitted on one `OutputChannel` is seen by every subscriber in
/// the order it was emitted (the channel is backed by a single
/// `tokio::sync::broadcast` sender); there is no cross-channel ordering
/// guarantee beyond the causal happens-before of an action's completion
/// preceding the events it emits.
pub struct OutputChannel {
    sender: broadcast::Sender<Event>,
    next_sequence: AtomicU64,
}

impl OutputChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            next_sequence: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Emit `kind`, stamping it with the next sequence number and the
    /// current time. No subscribers is not an error -- an unobserved event
    /// is simply dropped, the same way a logger with no configured sink
    /// would drop a log line.
    pub fn emit(&self, kind: EventKind) {
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let event = Event {
            sequence,
            timestamp: Utc::now(),
            kind,
        };
        trace_event(&event);
        let _ = self.sender.send(event);
    }

    pub fn progress(&self, message: impl Into<String>) {
        self.emit(EventKind::Progress { message: message.into() });
    }

    pub fn logging(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(EventKind::Logging {
            level,
            message: message.into(),
        });
    }

    pub fn completion(&self, goal_name: impl Into<String>) {
        self.emit(EventKind::Completion {
            goal_name: goal_name.into(),
        });
    }

    pub fn failure(&self, reason: impl Into<String>) {
        self.emit(EventKind::Failure { reason: reason.into() });
    }
}

impl Default for OutputChannel {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

fn trace_event(event: &Event) {
    match &event.kind {
        EventKind::Failure { reason } => tracing::warn!(sequence = event.sequence, %reason, "agent process failure"),
        EventKind::Logging { level, message } => match level {
            LogLevel::Error => tracing::error!(sequence = event.sequence, %message),
            LogLevel::Warn => tracing::warn!(sequence = event.sequence, %message),
            LogLevel::Info => tracing::info!(sequence = event.sequence, %message),
            LogLevel::Debug => tracing::debug!(sequence = event.sequence, %message),
            LogLevel::Trace => tracing::trace!(sequence = event.sequence, %message),
        },
        _ => tracing::debug!(sequence = event.sequence, "event emitted"),
    }
}
