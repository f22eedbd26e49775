#![cfg(feature = "serde")]

use chrono::Utc;
use embabel_events::{Event, EventKind, LogLevel};

#[test]
fn logging_event_round_trips_through_json() {
    let event = Event {
        sequence: 7,
        timestamp: Utc::now(),
        kind: EventKind::Logging {
            level: LogLevel::Warn,
            message: "rate limited, backing off".to_string(),
        },
    };

    let json = serde_json::to_string(&event).unwrap();
    let restored: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, event);
}
