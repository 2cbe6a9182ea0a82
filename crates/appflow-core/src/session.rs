//! Session splitting
//!
//! A session is a maximal run of records whose successive gaps never
//! exceed the break span. Transitions are only inferred inside a session.

use crate::event::EventRecord;
use chrono::Duration;

/// Check whether the gap between two records starts a new session
///
/// A gap strictly greater than `break_span` breaks the session. A negative
/// gap means the records are out of order and also breaks it.
pub fn is_session_break(previous: &EventRecord, next: &EventRecord, break_span: Duration) -> bool {
    let gap = next.timestamp - previous.timestamp;
    gap < Duration::zero() || gap > break_span
}

/// Split an ordered event sequence into sessions
///
/// Every record lands in exactly one session and sessions are never empty.
pub fn split_sessions(events: &[EventRecord], break_span: Duration) -> Vec<&[EventRecord]> {
    let mut sessions = Vec::new();
    let mut start = 0;

    for i in 1..events.len() {
        if is_session_break(&events[i - 1], &events[i], break_span) {
            sessions.push(&events[start..i]);
            start = i;
        }
    }
    if start < events.len() {
        sessions.push(&events[start..]);
    }

    debug_assert_eq!(
        sessions.iter().map(|s| s.len()).sum::<usize>(),
        events.len()
    );
    sessions
}
