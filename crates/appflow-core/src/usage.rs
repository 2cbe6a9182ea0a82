//! App usage-time statistics
//!
//! The usage time of a record is the gap to the next record of the same
//! session. The last record of a session has no known end, so it counts
//! as an event but contributes no time.

use crate::constants::USAGE_HOURS_COUNT;
use crate::event::EventRecord;
use crate::session::split_sessions;
use chrono::{Duration, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Usage statistics for a single app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppUsage {
    pub app: String,
    /// Records carrying this app
    pub event_count: u64,
    /// Records with a known usage time
    pub timed_count: u64,
    /// Total usage time in milliseconds
    pub total_ms: i64,
    /// Events per UTC hour of day
    pub hourly: [u64; USAGE_HOURS_COUNT],
}

impl AppUsage {
    fn new(app: &str) -> Self {
        Self {
            app: app.to_string(),
            event_count: 0,
            timed_count: 0,
            total_ms: 0,
            hourly: [0; USAGE_HOURS_COUNT],
        }
    }

    /// Total usage time in seconds
    pub fn total_secs(&self) -> f64 {
        self.total_ms as f64 / 1000.0
    }

    /// Mean usage time in seconds, None when no record had a known end
    pub fn mean_secs(&self) -> Option<f64> {
        if self.timed_count == 0 {
            None
        } else {
            Some(self.total_secs() / self.timed_count as f64)
        }
    }
}

/// Usage statistics for every app in a log
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageStats {
    /// Apps in first-seen order
    apps: Vec<AppUsage>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl UsageStats {
    /// Compute statistics from ordered events
    pub fn compute(events: &[EventRecord], break_span: Duration) -> Self {
        let mut stats = Self::default();

        for session in split_sessions(events, break_span) {
            for (i, record) in session.iter().enumerate() {
                let slot = stats.slot(&record.app);
                let usage = &mut stats.apps[slot];
                usage.event_count += 1;
                usage.hourly[record.timestamp.hour() as usize] += 1;

                if let Some(next) = session.get(i + 1) {
                    usage.timed_count += 1;
                    usage.total_ms += (next.timestamp - record.timestamp).num_milliseconds();
                }
            }
        }

        tracing::debug!(apps = stats.apps.len(), "Usage statistics computed");
        stats
    }

    fn slot(&mut self, app: &str) -> usize {
        if let Some(&slot) = self.index.get(app) {
            return slot;
        }
        let slot = self.apps.len();
        self.apps.push(AppUsage::new(app));
        self.index.insert(app.to_string(), slot);
        slot
    }

    /// Statistics for one app
    pub fn get(&self, app: &str) -> Option<&AppUsage> {
        self.index.get(app).map(|&slot| &self.apps[slot])
    }

    /// All apps in first-seen order
    pub fn apps(&self) -> &[AppUsage] {
        &self.apps
    }

    /// Apps sorted by total usage time, longest first
    ///
    /// `top` keeps only the first `n` entries.
    pub fn by_total_time(&self, top: Option<usize>) -> Vec<&AppUsage> {
        let mut apps: Vec<&AppUsage> = self.apps.iter().collect();
        apps.sort_by(|a, b| b.total_ms.cmp(&a.total_ms));
        if let Some(n) = top {
            apps.truncate(n);
        }
        apps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    // 2020-09-13T12:26:40Z
    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_600_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_usage_time_is_gap_to_next_record() {
        let events = vec![
            EventRecord::new("mail", at(0)),
            EventRecord::new("maps", at(30)),
            EventRecord::new("mail", at(40)),
            EventRecord::new("maps", at(100)),
        ];
        let stats = UsageStats::compute(&events, Duration::seconds(120));

        let mail = stats.get("mail").unwrap();
        assert_eq!(mail.event_count, 2);
        assert_eq!(mail.total_ms, 90_000);
        assert_eq!(mail.total_secs(), 90.0);
        assert_eq!(mail.mean_secs(), Some(45.0));

        let maps = stats.get("maps").unwrap();
        assert_eq!(maps.timed_count, 1);
        assert_eq!(maps.total_ms, 10_000);
    }

    #[test]
    fn test_sub_second_gaps_keep_their_usage_time() {
        let base = at(0);
        let events = vec![
            EventRecord::new("a", base),
            EventRecord::new("b", base + Duration::milliseconds(900)),
            EventRecord::new("a", base + Duration::milliseconds(1800)),
            EventRecord::new("c", base + Duration::milliseconds(2050)),
        ];
        let stats = UsageStats::compute(&events, Duration::seconds(10));

        let a = stats.get("a").unwrap();
        assert_eq!(a.timed_count, 2);
        assert_eq!(a.total_ms, 1150);
        assert!((a.mean_secs().unwrap() - 0.575).abs() < 1e-12);

        let b = stats.get("b").unwrap();
        assert_eq!(b.total_ms, 900);

        let ranked: Vec<_> = stats
            .by_total_time(None)
            .iter()
            .map(|u| u.app.as_str())
            .collect();
        assert_eq!(ranked, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_session_end_has_no_usage_time() {
        let events = vec![
            EventRecord::new("mail", at(0)),
            EventRecord::new("maps", at(1000)),
        ];
        let stats = UsageStats::compute(&events, Duration::seconds(10));
        assert_eq!(stats.get("mail").unwrap().mean_secs(), None);
        assert_eq!(stats.get("maps").unwrap().event_count, 1);
    }

    #[test]
    fn test_hourly_histogram() {
        let events = vec![
            EventRecord::new("mail", at(0)),
            EventRecord::new("mail", at(3600)),
        ];
        let stats = UsageStats::compute(&events, Duration::seconds(10));
        let mail = stats.get("mail").unwrap();
        assert_eq!(mail.hourly[12], 1);
        assert_eq!(mail.hourly[13], 1);
        assert_eq!(mail.hourly.iter().sum::<u64>(), 2);
    }

    #[test]
    fn test_by_total_time() {
        let events = vec![
            EventRecord::new("a", at(0)),
            EventRecord::new("b", at(5)),
            EventRecord::new("c", at(50)),
            EventRecord::new("a", at(51)),
        ];
        let stats = UsageStats::compute(&events, Duration::seconds(60));
        let ranked: Vec<_> = stats
            .by_total_time(Some(2))
            .iter()
            .map(|u| u.app.as_str())
            .collect();
        assert_eq!(ranked, vec!["b", "a"]);
    }
}
