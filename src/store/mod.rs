//! In-memory status store.
//!
//! The only mutable shared state in the monitor: a concurrent map from
//! endpoint identity to the latest check outcome plus a bounded FIFO
//! history ring. All state is volatile and process-scoped.

mod summary;

pub use summary::*;

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::probe::CheckOutcome;

/// Identity of a checkable endpoint: a site plus an application path,
/// where "/" denotes the site root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EndpointId {
    pub site: String,
    pub path: String,
}

impl EndpointId {
    pub fn new(site: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            path: path.into(),
        }
    }

    /// Identity of a site's root endpoint.
    pub fn site_root(site: impl Into<String>) -> Self {
        Self::new(site, "/")
    }
}

/// The latest known outcome for one endpoint, or one entry of its history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRecord {
    pub responding: bool,
    pub latency_ms: u64,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl StatusRecord {
    pub fn from_outcome(outcome: CheckOutcome, checked_at: DateTime<Utc>) -> Self {
        Self {
            responding: outcome.responding,
            latency_ms: outcome.latency_ms,
            status_code: outcome.status_code,
            error: outcome.error,
            checked_at,
        }
    }
}

struct EndpointState {
    latest: StatusRecord,
    history: VecDeque<StatusRecord>,
}

/// Concurrent per-endpoint status and bounded history.
///
/// Writes for one identity serialize on that identity's map entry; history
/// preserves arrival order under that serialization, and the latest record
/// only moves forward in time (an outcome stamped earlier than the current
/// latest still enters history but does not overwrite it).
pub struct StatusStore {
    endpoints: DashMap<EndpointId, EndpointState>,
    max_history: usize,
}

impl StatusStore {
    /// Create a store retaining at most `max_history` entries per endpoint.
    pub fn new(max_history: usize) -> Self {
        Self {
            endpoints: DashMap::new(),
            max_history: max_history.max(1),
        }
    }

    /// Record a check outcome: overwrite the latest record and append to
    /// history, evicting the oldest entry once the ring is full. Eviction
    /// and append happen under the entry lock as one step.
    pub fn record(&self, id: &EndpointId, outcome: CheckOutcome, checked_at: DateTime<Utc>) {
        let record = StatusRecord::from_outcome(outcome, checked_at);

        self.endpoints
            .entry(id.clone())
            .and_modify(|state| {
                if state.history.len() >= self.max_history {
                    state.history.pop_front();
                }
                state.history.push_back(record.clone());
                if record.checked_at >= state.latest.checked_at {
                    state.latest = record.clone();
                }
            })
            .or_insert_with(|| {
                let mut history = VecDeque::with_capacity(self.max_history.min(16));
                history.push_back(record.clone());
                EndpointState {
                    latest: record,
                    history,
                }
            });
    }

    /// Latest record for an endpoint, if it was ever checked.
    pub fn latest(&self, id: &EndpointId) -> Option<StatusRecord> {
        self.endpoints.get(id).map(|state| state.latest.clone())
    }

    /// Snapshot of an endpoint's history, newest first. Safe to iterate
    /// while writers proceed; empty if the endpoint was never checked.
    pub fn history(&self, id: &EndpointId) -> Vec<StatusRecord> {
        self.endpoints
            .get(id)
            .map(|state| state.history.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    /// Snapshot of the latest record for every known endpoint.
    pub fn latest_all(&self) -> Vec<(EndpointId, StatusRecord)> {
        self.endpoints
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().latest.clone()))
            .collect()
    }

    /// Health summary over an endpoint's trailing window; `None` if the
    /// endpoint was never checked.
    pub fn summary(
        &self,
        id: &EndpointId,
        now: DateTime<Utc>,
        window: chrono::Duration,
    ) -> Option<HealthSummary> {
        if !self.endpoints.contains_key(id) {
            return None;
        }
        let history = self.history(id);
        Some(summarize(&history, now, window))
    }

    /// Number of endpoints ever recorded.
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn outcome_at(responding: bool, latency_ms: u64) -> CheckOutcome {
        if responding {
            CheckOutcome::up(latency_ms, 200)
        } else {
            CheckOutcome::down(latency_ms, Some(500), "HTTP 500 Internal Server Error")
        }
    }

    fn ts(offset_secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() + chrono::Duration::seconds(offset_secs)
    }

    #[test]
    fn test_record_and_latest() {
        let store = StatusStore::new(100);
        let id = EndpointId::site_root("Default Web Site");

        assert!(store.latest(&id).is_none());

        store.record(&id, outcome_at(true, 42), ts(0));
        let latest = store.latest(&id).unwrap();
        assert!(latest.responding);
        assert_eq!(latest.latency_ms, 42);
        assert_eq!(latest.checked_at, ts(0));
    }

    #[test]
    fn test_history_bound_fifo_eviction() {
        let store = StatusStore::new(100);
        let id = EndpointId::site_root("site");

        for i in 0..101 {
            store.record(&id, outcome_at(true, i as u64), ts(i));
        }

        let history = store.history(&id);
        assert_eq!(history.len(), 100);
        // Newest first; the very first record (ts 0) was evicted
        assert_eq!(history[0].checked_at, ts(100));
        assert_eq!(history[99].checked_at, ts(1));
        assert!(!history.iter().any(|r| r.checked_at == ts(0)));
    }

    #[test]
    fn test_history_is_newest_first() {
        let store = StatusStore::new(10);
        let id = EndpointId::new("site", "/api");

        for i in 0..5 {
            store.record(&id, outcome_at(true, i as u64), ts(i));
        }

        let history = store.history(&id);
        assert_eq!(history.len(), 5);
        for pair in history.windows(2) {
            assert!(pair[0].checked_at > pair[1].checked_at);
        }
    }

    #[test]
    fn test_stale_timestamp_does_not_overwrite_latest() {
        let store = StatusStore::new(10);
        let id = EndpointId::site_root("site");

        store.record(&id, outcome_at(true, 10), ts(100));
        store.record(&id, outcome_at(false, 0), ts(50));

        // The older outcome entered history but latest stayed put
        assert_eq!(store.history(&id).len(), 2);
        let latest = store.latest(&id).unwrap();
        assert!(latest.responding);
        assert_eq!(latest.checked_at, ts(100));
    }

    #[test]
    fn test_concurrent_writes_same_identity() {
        let store = Arc::new(StatusStore::new(100));
        let id = EndpointId::site_root("contended");

        let submitted: Vec<u64> = (0..32).collect();
        let mut handles = Vec::new();
        for latency in submitted.clone() {
            let store = store.clone();
            let id = id.clone();
            handles.push(std::thread::spawn(move || {
                store.record(&id, outcome_at(true, latency), ts(latency as i64));
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        // The latest record is exactly one of the submitted outcomes
        let latest = store.latest(&id).unwrap();
        assert!(submitted.contains(&latest.latency_ms));
        // Last-timestamp-wins: the newest stamp ends up as latest
        assert_eq!(latest.checked_at, ts(31));
        assert_eq!(store.history(&id).len(), 32);
    }

    #[test]
    fn test_independent_identities_do_not_interfere() {
        let store = Arc::new(StatusStore::new(100));
        let a = EndpointId::site_root("site-a");
        let b = EndpointId::site_root("site-b");

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            let id = if i % 2 == 0 { a.clone() } else { b.clone() };
            handles.push(std::thread::spawn(move || {
                store.record(&id, outcome_at(true, i as u64), ts(i));
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.history(&a).len(), 8);
        assert_eq!(store.history(&b).len(), 8);
        assert_eq!(store.endpoint_count(), 2);
    }

    #[test]
    fn test_latest_all_snapshot() {
        let store = StatusStore::new(10);
        store.record(&EndpointId::site_root("a"), outcome_at(true, 1), ts(0));
        store.record(&EndpointId::new("a", "/api"), outcome_at(false, 0), ts(1));

        let all = store.latest_all();
        assert_eq!(all.len(), 2);
    }
}
