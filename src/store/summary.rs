//! Health summary derivation.
//!
//! Pure functions over a history slice; the caller supplies `now` so the
//! windowing is testable without touching the system clock.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::StatusRecord;

/// Maximum failing entries carried in a summary.
pub const MAX_RECENT_FAILURES: usize = 10;

/// Derived uptime and latency statistics for one endpoint's trailing window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    /// Successful checks over total checks in the window, as a percentage.
    /// Zero when the window holds no checks.
    pub uptime_percent: f64,
    pub total_checks: usize,
    pub success_count: usize,
    pub failure_count: usize,
    /// Average latency over successful checks only; zero when none succeeded.
    pub avg_latency_ms: f64,
    /// Timestamp of the most recent failing check, if any.
    pub last_failure: Option<DateTime<Utc>>,
    /// Up to ten most recent failing checks, newest first.
    pub recent_failures: Vec<StatusRecord>,
}

/// Summarize the history entries within the trailing `window` ending at `now`.
///
/// Entries outside the window are ignored. The input is not mutated and may
/// be in any order.
pub fn summarize(history: &[StatusRecord], now: DateTime<Utc>, window: Duration) -> HealthSummary {
    let cutoff = now - window;

    let mut in_window: Vec<&StatusRecord> = history
        .iter()
        .filter(|r| r.checked_at > cutoff && r.checked_at <= now)
        .collect();
    in_window.sort_by(|a, b| b.checked_at.cmp(&a.checked_at));

    let total_checks = in_window.len();
    let success_count = in_window.iter().filter(|r| r.responding).count();
    let failure_count = total_checks - success_count;

    let uptime_percent = if total_checks > 0 {
        success_count as f64 / total_checks as f64 * 100.0
    } else {
        0.0
    };

    let avg_latency_ms = if success_count > 0 {
        let sum: u64 = in_window
            .iter()
            .filter(|r| r.responding)
            .map(|r| r.latency_ms)
            .sum();
        sum as f64 / success_count as f64
    } else {
        0.0
    };

    let recent_failures: Vec<StatusRecord> = in_window
        .iter()
        .filter(|r| !r.responding)
        .take(MAX_RECENT_FAILURES)
        .map(|r| (*r).clone())
        .collect();

    let last_failure = recent_failures.first().map(|r| r.checked_at);

    HealthSummary {
        uptime_percent,
        total_checks,
        success_count,
        failure_count,
        avg_latency_ms,
        last_failure,
        recent_failures,
    }
}
