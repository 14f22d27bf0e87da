use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::attendance::WriteOutcome;

/// Webhook counters, exposed on `/metrics`.
#[derive(Debug, Default)]
pub struct JoinMetrics {
    received: AtomicU64,
    recorded: AtomicU64,
    already_recorded: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub received: u64,
    pub recorded: u64,
    pub already_recorded: u64,
    pub rejected: u64,
    pub failed: u64,
}

impl JoinMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn webhook_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn join_completed(&self, outcome: &WriteOutcome) {
        match outcome {
            WriteOutcome::Written => self.recorded.fetch_add(1, Ordering::Relaxed),
            WriteOutcome::AlreadyRecorded(_) => {
                self.already_recorded.fetch_add(1, Ordering::Relaxed)
            }
        };
    }

    /// Webhook bodies that never reached the attendance engine.
    pub fn webhook_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn join_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            recorded: self.recorded.load(Ordering::Relaxed),
            already_recorded: self.already_recorded.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

pub fn format_prometheus(snapshot: &MetricsSnapshot, uptime_seconds: u64) -> String {
    format!(
        r#"# HELP attendance_uptime_seconds Number of seconds the service has been running
# TYPE attendance_uptime_seconds gauge
attendance_uptime_seconds {}

# HELP attendance_webhooks_received Total number of webhook deliveries
# TYPE attendance_webhooks_received counter
attendance_webhooks_received {}

# HELP attendance_joins_recorded Joins written to the sheet
# TYPE attendance_joins_recorded counter
attendance_joins_recorded {}

# HELP attendance_joins_already_recorded Joins for a cell that already held a status
# TYPE attendance_joins_already_recorded counter
attendance_joins_already_recorded {}

# HELP attendance_webhooks_rejected Webhooks with a malformed body or unhandled event
# TYPE attendance_webhooks_rejected counter
attendance_webhooks_rejected {}

# HELP attendance_joins_failed Joins that could not be recorded
# TYPE attendance_joins_failed counter
attendance_joins_failed {}
"#,
        uptime_seconds,
        snapshot.received,
        snapshot.recorded,
        snapshot.already_recorded,
        snapshot.rejected,
        snapshot.failed,
    )
}
