//! Poll specification for long-running platform jobs

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How to read a job's status and when to give up
///
/// `status_path` is a dotted path into the fetched document; numeric
/// segments index arrays (`items.0.status`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSpec {
    pub status_path: String,
    pub success_value: String,
    pub wait_value: String,
    pub failure_value: String,
    pub initial_wait: Duration,
    pub poll_interval: Duration,
    pub max_tries: u32,
}

impl PollSpec {
    /// Defaults: 30s initial wait, 15s interval, 50 tries.
    pub fn new(
        status_path: impl Into<String>,
        success_value: impl Into<String>,
        wait_value: impl Into<String>,
        failure_value: impl Into<String>,
    ) -> Self {
        Self {
            status_path: status_path.into(),
            success_value: success_value.into(),
            wait_value: wait_value.into(),
            failure_value: failure_value.into(),
            initial_wait: Duration::from_secs(30),
            poll_interval: Duration::from_secs(15),
            max_tries: 50,
        }
    }

    pub fn initial_wait(mut self, wait: Duration) -> Self {
        self.initial_wait = wait;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn max_tries(mut self, tries: u32) -> Self {
        self.max_tries = tries;
        self
    }

    /// Flow runs report `items.0.metrics.statusSummary.status`.
    pub fn flow_run() -> Self {
        Self::new("items.0.metrics.statusSummary.status", "success", "inProgress", "failed")
    }
}
