//! Status polling for long-running platform jobs
//!
//! The poller waits once up front, then fetches a fresh status document per
//! tick and reads the value at `PollSpec::status_path`. Success returns the
//! document, the wait value sleeps and retries, the failure value stops with
//! [`AepError::ProcessFailed`], and anything else stops with
//! [`AepError::UnexpectedStatus`].

use std::time::Duration;

use aep_domain::utils::json_path::{lookup, scalar_to_string};
use aep_domain::{AepError, HeaderMapping, PollSpec, Result};
use serde_json::Value;
use tracing::{info, Span};

use crate::ports::PlatformApi;

const MISSING_STATUS: &str = "<missing>";

/// Blocking pause between polls
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Polls a status document until it reaches a terminal value
#[derive(Debug, Clone)]
pub struct StatusPoller<S = ThreadSleeper> {
    sleeper: S,
    span: Span,
}

impl StatusPoller<ThreadSleeper> {
    pub fn new() -> Self {
        Self::with_sleeper(ThreadSleeper)
    }
}

impl Default for StatusPoller<ThreadSleeper> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sleeper> StatusPoller<S> {
    pub fn with_sleeper(sleeper: S) -> Self {
        Self { sleeper, span: Span::none() }
    }

    /// Log poll progress inside `span`.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Poll with a caller-supplied fetch.
    ///
    /// `fetch` is called at most `spec.max_tries` times. No sleep follows
    /// the final wait observation; the poll ends with
    /// [`AepError::PollingTimeout`] instead.
    pub fn poll<F>(&self, spec: &PollSpec, mut fetch: F) -> Result<Value>
    where
        F: FnMut() -> Result<Value>,
    {
        let _entered = self.span.enter();

        info!(seconds = spec.initial_wait.as_secs_f64(), "waiting before initial poll");
        self.sleeper.sleep(spec.initial_wait);

        let mut last_status = MISSING_STATUS.to_string();
        for attempt in 0..spec.max_tries {
            let document = fetch()?;
            let status = lookup(&document, &spec.status_path).and_then(scalar_to_string);
            info!(status = status.as_deref().unwrap_or(MISSING_STATUS), attempt, "polled status");

            match status {
                Some(s) if s == spec.success_value => {
                    info!("process has finished successfully");
                    return Ok(document);
                }
                Some(s) if s == spec.wait_value => {
                    last_status = s;
                    if attempt + 1 < spec.max_tries {
                        info!(seconds = spec.poll_interval.as_secs_f64(), "waiting before next poll");
                        self.sleeper.sleep(spec.poll_interval);
                    }
                }
                Some(s) if s == spec.failure_value => {
                    return Err(AepError::ProcessFailed { status: s });
                }
                other => {
                    return Err(AepError::UnexpectedStatus {
                        status: other.unwrap_or_else(|| MISSING_STATUS.to_string()),
                        success: spec.success_value.clone(),
                        wait: spec.wait_value.clone(),
                        failure: spec.failure_value.clone(),
                    });
                }
            }
        }

        Err(AepError::PollingTimeout { attempts: spec.max_tries, last_status })
    }

    /// Poll an absolute URL through the platform session.
    pub fn poll_url(
        &self,
        api: &dyn PlatformApi,
        url: &str,
        headers: &HeaderMapping,
        spec: &PollSpec,
    ) -> Result<Value> {
        self.poll(spec, || api.get_url(url, headers).map(|response| response.body))
    }
}
