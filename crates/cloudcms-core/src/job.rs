//! Server-side job states and the polling policy used to wait for them.

use std::time::Duration;

use crate::json::JsonObject;

/// State of a server-side job, as reported in the job document's `state`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Running,
    Finished,
    Error,
    /// Any other state (e.g. `WAITING`); treated as not yet terminal.
    Other(String),
}

impl JobState {
    /// Read the state of a job document. A missing state is not terminal.
    pub fn from_job(job: &JsonObject) -> Self {
        match job.get_str("state") {
            Some("RUNNING") => JobState::Running,
            Some("FINISHED") => JobState::Finished,
            Some("ERROR") => JobState::Error,
            Some(other) => JobState::Other(other.to_string()),
            None => JobState::Other(String::new()),
        }
    }

    /// Returns true for `FINISHED` and `ERROR`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Finished | JobState::Error)
    }
}

/// How to poll a job until it reaches a terminal state.
///
/// The first poll happens immediately. After each non-terminal poll the
/// waiter sleeps for the current interval, then multiplies it by
/// `multiplier`, capped at `max_interval`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitPolicy {
    pub initial_interval: Duration,
    pub multiplier: u32,
    pub max_interval: Duration,
    /// Give up with a timeout error once this much time would be exceeded.
    pub timeout: Option<Duration>,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            multiplier: 2,
            max_interval: Duration::from_secs(30),
            timeout: None,
        }
    }
}

impl WaitPolicy {
    /// Poll at a constant interval, with no timeout.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            initial_interval: interval,
            multiplier: 1,
            max_interval: interval,
            timeout: None,
        }
    }

    /// Set the overall timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The interval to sleep after one that lasted `current`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        current
            .saturating_mul(self.multiplier.max(1))
            .min(self.max_interval)
    }

    /// The first sleep, already capped.
    pub fn first_interval(&self) -> Duration {
        self.initial_interval.min(self.max_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn job_state_from_document() {
        let job = |v| JsonObject::try_from(v).unwrap();
        assert_eq!(JobState::from_job(&job(json!({"state": "FINISHED"}))), JobState::Finished);
        assert_eq!(JobState::from_job(&job(json!({"state": "ERROR"}))), JobState::Error);
        assert_eq!(JobState::from_job(&job(json!({"state": "RUNNING"}))), JobState::Running);
        assert_eq!(
            JobState::from_job(&job(json!({"state": "WAITING"}))),
            JobState::Other("WAITING".to_string())
        );
        assert!(!JobState::from_job(&job(json!({}))).is_terminal());
    }

    #[test]
    fn default_policy_backs_off_to_cap() {
        let policy = WaitPolicy::default();
        let mut interval = policy.first_interval();
        let mut seen = vec![interval.as_secs()];
        for _ in 0..6 {
            interval = policy.next_interval(interval);
            seen.push(interval.as_secs());
        }
        assert_eq!(seen, vec![1, 2, 4, 8, 16, 30, 30]);
    }

    #[test]
    fn fixed_policy_never_grows() {
        let policy = WaitPolicy::fixed(Duration::from_millis(250));
        let next = policy.next_interval(policy.first_interval());
        assert_eq!(next, Duration::from_millis(250));
        assert_eq!(policy.timeout, None);
    }

    #[test]
    fn zero_multiplier_is_treated_as_constant() {
        let policy = WaitPolicy {
            multiplier: 0,
            ..WaitPolicy::default()
        };
        assert_eq!(policy.next_interval(Duration::from_secs(3)), Duration::from_secs(3));
    }
}
