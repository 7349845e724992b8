//! Job endpoints and job polling.

use tokio::time::{Instant, sleep};
use tracing::{debug, instrument, trace};

use cloudcms_core::error::JobError;
use cloudcms_core::{JobSource, JobState, JsonObject, QueryParams, Result, WaitPolicy};

use crate::{CloudCmsSession, paths};

impl CloudCmsSession {
    /// Read a job document.
    #[instrument(skip(self))]
    pub async fn read_job(&self, job_id: &str) -> Result<JsonObject> {
        self.get(&paths::job(job_id), QueryParams::new()).await
    }

    /// Poll a job until it finishes. See [`wait_for_job`].
    pub async fn wait_for_job(&self, job_id: &str, policy: &WaitPolicy) -> Result<JsonObject> {
        wait_for_job(self, job_id, policy).await
    }
}

/// Poll `job_id` until it is `FINISHED`, returning the final job document.
///
/// An `ERROR` state fails with [`JobError::Failed`]. Any other state keeps
/// polling on `policy`'s schedule; if the next sleep would overrun the
/// policy's timeout the wait fails with [`JobError::Timeout`]. Dropping the
/// future cancels the wait.
#[instrument(skip(source, policy))]
pub async fn wait_for_job<S>(source: &S, job_id: &str, policy: &WaitPolicy) -> Result<JsonObject>
where
    S: JobSource + ?Sized,
{
    let started = Instant::now();
    let mut interval = policy.first_interval();
    let mut polls = 0u32;

    loop {
        let job = source.read_job(job_id).await?;
        polls += 1;

        match JobState::from_job(&job) {
            JobState::Finished => {
                debug!(polls, "job finished");
                return Ok(job);
            }
            JobState::Error => {
                return Err(JobError::Failed {
                    job_id: job_id.to_string(),
                    message: failure_message(&job),
                }
                .into());
            }
            state => trace!(?state, polls, "job not finished"),
        }

        if let Some(timeout) = policy.timeout {
            let elapsed = started.elapsed();
            if elapsed + interval > timeout {
                return Err(JobError::Timeout {
                    job_id: job_id.to_string(),
                    elapsed,
                }
                .into());
            }
        }

        sleep(interval).await;
        interval = policy.next_interval(interval);
    }
}

fn failure_message(job: &JsonObject) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| job.get_str(key))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use cloudcms_core::Error;
    use serde_json::json;

    use super::*;

    /// Replays job states in order, repeating the last one.
    struct Scripted {
        states: Mutex<VecDeque<serde_json::Value>>,
        reads: Mutex<u32>,
    }

    impl Scripted {
        fn new(states: Vec<serde_json::Value>) -> Self {
            Self {
                states: Mutex::new(states.into()),
                reads: Mutex::new(0),
            }
        }

        fn reads(&self) -> u32 {
            *self.reads.lock().unwrap()
        }
    }

    #[async_trait]
    impl JobSource for Scripted {
        async fn read_job(&self, _job_id: &str) -> Result<JsonObject> {
            *self.reads.lock().unwrap() += 1;
            let mut states = self.states.lock().unwrap();
            let next = if states.len() > 1 {
                states.pop_front().unwrap()
            } else {
                states.front().cloned().unwrap()
            };
            Ok(JsonObject::try_from(next).unwrap())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn finishes_after_running_polls() {
        let source = Scripted::new(vec![
            json!({"_doc": "job1", "state": "RUNNING"}),
            json!({"_doc": "job1", "state": "RUNNING"}),
            json!({"_doc": "job1", "state": "WAITING"}),
            json!({"_doc": "job1", "state": "FINISHED"}),
        ]);

        let started = Instant::now();
        let job = wait_for_job(&source, "job1", &WaitPolicy::default())
            .await
            .unwrap();

        assert_eq!(job.get_str("state"), Some("FINISHED"));
        assert_eq!(source.reads(), 4);
        // 1s + 2s + 4s of backoff.
        assert!(started.elapsed() >= Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn error_state_fails_with_message() {
        let source = Scripted::new(vec![
            json!({"state": "RUNNING"}),
            json!({"state": "ERROR", "message": "disk full"}),
        ]);

        let err = wait_for_job(&source, "job2", &WaitPolicy::fixed(Duration::from_secs(1)))
            .await
            .unwrap_err();

        match err {
            Error::Job(JobError::Failed { job_id, message }) => {
                assert_eq!(job_id, "job2");
                assert_eq!(message.as_deref(), Some("disk full"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_distinct_from_failure() {
        let source = Scripted::new(vec![json!({"state": "RUNNING"})]);
        let policy = WaitPolicy::fixed(Duration::from_secs(1)).with_timeout(Duration::from_millis(5500));

        let err = wait_for_job(&source, "job3", &policy).await.unwrap_err();

        assert!(matches!(err, Error::Job(JobError::Timeout { .. })));
        assert_eq!(source.reads(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_state_keeps_polling() {
        let source = Scripted::new(vec![json!({}), json!({"state": "FINISHED"})]);

        wait_for_job(&source, "job4", &WaitPolicy::fixed(Duration::from_millis(10)))
            .await
            .unwrap();
        assert_eq!(source.reads(), 2);
    }
}
