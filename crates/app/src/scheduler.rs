//! Step scheduler: runs steps now, or later on detached tasks.
//!
//! Immediate steps (`delay == 0` on the single-action path) run on the
//! caller's task via [`StepScheduler::execute`]. Deferred steps are spawned
//! via [`StepScheduler::schedule`], one tokio task per step. Each task sleeps
//! for its own delay and then runs its job. The caller gets a
//! [`ScheduledAck`] straight away.
//!
//! Deferred steps are fire-and-forget:
//! - at most once, best effort; process shutdown drops pending steps
//! - not cancellable once accepted
//! - no ordering between steps beyond their own delays (a 1s step scheduled
//!   after a 10s step finishes first)
//! - any error is logged and counted, never propagated; a job that panics
//!   counts as failed

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::Instrument;

use intentcp_domain::action::Action;
use intentcp_domain::delay::Delay;
use intentcp_domain::error::IntentError;
use intentcp_domain::id::TaskId;
use intentcp_domain::outcome::{DispatchOutcome, ScheduledAck};
use intentcp_domain::time::{due_at, now};

/// Counters for deferred steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulerStats {
    pub scheduled: u64,
    pub completed: u64,
    pub failed: u64,
}

impl SchedulerStats {
    /// Steps accepted but not finished yet.
    #[must_use]
    pub fn pending(&self) -> u64 {
        self.scheduled
            .saturating_sub(self.completed)
            .saturating_sub(self.failed)
    }
}

#[derive(Debug, Default)]
struct Counters {
    scheduled: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Hands steps to the tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct StepScheduler {
    counters: Arc<Counters>,
}

impl StepScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a job on the caller's task and return its outcome.
    ///
    /// Immediate steps are not counted in [`SchedulerStats`].
    ///
    /// # Errors
    ///
    /// Propagates whatever the job returns.
    pub async fn execute<Fut>(
        &self,
        device: &str,
        action: &Action,
        job: Fut,
    ) -> Result<DispatchOutcome, IntentError>
    where
        Fut: Future<Output = Result<DispatchOutcome, IntentError>>,
    {
        let span = tracing::info_span!("immediate_step", device, action = %action);
        async move {
            let result = job.await;
            match &result {
                Ok(outcome) if outcome.ok => tracing::debug!("step completed"),
                Ok(outcome) => tracing::info!(
                    reason = ?outcome.reason,
                    skipped = outcome.skipped,
                    "step did not succeed"
                ),
                Err(err) => tracing::info!(error = %err, "step rejected"),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Run `job` after `delay` on a detached task.
    ///
    /// The job is built lazily, after the delay has elapsed, so anything it
    /// looks up (such as the device registry) is read at fire time.
    pub fn schedule<F, Fut>(
        &self,
        device: &str,
        action: &Action,
        delay: Delay,
        job: F,
    ) -> ScheduledAck
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<DispatchOutcome, IntentError>> + Send + 'static,
    {
        let task_id = TaskId::new();
        self.counters.scheduled.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            %task_id,
            device,
            action = %action,
            delay = delay.as_secs(),
            due = %due_at(now(), delay),
            "step scheduled"
        );

        let counters = Arc::clone(&self.counters);
        let span = tracing::info_span!(
            "deferred_step",
            %task_id,
            device,
            action = %action,
            delay = delay.as_secs()
        );
        tokio::spawn(
            async move {
                tokio::time::sleep(delay.as_duration()).await;
                let run = tokio::spawn(async move { job().await }.in_current_span());
                match run.await {
                    Ok(Ok(outcome)) if outcome.ok => {
                        counters.completed.fetch_add(1, Ordering::Relaxed);
                        tracing::info!("deferred step completed");
                    }
                    Ok(Ok(outcome)) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(
                            reason = ?outcome.reason,
                            detail = outcome.detail.as_deref().unwrap_or_default(),
                            "deferred step did not succeed"
                        );
                    }
                    Ok(Err(err)) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(error = %err, "deferred step failed");
                    }
                    Err(err) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        tracing::error!(error = %err, "deferred step aborted");
                    }
                }
            }
            .instrument(span),
        );

        ScheduledAck {
            device: device.to_string(),
            action: action.name().to_string(),
            delay,
        }
    }

    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            scheduled: self.counters.scheduled.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }
}
