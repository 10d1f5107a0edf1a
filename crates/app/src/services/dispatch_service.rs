//! Dispatch service: the single entry point for device actions.
//!
//! Flow per step: registry lookup → action resolver → backend client.
//! Resolution happens when the step *runs*: a deferred step looks its
//! device up after its delay, so registry edits made in the meantime apply.

use std::sync::Arc;

use intentcp_domain::action::{Action, ActionRequest, Command, CommandCode};
use intentcp_domain::delay::Delay;
use intentcp_domain::device::DeviceDescriptor;
use intentcp_domain::error::{IntentError, NotFoundError, ResolveError};
use intentcp_domain::outcome::{
    DispatchOutcome, DispatchReason, Dispatched, ScheduledAck, SequenceAck,
};
use intentcp_domain::resolver::resolve;
use intentcp_domain::sequence::Sequence;

use crate::ports::{BackendClient, DeviceRegistry};
use crate::scheduler::{SchedulerStats, StepScheduler};

/// Resolves and executes one step against the live registry.
pub(crate) struct Executor<R, B> {
    pub(crate) registry: Arc<R>,
    backend: Arc<B>,
}

impl<R, B> Clone for Executor<R, B> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<R, B> Executor<R, B>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    /// Look up `device` and run `action`. Unknown devices are skipped.
    async fn execute(&self, device: &str, action: &Action) -> Result<DispatchOutcome, IntentError> {
        match self.registry.lookup(device).await {
            Some(descriptor) => self.run(device, &descriptor, action, None).await,
            None => Ok(DispatchOutcome::unknown_device(device, action)),
        }
    }

    /// Resolve and send. Resolution and transport failures become a failed
    /// outcome; validation failures are returned as errors.
    pub(crate) async fn run(
        &self,
        device: &str,
        descriptor: &DeviceDescriptor,
        action: &Action,
        code: Option<CommandCode>,
    ) -> Result<DispatchOutcome, IntentError> {
        let resolved = match resolve(descriptor, action) {
            Ok(resolved) => resolved,
            Err(ResolveError::Validation(err)) => return Err(err.into()),
            Err(err) => {
                return Ok(DispatchOutcome::failed(
                    device,
                    action,
                    DispatchReason::from(&err),
                    err.to_string(),
                ));
            }
        };
        let resolved = match code {
            Some(code) => resolved.with_code(code),
            None => resolved,
        };

        let response = match &resolved.command {
            Command::Status => self.backend.get_status(&resolved.target_id).await,
            command => {
                let (code, value) = command
                    .code_and_value()
                    .ok_or(ResolveError::MissingTarget("command"))?;
                tracing::debug!(target_id = %resolved.target_id, %code, %value, "sending command");
                self.backend
                    .send_command(&resolved.target_id, code.as_str(), value)
                    .await
            }
        };

        Ok(match response {
            Ok(payload) => DispatchOutcome::success(device, action, payload),
            Err(err) => {
                tracing::warn!(device, action = %action, error = %err.detail(), "backend call failed");
                DispatchOutcome::failed(device, action, DispatchReason::from(&err), err.detail())
            }
        })
    }
}

/// Application service combining parsing, resolution and scheduling.
pub struct DispatchService<R, B> {
    pub(crate) executor: Executor<R, B>,
    scheduler: StepScheduler,
}

impl<R, B> DispatchService<R, B>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    /// Create a new service from a registry and a backend client.
    pub fn new(registry: R, backend: B) -> Self {
        Self::from_arcs(Arc::new(registry), Arc::new(backend))
    }

    /// Create a new service from shared handles.
    ///
    /// Use this when the registry or backend is also used elsewhere.
    pub fn from_arcs(registry: Arc<R>, backend: Arc<B>) -> Self {
        Self {
            executor: Executor { registry, backend },
            scheduler: StepScheduler::new(),
        }
    }

    /// Dispatch one action, now or after its delay.
    ///
    /// With no delay the outcome is returned directly; an unknown device is
    /// a skipped outcome, not an error. With a delay the step is handed to
    /// the scheduler and only an acknowledgement is returned.
    ///
    /// # Errors
    ///
    /// Returns [`IntentError::Validation`] for an action the device cannot
    /// accept (e.g. brightness without support). Deferred steps never error.
    #[tracing::instrument(skip(self, request), fields(device = %request.device, action = %request.action, delay = request.delay.as_secs()))]
    pub async fn dispatch_single(&self, request: ActionRequest) -> Result<Dispatched, IntentError> {
        let ActionRequest {
            device,
            action,
            delay,
        } = request;

        if delay.is_zero() {
            let outcome = self
                .scheduler
                .execute(&device, &action, self.executor.execute(&device, &action))
                .await?;
            return Ok(Dispatched::Completed(outcome));
        }
        Ok(Dispatched::Scheduled(self.defer(device, action, delay)))
    }

    /// Parse a step list and schedule every step independently.
    ///
    /// All steps are handed off at once, each with its own delay counted from
    /// now; no step waits for another. Acknowledgements keep parse order.
    ///
    /// # Errors
    ///
    /// Returns [`IntentError::Parse`] for malformed text. Nothing is scheduled
    /// in that case.
    #[tracing::instrument(skip(self))]
    pub fn dispatch_sequence(&self, text: &str) -> Result<SequenceAck, IntentError> {
        let sequence = Sequence::parse(text)?;
        tracing::info!(steps = sequence.len(), "sequence accepted");
        let acks = sequence
            .into_iter()
            .map(|step| self.defer(step.device, step.action, step.delay))
            .collect();
        Ok(SequenceAck::new(acks))
    }

    /// Run an action immediately, treating an unknown device as an error.
    ///
    /// Used by the per-device legacy endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`IntentError::NotFound`] when the device is not registered,
    /// or [`IntentError::Validation`] as for [`Self::dispatch_single`].
    #[tracing::instrument(skip(self))]
    pub async fn execute_strict(
        &self,
        device: &str,
        action: &Action,
    ) -> Result<DispatchOutcome, IntentError> {
        let descriptor = self.require_device(device).await?;
        self.executor.run(device, &descriptor, action, None).await
    }

    /// Look up a registered device.
    ///
    /// # Errors
    ///
    /// Returns [`IntentError::NotFound`] when the device is not registered.
    pub async fn require_device(&self, device: &str) -> Result<DeviceDescriptor, IntentError> {
        self.executor.registry.lookup(device).await.ok_or_else(|| {
            NotFoundError {
                entity: "device",
                id: device.to_string(),
            }
            .into()
        })
    }

    /// Read status straight from a backend target id, bypassing the registry.
    ///
    /// # Errors
    ///
    /// Returns the backend's transport error.
    pub async fn probe_target(&self, target_id: &str) -> Result<serde_json::Value, IntentError> {
        self.executor.backend.get_status(target_id).await
    }

    /// Number of devices currently registered.
    pub async fn device_count(&self) -> usize {
        self.executor.registry.list().await.len()
    }

    #[must_use]
    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    fn defer(&self, device: String, action: Action, delay: Delay) -> ScheduledAck {
        let executor = self.executor.clone();
        let (job_device, job_action) = (device.clone(), action.clone());
        self.scheduler.schedule(&device, &action, delay, move || async move {
            executor.execute(&job_device, &job_action).await
        })
    }
}
