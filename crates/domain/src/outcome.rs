//! Outcomes reported back to callers.
//!
//! An immediate dispatch yields a [`DispatchOutcome`]. A deferred dispatch
//! yields only a [`ScheduledAck`]; its eventual outcome is logged and then
//! dropped, since nobody is left waiting for it.

use serde::Serialize;

use crate::action::Action;
use crate::delay::Delay;
use crate::error::{IntentError, ResolveError};

/// Why a dispatch did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchReason {
    #[default]
    None,
    UnknownDevice,
    UnsupportedAction,
    MissingTarget,
    ValidationError,
    TransportError,
}

impl DispatchReason {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<&ResolveError> for DispatchReason {
    fn from(err: &ResolveError) -> Self {
        match err {
            ResolveError::UnsupportedAction(_) => Self::UnsupportedAction,
            ResolveError::MissingTarget(_) => Self::MissingTarget,
            ResolveError::Validation(_) => Self::ValidationError,
        }
    }
}

impl From<&IntentError> for DispatchReason {
    fn from(err: &IntentError) -> Self {
        match err {
            IntentError::Resolve(inner) => inner.into(),
            IntentError::NotFound(_) => Self::UnknownDevice,
            IntentError::Validation(_) | IntentError::Parse(_) => Self::ValidationError,
            IntentError::Transport(_) => Self::TransportError,
        }
    }
}

/// Result of executing one action against one device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
    #[serde(skip_serializing_if = "DispatchReason::is_none")]
    pub reason: DispatchReason,
    pub device: String,
    pub action: String,
    #[serde(rename = "backend_response", skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DispatchOutcome {
    /// The backend accepted the call.
    #[must_use]
    pub fn success(device: &str, action: &Action, payload: serde_json::Value) -> Self {
        Self {
            ok: true,
            skipped: false,
            reason: DispatchReason::None,
            device: device.to_string(),
            action: action.name().to_string(),
            payload: Some(payload),
            detail: None,
        }
    }

    /// The device is not in the registry; nothing was sent.
    #[must_use]
    pub fn unknown_device(device: &str, action: &Action) -> Self {
        Self {
            ok: false,
            skipped: true,
            reason: DispatchReason::UnknownDevice,
            device: device.to_string(),
            action: action.name().to_string(),
            payload: None,
            detail: None,
        }
    }

    /// The step was not attempted because the device cannot take it.
    #[must_use]
    pub fn skipped(
        device: &str,
        action: &Action,
        reason: DispatchReason,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            ok: false,
            skipped: true,
            reason,
            device: device.to_string(),
            action: action.name().to_string(),
            payload: None,
            detail: Some(detail.into()),
        }
    }

    /// The device could not be driven; `skipped` stays false.
    #[must_use]
    pub fn failed(
        device: &str,
        action: &Action,
        reason: DispatchReason,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            ok: false,
            skipped: false,
            reason,
            device: device.to_string(),
            action: action.name().to_string(),
            payload: None,
            detail: Some(detail.into()),
        }
    }
}

/// Acknowledgement that a step was handed to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledAck {
    pub device: String,
    pub action: String,
    pub delay: Delay,
}

/// One entry of a sequence acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepAck {
    pub index: usize,
    #[serde(flatten)]
    pub ack: ScheduledAck,
}

/// Acknowledgement for a whole sequence, in parse order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceAck {
    pub count: usize,
    pub steps: Vec<StepAck>,
}

impl SequenceAck {
    #[must_use]
    pub fn new(acks: Vec<ScheduledAck>) -> Self {
        let steps: Vec<StepAck> = acks
            .into_iter()
            .enumerate()
            .map(|(index, ack)| StepAck { index, ack })
            .collect();
        Self {
            count: steps.len(),
            steps,
        }
    }
}

/// Either an immediate outcome or a deferred acknowledgement.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    Completed(DispatchOutcome),
    Scheduled(ScheduledAck),
}

/// Per-step results of a preset run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetReport {
    pub sequence: &'static str,
    pub steps: Vec<DispatchOutcome>,
}
