//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`IntentError`]
//! via `#[from]`. Adapter errors cross the port boundary as
//! [`IntentError::Transport`].

/// Top-level error for the intentcp workspace.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    /// Caller input failed a domain rule (bad delay, bad brightness, …).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A named thing does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Malformed sequence text.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The action could not be mapped onto the device.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The backend call failed.
    #[error("backend transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain-rule violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("device name must not be empty")]
    EmptyDeviceName,

    #[error("action must not be empty")]
    EmptyAction,

    #[error("brightness must be between 1 and 100, got {0}")]
    BrightnessOutOfRange(i64),

    #[error("device does not support brightness")]
    BrightnessUnsupported,

    #[error("brightness requires a value")]
    MissingValue,

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("invalid delay: {0}")]
    InvalidDelay(String),

    #[error("delay must be between 0 and {max} seconds, got {value}")]
    DelayOutOfRange { value: i64, max: u64 },

    #[error("on_target_id and off_target_id must be set together")]
    UnpairedActuators,

    #[error("device has no backend target id")]
    NoTarget,

    #[error("unknown sequence preset: {0}")]
    UnknownPreset(String),

    #[error("malformed query: {0}")]
    MalformedQuery(String),
}

/// A lookup by name found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {entity}: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Sequence text errors. Step-level variants carry the offending step verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("actions is required")]
    Empty,

    #[error("invalid step: {0}")]
    InvalidStep(String),

    #[error("invalid delay in step: {0}")]
    InvalidDelay(String),

    #[error("invalid value in step: {0}")]
    InvalidValue(String),

    #[error("no valid steps in actions")]
    NoValidSteps,
}

/// Failures of the action resolver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("no backend target configured for {0}")]
    MissingTarget(&'static str),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl IntentError {
    /// Wrap any adapter error as a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }

    /// The message followed by every underlying cause not already part of it.
    #[must_use]
    pub fn detail(&self) -> String {
        let mut text = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(inner) = source {
            let message = inner.to_string();
            if !text.ends_with(&message) {
                text.push_str(": ");
                text.push_str(&message);
            }
            source = inner.source();
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("client failed")]
    struct ClientError(#[source] std::io::Error);

    #[test]
    fn should_render_each_cause_once_in_detail() {
        let err = IntentError::transport(ClientError(std::io::Error::other("connection refused")));
        assert_eq!(
            err.detail(),
            "backend transport error: client failed: connection refused"
        );
    }

    #[test]
    fn should_convert_validation_error_with_from() {
        let err: IntentError = ValidationError::EmptyDeviceName.into();
        assert!(matches!(
            err,
            IntentError::Validation(ValidationError::EmptyDeviceName)
        ));
    }

    #[test]
    fn should_display_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "device",
            id: "bed_light".to_string(),
        };
        assert_eq!(err.to_string(), "unknown device: bed_light");
    }

    #[test]
    fn should_reference_offending_step_in_parse_error() {
        let err = ParseError::InvalidDelay("lamp:on?delay=-1".to_string());
        assert_eq!(err.to_string(), "invalid delay in step: lamp:on?delay=-1");
    }

    #[test]
    fn should_keep_transport_source() {
        let io = std::io::Error::other("connection reset");
        let err = IntentError::transport(io);
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("connection reset"));
    }
}
