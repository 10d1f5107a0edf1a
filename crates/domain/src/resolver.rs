//! Action resolver: maps `(descriptor, action)` to a backend target and command.
//!
//! Pure and deterministic: no IO, no registry access.
//!
//! Target preference:
//! - `on`: `on_target_id`, then `primary_target_id`
//! - `off`: `off_target_id`, then `primary_target_id`
//! - `status`: `primary_target_id`, then `on_target_id`, then `off_target_id`
//! - `brightness`: `primary_target_id` only
//!
//! Status reads prefer the primary id; the directional ids are only a
//! fallback for dual-actuator devices.

use crate::action::{Action, Command, CommandCode, check_brightness};
use crate::device::{DeviceDescriptor, DeviceKind};
use crate::error::{ResolveError, ValidationError};

/// A fully resolved backend operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAction {
    pub target_id: String,
    pub command: Command,
}

impl ResolvedAction {
    /// Replace the command code, keeping target and value.
    ///
    /// Status reads carry no code and are returned unchanged.
    #[must_use]
    pub fn with_code(mut self, code: CommandCode) -> Self {
        self.command = match self.command {
            Command::Switch { on, .. } => Command::Switch { code, on },
            Command::Brightness { value, .. } => Command::Brightness { code, value },
            Command::Status => Command::Status,
        };
        self
    }
}

/// Resolve `action` against `descriptor`.
///
/// # Errors
///
/// - [`ResolveError::UnsupportedAction`] for [`Action::Custom`] names
/// - [`ResolveError::MissingTarget`] when no suitable target id exists
/// - [`ResolveError::Validation`] for brightness on a device without
///   brightness support, or a value outside `1..=100`
pub fn resolve(
    descriptor: &DeviceDescriptor,
    action: &Action,
) -> Result<ResolvedAction, ResolveError> {
    match action {
        Action::On => Ok(ResolvedAction {
            target_id: pick(&[&descriptor.on_target_id, &descriptor.primary_target_id])
                .ok_or(ResolveError::MissingTarget("on"))?,
            command: Command::Switch {
                code: switch_code(descriptor),
                on: true,
            },
        }),
        Action::Off => Ok(ResolvedAction {
            target_id: pick(&[&descriptor.off_target_id, &descriptor.primary_target_id])
                .ok_or(ResolveError::MissingTarget("off"))?,
            command: Command::Switch {
                code: switch_code(descriptor),
                on: false,
            },
        }),
        Action::Status => Ok(ResolvedAction {
            target_id: pick(&[
                &descriptor.primary_target_id,
                &descriptor.on_target_id,
                &descriptor.off_target_id,
            ])
            .ok_or(ResolveError::MissingTarget("status"))?,
            command: Command::Status,
        }),
        Action::Brightness(value) => {
            if !descriptor.supports_brightness {
                return Err(ValidationError::BrightnessUnsupported.into());
            }
            let value = check_brightness(i64::from(*value))?;
            Ok(ResolvedAction {
                target_id: descriptor
                    .primary_target_id
                    .clone()
                    .ok_or(ResolveError::MissingTarget("brightness"))?,
                command: Command::Brightness {
                    code: CommandCode::BrightValueV2,
                    value,
                },
            })
        }
        Action::Custom(name) => Err(ResolveError::UnsupportedAction(name.clone())),
    }
}

/// On/off code for a descriptor: dimmable lights use `switch_led`,
/// everything else `switch_1`.
#[must_use]
pub fn switch_code(descriptor: &DeviceDescriptor) -> CommandCode {
    if descriptor.kind == DeviceKind::Light && descriptor.supports_brightness {
        CommandCode::SwitchLed
    } else {
        CommandCode::Switch1
    }
}

fn pick(candidates: &[&Option<String>]) -> Option<String> {
    candidates.iter().find_map(|id| (*id).clone())
}
