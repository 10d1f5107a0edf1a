//! Actions a caller can ask of a device, and the backend commands they become.

use std::fmt;

use crate::delay::Delay;
use crate::error::ValidationError;

/// What the caller wants done.
///
/// Names are matched case-insensitively. Anything unrecognised is kept as
/// [`Action::Custom`] so that it can be echoed back and rejected at
/// resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    On,
    Off,
    Status,
    /// Brightness in percent, `1..=100`.
    Brightness(u8),
    Custom(String),
}

impl Action {
    /// Build an action from its name and optional `value` parameter.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the name is empty, or when
    /// `brightness` lacks a value or the value is not an integer in `1..=100`.
    pub fn parse(name: &str, value: Option<&str>) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyAction);
        }
        let action = match name.to_ascii_lowercase().as_str() {
            "on" => Self::On,
            "off" => Self::Off,
            "status" => Self::Status,
            "brightness" => {
                let raw = value.ok_or(ValidationError::MissingValue)?;
                Self::Brightness(parse_brightness(raw)?)
            }
            _ => Self::Custom(name.to_string()),
        };
        Ok(action)
    }

    /// Canonical action name as reported in responses.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Status => "status",
            Self::Brightness(_) => "brightness",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brightness(value) => write!(f, "brightness({value})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Parse and range-check a brightness percentage.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidValue`] for non-integers and
/// [`ValidationError::BrightnessOutOfRange`] outside `1..=100`.
pub fn parse_brightness(raw: &str) -> Result<u8, ValidationError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidValue(raw.to_string()))?;
    check_brightness(value)
}

pub(crate) fn check_brightness(value: i64) -> Result<u8, ValidationError> {
    match u8::try_from(value) {
        Ok(v @ 1..=100) => Ok(v),
        _ => Err(ValidationError::BrightnessOutOfRange(value)),
    }
}

/// One incoming request to act on a single device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub device: String,
    pub action: Action,
    pub delay: Delay,
}

impl ActionRequest {
    /// Validate and assemble a request from its textual parts.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an empty device name, a bad action
    /// value, or a bad delay.
    pub fn parse(
        device: &str,
        action: &str,
        value: Option<&str>,
        delay: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let device = device.trim();
        if device.is_empty() {
            return Err(ValidationError::EmptyDeviceName);
        }
        let delay = delay.map_or(Ok(Delay::ZERO), Delay::parse)?;
        Ok(Self {
            device: device.to_string(),
            action: Action::parse(action, value)?,
            delay,
        })
    }
}

/// Backend data-point codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCode {
    /// On/off of a dimmable light.
    SwitchLed,
    /// On/off of a plain switch, plug or push-bot.
    Switch1,
    /// Brightness of a dimmable light.
    BrightValueV2,
}

impl CommandCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SwitchLed => "switch_led",
            Self::Switch1 => "switch_1",
            Self::BrightValueV2 => "bright_value_v2",
        }
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete backend operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Switch { code: CommandCode, on: bool },
    Brightness { code: CommandCode, value: u8 },
    Status,
}

impl Command {
    /// The command code and JSON value to send, or `None` for a status read.
    #[must_use]
    pub fn code_and_value(&self) -> Option<(CommandCode, serde_json::Value)> {
        match self {
            Self::Switch { code, on } => Some((*code, serde_json::Value::Bool(*on))),
            Self::Brightness { code, value } => Some((*code, serde_json::Value::from(*value))),
            Self::Status => None,
        }
    }
}
