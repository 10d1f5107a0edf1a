//! Delay: how long a step waits before it runs.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Non-negative delay in whole seconds, capped at 30 days.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u64", into = "u64")]
pub struct Delay(u64);

impl Delay {
    /// Upper bound accepted for any delay (30 days).
    pub const MAX_SECS: u64 = 86_400 * 30;

    /// Run immediately.
    pub const ZERO: Self = Self(0);

    /// Build a delay from seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DelayOutOfRange`] above [`Self::MAX_SECS`].
    pub fn from_secs(secs: u64) -> Result<Self, ValidationError> {
        if secs > Self::MAX_SECS {
            return Err(ValidationError::DelayOutOfRange {
                value: i64::try_from(secs).unwrap_or(i64::MAX),
                max: Self::MAX_SECS,
            });
        }
        Ok(Self(secs))
    }

    /// Parse a textual delay such as the `delay` query parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDelay`] for non-integers and
    /// [`ValidationError::DelayOutOfRange`] for negative or too-large values.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidDelay(raw.to_string()))?;
        let secs = u64::try_from(value).map_err(|_| ValidationError::DelayOutOfRange {
            value,
            max: Self::MAX_SECS,
        })?;
        Self::from_secs(secs)
    }

    #[must_use]
    pub fn as_secs(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl TryFrom<u64> for Delay {
    type Error = ValidationError;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        Self::from_secs(secs)
    }
}

impl From<Delay> for u64 {
    fn from(delay: Delay) -> Self {
        delay.0
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
