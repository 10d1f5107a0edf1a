//! Time and timestamp helpers.

use chrono::{DateTime, TimeDelta, Utc};

use crate::delay::Delay;

/// UTC timestamp used for registry load times and deferred fire times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Wall-clock time at which a step scheduled at `from` is due.
#[must_use]
pub fn due_at(from: Timestamp, delay: Delay) -> Timestamp {
    i64::try_from(delay.as_secs())
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| from.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
