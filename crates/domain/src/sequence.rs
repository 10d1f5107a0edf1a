//! Sequence parser: `device:action[?delay=N][&value=V]` steps, comma-separated.
//!
//! ```text
//! door:open,living_light:on,living_light:off?delay=7200,bed_light:brightness?value=40
//! ```
//!
//! The device is everything before the first `:`. The remainder is the action,
//! optionally followed by `?` and a query string (`delay`, `value`; other keys
//! are ignored). Empty steps from stray commas are skipped. Steps keep their
//! input order and are neither deduplicated nor reordered.

use crate::action::Action;
use crate::delay::Delay;
use crate::error::{ParseError, ValidationError};

/// One step of a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceStep {
    pub device: String,
    pub action: Action,
    pub delay: Delay,
}

/// Ordered list of steps, in the order they were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    steps: Vec<SequenceStep>,
}

impl Sequence {
    /// Parse the textual step list.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Empty`] for blank input,
    /// [`ParseError::NoValidSteps`] when only separators are present, and a
    /// step-level error quoting the offending step otherwise.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        let steps = text
            .split(',')
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(parse_step)
            .collect::<Result<Vec<_>, _>>()?;
        if steps.is_empty() {
            return Err(ParseError::NoValidSteps);
        }
        Ok(Self { steps })
    }

    #[must_use]
    pub fn steps(&self) -> &[SequenceStep] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl IntoIterator for Sequence {
    type Item = SequenceStep;
    type IntoIter = std::vec::IntoIter<SequenceStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

fn parse_step(raw: &str) -> Result<SequenceStep, ParseError> {
    let invalid = || ParseError::InvalidStep(raw.to_string());

    let (device, rest) = raw.split_once(':').ok_or_else(invalid)?;
    let (action, query) = rest.split_once('?').unwrap_or((rest, ""));
    let device = device.trim();
    let action = action.trim();
    if device.is_empty() || action.is_empty() || action.contains(':') {
        return Err(invalid());
    }

    let mut delay = None;
    let mut value = None;
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, val) = pair.split_once('=').unwrap_or((pair, ""));
        match key.trim() {
            "delay" if delay.is_none() => delay = Some(val),
            "value" if value.is_none() => value = Some(val),
            _ => {}
        }
    }

    let delay = delay
        .map_or(Ok(Delay::ZERO), Delay::parse)
        .map_err(|_| ParseError::InvalidDelay(raw.to_string()))?;
    let action = Action::parse(action, value).map_err(|err| match err {
        ValidationError::EmptyAction => invalid(),
        _ => ParseError::InvalidValue(raw.to_string()),
    })?;

    Ok(SequenceStep {
        device: device.to_string(),
        action,
        delay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(step: &SequenceStep) -> (&str, &str, u64) {
        (
            step.device.as_str(),
            step.action.name(),
            step.delay.as_secs(),
        )
    }

    #[test]
    fn should_parse_two_steps_with_optional_delay() {
        let seq = Sequence::parse("a:on,b:off?delay=5").unwrap();
        let steps: Vec<_> = seq.steps().iter().map(triple).collect();
        assert_eq!(steps, vec![("a", "on", 0), ("b", "off", 5)]);
    }

    #[test]
    fn should_preserve_order_and_repeated_devices() {
        let seq = Sequence::parse("x:on,y:on,x:off").unwrap();
        let steps: Vec<_> = seq.steps().iter().map(triple).collect();
        assert_eq!(steps, vec![("x", "on", 0), ("y", "on", 0), ("x", "off", 0)]);
    }

    #[test]
    fn should_reject_empty_and_whitespace_input() {
        assert_eq!(Sequence::parse(""), Err(ParseError::Empty));
        assert_eq!(Sequence::parse("   "), Err(ParseError::Empty));
    }

    #[test]
    fn should_reject_input_with_only_separators() {
        assert_eq!(Sequence::parse(","), Err(ParseError::NoValidSteps));
        assert_eq!(Sequence::parse(" , ,"), Err(ParseError::NoValidSteps));
    }

    #[test]
    fn should_skip_stray_commas() {
        let seq = Sequence::parse(",a:on,,b:off,").unwrap();
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn should_reject_step_without_colon() {
        assert_eq!(
            Sequence::parse("bad"),
            Err(ParseError::InvalidStep("bad".to_string()))
        );
    }

    #[test]
    fn should_reject_step_with_empty_device_or_action() {
        assert!(matches!(
            Sequence::parse(":on"),
            Err(ParseError::InvalidStep(_))
        ));
        assert!(matches!(
            Sequence::parse("lamp:"),
            Err(ParseError::InvalidStep(_))
        ));
        assert!(matches!(
            Sequence::parse("lamp:?delay=3"),
            Err(ParseError::InvalidStep(_))
        ));
    }

    #[test]
    fn should_reject_action_containing_a_colon() {
        assert_eq!(
            Sequence::parse("lamp:on:now"),
            Err(ParseError::InvalidStep("lamp:on:now".to_string()))
        );
    }

    #[test]
    fn should_quote_step_verbatim_on_bad_delay() {
        assert_eq!(
            Sequence::parse("a:on, lamp:off?delay=-1"),
            Err(ParseError::InvalidDelay("lamp:off?delay=-1".to_string()))
        );
        assert_eq!(
            Sequence::parse("lamp:off?delay=later"),
            Err(ParseError::InvalidDelay("lamp:off?delay=later".to_string()))
        );
        assert!(matches!(
            Sequence::parse("lamp:off?delay="),
            Err(ParseError::InvalidDelay(_))
        ));
    }

    #[test]
    fn should_keep_unknown_action_for_later_resolution() {
        let seq = Sequence::parse("door:open").unwrap();
        assert_eq!(seq.steps()[0].action, Action::Custom("open".to_string()));
    }

    #[test]
    fn should_read_brightness_value_from_step_query() {
        let seq = Sequence::parse("bed_light:brightness?value=40&delay=3").unwrap();
        let step = &seq.steps()[0];
        assert_eq!(step.action, Action::Brightness(40));
        assert_eq!(step.delay.as_secs(), 3);
    }

    #[test]
    fn should_reject_brightness_step_with_bad_value() {
        assert_eq!(
            Sequence::parse("bed_light:brightness?value=0"),
            Err(ParseError::InvalidValue(
                "bed_light:brightness?value=0".to_string()
            ))
        );
        assert!(matches!(
            Sequence::parse("bed_light:brightness"),
            Err(ParseError::InvalidValue(_))
        ));
    }

    #[test]
    fn should_ignore_unknown_query_keys() {
        let seq = Sequence::parse("lamp:on?source=panel&delay=2").unwrap();
        assert_eq!(seq.steps()[0].delay.as_secs(), 2);
    }
}
