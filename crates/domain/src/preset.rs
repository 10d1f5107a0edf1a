//! Presets: fixed, named step lists.
//!
//! - `movie`: main lights off
//! - `sleep`: every registered device off
//! - `mood`: bed light on at 40% brightness
//!
//! Preset steps force their own command code instead of the one the resolver
//! would choose.

use std::str::FromStr;

use crate::action::{Action, CommandCode};
use crate::error::ValidationError;

/// A named preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Movie,
    Sleep,
    Mood,
}

/// Which devices a preset step addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetTarget {
    Device(&'static str),
    AllDevices,
}

/// One step of a preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetStep {
    pub target: PresetTarget,
    pub action: Action,
    pub code: CommandCode,
}

const MOOD_BRIGHTNESS: u8 = 40;

impl Preset {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Sleep => "sleep",
            Self::Mood => "mood",
        }
    }

    /// Steps in execution order.
    #[must_use]
    pub fn steps(self) -> Vec<PresetStep> {
        let step = |target, action, code| PresetStep {
            target,
            action,
            code,
        };
        match self {
            Self::Movie => ["bed_light", "subdesk_light"]
                .into_iter()
                .map(|name| {
                    step(
                        PresetTarget::Device(name),
                        Action::Off,
                        CommandCode::SwitchLed,
                    )
                })
                .collect(),
            Self::Sleep => vec![step(
                PresetTarget::AllDevices,
                Action::Off,
                CommandCode::SwitchLed,
            )],
            Self::Mood => vec![
                step(
                    PresetTarget::Device("bed_light"),
                    Action::On,
                    CommandCode::SwitchLed,
                ),
                step(
                    PresetTarget::Device("bed_light"),
                    Action::Brightness(MOOD_BRIGHTNESS),
                    CommandCode::BrightValueV2,
                ),
            ],
        }
    }
}

impl FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "movie" => Ok(Self::Movie),
            "sleep" => Ok(Self::Sleep),
            "mood" => Ok(Self::Mood),
            other => Err(ValidationError::UnknownPreset(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_known_presets() {
        assert_eq!("movie".parse::<Preset>().unwrap(), Preset::Movie);
        assert_eq!("sleep".parse::<Preset>().unwrap(), Preset::Sleep);
        assert_eq!("mood".parse::<Preset>().unwrap().name(), "mood");
    }

    #[test]
    fn should_reject_unknown_preset() {
        assert_eq!(
            "party".parse::<Preset>(),
            Err(ValidationError::UnknownPreset("party".to_string()))
        );
    }

    #[test]
    fn should_turn_off_both_main_lights_for_movie() {
        let steps = Preset::Movie.steps();
        let targets: Vec<_> = steps.iter().map(|s| s.target).collect();
        assert_eq!(
            targets,
            vec![
                PresetTarget::Device("bed_light"),
                PresetTarget::Device("subdesk_light")
            ]
        );
        assert!(steps.iter().all(|s| s.action == Action::Off));
    }

    #[test]
    fn should_dim_bed_light_after_switching_it_on_for_mood() {
        let steps = Preset::Mood.steps();
        assert_eq!(steps[0].action, Action::On);
        assert_eq!(steps[1].action, Action::Brightness(40));
        assert_eq!(steps[1].code, CommandCode::BrightValueV2);
    }

    #[test]
    fn should_address_every_device_for_sleep() {
        assert_eq!(Preset::Sleep.steps()[0].target, PresetTarget::AllDevices);
    }
}
