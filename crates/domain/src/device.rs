//! Device descriptor: what the registry knows about one logical device.
//!
//! A logical device name (e.g. `bed_light`) maps to a descriptor that says
//! which backend target ids to talk to and what the device can do. Most
//! devices have a single `primary_target_id`. A *dual-actuator* device is
//! driven by two controllers, one that only switches ON and one that only
//! switches OFF, and carries `on_target_id` / `off_target_id` instead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Device category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Light,
    Switch,
    Aircon,
    Projector,
    #[serde(alias = "windows_pc")]
    GenericPcAgent,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Switch => "switch",
            Self::Aircon => "aircon",
            Self::Projector => "projector",
            Self::GenericPcAgent => "generic_pc_agent",
        })
    }
}

/// Registry entry for a logical device. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub kind: DeviceKind,
    #[serde(default, alias = "tuya_device_id")]
    pub primary_target_id: Option<String>,
    #[serde(default, alias = "tuya_on_device_id")]
    pub on_target_id: Option<String>,
    #[serde(default, alias = "tuya_off_device_id")]
    pub off_target_id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub supports_brightness: bool,
    #[serde(default)]
    pub supports_temperature: bool,
}

impl DeviceDescriptor {
    /// Create a builder for constructing a [`DeviceDescriptor`].
    #[must_use]
    pub fn builder(kind: DeviceKind) -> DeviceDescriptorBuilder {
        DeviceDescriptorBuilder::new(kind)
    }

    /// Whether ON and OFF go to separate controllers.
    #[must_use]
    pub fn is_dual_actuator(&self) -> bool {
        self.on_target_id.is_some() && self.off_target_id.is_some()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnpairedActuators`] when only one of the
    /// directional ids is set, and [`ValidationError::NoTarget`] when no id
    /// is set at all.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.on_target_id.is_some() != self.off_target_id.is_some() {
            return Err(ValidationError::UnpairedActuators);
        }
        if self.primary_target_id.is_none() && !self.is_dual_actuator() {
            return Err(ValidationError::NoTarget);
        }
        Ok(())
    }
}

/// Step-by-step builder for [`DeviceDescriptor`].
#[derive(Debug)]
pub struct DeviceDescriptorBuilder {
    inner: DeviceDescriptor,
}

impl DeviceDescriptorBuilder {
    fn new(kind: DeviceKind) -> Self {
        Self {
            inner: DeviceDescriptor {
                kind,
                primary_target_id: None,
                on_target_id: None,
                off_target_id: None,
                location: None,
                supports_brightness: false,
                supports_temperature: false,
            },
        }
    }

    #[must_use]
    pub fn primary_target(mut self, id: impl Into<String>) -> Self {
        self.inner.primary_target_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn actuators(mut self, on_id: impl Into<String>, off_id: impl Into<String>) -> Self {
        self.inner.on_target_id = Some(on_id.into());
        self.inner.off_target_id = Some(off_id.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.inner.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn brightness(mut self, supported: bool) -> Self {
        self.inner.supports_brightness = supported;
        self
    }

    /// Consume the builder, validate, and return a [`DeviceDescriptor`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the descriptor has no usable target.
    pub fn build(self) -> Result<DeviceDescriptor, ValidationError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_single_target_light() {
        let desc = DeviceDescriptor::builder(DeviceKind::Light)
            .primary_target("bf01")
            .brightness(true)
            .location("bedroom")
            .build()
            .unwrap();
        assert_eq!(desc.primary_target_id.as_deref(), Some("bf01"));
        assert!(desc.supports_brightness);
        assert!(!desc.is_dual_actuator());
    }

    #[test]
    fn should_build_dual_actuator_switch() {
        let desc = DeviceDescriptor::builder(DeviceKind::Switch)
            .actuators("bot-on", "bot-off")
            .build()
            .unwrap();
        assert!(desc.is_dual_actuator());
        assert!(desc.primary_target_id.is_none());
    }

    #[test]
    fn should_reject_descriptor_without_targets() {
        let result = DeviceDescriptor::builder(DeviceKind::Projector).build();
        assert_eq!(result, Err(ValidationError::NoTarget));
    }

    #[test]
    fn should_reject_half_configured_actuators() {
        let mut desc = DeviceDescriptor::builder(DeviceKind::Switch)
            .primary_target("p1")
            .build()
            .unwrap();
        desc.on_target_id = Some("only-on".to_string());
        assert_eq!(desc.validate(), Err(ValidationError::UnpairedActuators));
    }

    #[test]
    fn should_deserialize_legacy_tuya_keys() {
        let json = serde_json::json!({
            "kind": "light",
            "tuya_device_id": "bf01",
            "supports_brightness": true
        });
        let desc: DeviceDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(desc.primary_target_id.as_deref(), Some("bf01"));
        assert!(!desc.supports_temperature);
    }

    #[test]
    fn should_accept_windows_pc_as_generic_agent_kind() {
        let kind: DeviceKind = serde_json::from_str("\"windows_pc\"").unwrap();
        assert_eq!(kind, DeviceKind::GenericPcAgent);
        assert_eq!(kind.to_string(), "generic_pc_agent");
    }
}
