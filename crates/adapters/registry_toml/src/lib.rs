//! # intentcp-adapter-registry-toml
//!
//! Device registry loaded from a TOML file of the form:
//!
//! ```toml
//! [devices.bed_light]
//! kind = "light"
//! tuya_device_id = "..."
//! supports_brightness = true
//!
//! [devices.curtain]
//! kind = "switch"
//! tuya_on_device_id = "..."
//! tuya_off_device_id = "..."
//! ```
//!
//! ## Responsibilities
//! - Implement the `DeviceRegistry` port from `intentcp-app`
//! - Reload the file when its modification time changes, so edits apply
//!   without a restart (including to deferred steps not yet fired)
//! - Validate descriptors on load
//!
//! ## Dependency rule
//! Depends on `intentcp-app` (for the port trait and `SharedRegistry`) and
//! `intentcp-domain` (for descriptors).

mod error;
mod file;

pub use error::RegistryLoadError;
pub use file::{TomlRegistry, parse_registry};
