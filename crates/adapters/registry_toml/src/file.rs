//! File-backed registry with modification-time reload.

use std::collections::BTreeMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use serde::Deserialize;
use tokio::sync::Mutex;

use intentcp_app::ports::DeviceRegistry;
use intentcp_app::registry::SharedRegistry;
use intentcp_domain::device::DeviceDescriptor;

use crate::error::RegistryLoadError;

/// What the file looked like at the last check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileStamp {
    Missing,
    Modified(SystemTime),
    /// The platform reports no modification time; reload on every check.
    Unknown,
}

#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    devices: BTreeMap<String, DeviceDescriptor>,
}

/// Parse registry TOML and validate every descriptor.
///
/// # Errors
///
/// Returns [`RegistryLoadError::Parse`] for malformed TOML and
/// [`RegistryLoadError::Invalid`] for a descriptor breaking a domain rule.
pub fn parse_registry(text: &str) -> Result<BTreeMap<String, DeviceDescriptor>, RegistryLoadError> {
    let file: RegistryFile = toml::from_str(text)?;
    for (device, descriptor) in &file.devices {
        descriptor
            .validate()
            .map_err(|source| RegistryLoadError::Invalid {
                device: device.clone(),
                source,
            })?;
    }
    Ok(file.devices)
}

/// Device registry read from `devices.toml`.
///
/// Every lookup checks the file's modification time and reloads on change.
/// A file that fails to load after startup leaves the previous devices in
/// place.
#[derive(Debug)]
pub struct TomlRegistry {
    path: PathBuf,
    shared: Arc<SharedRegistry>,
    stamp: Mutex<Option<FileStamp>>,
}

impl TomlRegistry {
    /// Load the registry at `path`.
    ///
    /// A missing file yields an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryLoadError`] if the file exists but cannot be read,
    /// parsed or validated.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RegistryLoadError> {
        let registry = Self {
            path: path.into(),
            shared: Arc::new(SharedRegistry::default()),
            stamp: Mutex::new(None),
        };
        let stamp = registry.current_stamp().await?;
        registry.load(stamp).await?;
        *registry.stamp.lock().await = Some(stamp);
        Ok(registry)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory registry kept in sync with the file.
    #[must_use]
    pub fn shared(&self) -> Arc<SharedRegistry> {
        Arc::clone(&self.shared)
    }

    /// Reload the file if it changed since the last check.
    ///
    /// Failures are logged and the previous devices are kept.
    pub async fn refresh(&self) {
        let mut last = self.stamp.lock().await;
        let stamp = match self.current_stamp().await {
            Ok(stamp) => stamp,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "cannot stat registry file");
                return;
            }
        };
        if *last == Some(stamp) && stamp != FileStamp::Unknown {
            return;
        }
        if let Err(err) = self.load(stamp).await {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                detail = ?std::error::Error::source(&err).map(ToString::to_string),
                "registry reload failed, keeping previous devices"
            );
        }
        *last = Some(stamp);
    }

    async fn current_stamp(&self) -> Result<FileStamp, RegistryLoadError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Ok(meta
                .modified()
                .map_or(FileStamp::Unknown, FileStamp::Modified)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(FileStamp::Missing),
            Err(err) => Err(err.into()),
        }
    }

    async fn load(&self, stamp: FileStamp) -> Result<(), RegistryLoadError> {
        if stamp == FileStamp::Missing {
            tracing::info!(path = %self.path.display(), "registry file not found, no devices configured");
            self.shared.replace(std::iter::empty());
            return Ok(());
        }
        let text = tokio::fs::read_to_string(&self.path).await?;
        let devices = parse_registry(&text)?;
        tracing::info!(path = %self.path.display(), devices = devices.len(), "registry loaded");
        self.shared.replace(devices);
        Ok(())
    }
}

impl DeviceRegistry for TomlRegistry {
    fn lookup(&self, name: &str) -> impl Future<Output = Option<DeviceDescriptor>> + Send {
        let name = name.to_string();
        async move {
            self.refresh().await;
            self.shared.lookup(&name).await
        }
    }

    fn list(&self) -> impl Future<Output = Vec<(String, DeviceDescriptor)>> + Send {
        async move {
            self.refresh().await;
            self.shared.list().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intentcp_domain::device::DeviceKind;
    use intentcp_domain::error::ValidationError;
    use std::fs::File;
    use std::time::Duration;

    const HOME: &str = r#"
[devices.bed_light]
kind = "light"
tuya_device_id = "t-bed"
location = "bedroom"
supports_brightness = true

[devices.curtain]
kind = "switch"
tuya_on_device_id = "t-open"
tuya_off_device_id = "t-close"
"#;

    fn write_at(path: &Path, text: &str, secs: u64) {
        std::fs::write(path, text).unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn should_parse_descriptors_with_backend_field_names() {
        let devices = parse_registry(HOME).unwrap();
        let bed = &devices["bed_light"];
        assert_eq!(bed.kind, DeviceKind::Light);
        assert_eq!(bed.primary_target_id.as_deref(), Some("t-bed"));
        assert!(bed.supports_brightness);
        assert!(devices["curtain"].is_dual_actuator());
    }

    #[test]
    fn should_accept_file_without_devices_table() {
        assert!(parse_registry("").unwrap().is_empty());
    }

    #[test]
    fn should_reject_half_configured_actuator_pair() {
        let text = "[devices.gate]\nkind = \"switch\"\ntuya_on_device_id = \"t-on\"\n";
        let err = parse_registry(text).unwrap_err();
        assert!(matches!(
            err,
            RegistryLoadError::Invalid { ref device, source: ValidationError::UnpairedActuators }
                if device == "gate"
        ));
    }

    #[test]
    fn should_reject_unknown_kind() {
        let text = "[devices.toaster]\nkind = \"toaster\"\ntuya_device_id = \"t\"\n";
        assert!(matches!(
            parse_registry(text),
            Err(RegistryLoadError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn should_start_empty_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TomlRegistry::open(dir.path().join("devices.toml"))
            .await
            .unwrap();
        assert!(registry.list().await.is_empty());
    }

    #[tokio::test]
    async fn should_fail_to_open_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.toml");
        write_at(&path, "[devices.x", 1);
        assert!(TomlRegistry::open(&path).await.is_err());
    }

    #[tokio::test]
    async fn should_reload_when_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.toml");
        write_at(&path, HOME, 1);
        let registry = TomlRegistry::open(&path).await.unwrap();
        assert!(registry.lookup("fan").await.is_none());

        write_at(
            &path,
            "[devices.fan]\nkind = \"switch\"\ntuya_device_id = \"t-fan\"\n",
            2,
        );
        let fan = registry.lookup("fan").await.unwrap();
        assert_eq!(fan.primary_target_id.as_deref(), Some("t-fan"));
        assert!(registry.lookup("bed_light").await.is_none());
    }

    #[tokio::test]
    async fn should_keep_previous_devices_when_reload_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.toml");
        write_at(&path, HOME, 1);
        let registry = TomlRegistry::open(&path).await.unwrap();

        write_at(&path, "not = [valid", 2);
        assert!(registry.lookup("bed_light").await.is_some());
        assert_eq!(registry.list().await.len(), 2);
    }

    #[tokio::test]
    async fn should_empty_registry_when_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.toml");
        write_at(&path, HOME, 1);
        let registry = TomlRegistry::open(&path).await.unwrap();
        assert_eq!(registry.shared().snapshot().len(), 2);

        std::fs::remove_file(&path).unwrap();
        assert!(registry.lookup("bed_light").await.is_none());
    }
}
