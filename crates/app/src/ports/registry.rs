//! Registry port: read-only lookup of device descriptors.

use std::future::Future;

use intentcp_domain::device::DeviceDescriptor;

/// Resolves logical device names to descriptors.
///
/// Implementations must reflect registry edits without a restart: every call
/// reads the *current* snapshot, never a copy cached by the caller.
pub trait DeviceRegistry {
    /// Look up a device by logical name.
    fn lookup(&self, name: &str) -> impl Future<Output = Option<DeviceDescriptor>> + Send;

    /// All devices currently registered, sorted by name.
    fn list(&self) -> impl Future<Output = Vec<(String, DeviceDescriptor)>> + Send;
}

impl<T: DeviceRegistry + Send + Sync> DeviceRegistry for std::sync::Arc<T> {
    fn lookup(&self, name: &str) -> impl Future<Output = Option<DeviceDescriptor>> + Send {
        (**self).lookup(name)
    }

    fn list(&self) -> impl Future<Output = Vec<(String, DeviceDescriptor)>> + Send {
        (**self).list()
    }
}
