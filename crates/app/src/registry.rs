//! In-process device registry backed by a swappable snapshot.
//!
//! The owner (a file loader, a test, …) calls [`SharedRegistry::replace`]
//! whenever the device set changes. Readers always see the latest snapshot,
//! so a replacement also affects deferred steps that have not fired yet.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use intentcp_domain::device::DeviceDescriptor;

use crate::ports::DeviceRegistry;

/// Immutable view of the registry at one point in time.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    devices: BTreeMap<String, DeviceDescriptor>,
}

impl RegistrySnapshot {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DeviceDescriptor> {
        self.devices.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Registry handle shared between the server and the dispatch core.
#[derive(Debug)]
pub struct SharedRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl SharedRegistry {
    /// Create a registry holding `devices`.
    pub fn new(devices: impl IntoIterator<Item = (String, DeviceDescriptor)>) -> Self {
        Self {
            current: RwLock::new(Arc::new(Self::snapshot_of(devices))),
        }
    }

    /// Atomically swap in a new device set.
    pub fn replace(&self, devices: impl IntoIterator<Item = (String, DeviceDescriptor)>) {
        let next = Arc::new(Self::snapshot_of(devices));
        tracing::debug!(devices = next.len(), "registry snapshot replaced");
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn snapshot_of(devices: impl IntoIterator<Item = (String, DeviceDescriptor)>) -> RegistrySnapshot {
        RegistrySnapshot {
            devices: devices.into_iter().collect(),
        }
    }
}

impl DeviceRegistry for SharedRegistry {
    fn lookup(&self, name: &str) -> impl Future<Output = Option<DeviceDescriptor>> + Send {
        let found = self.snapshot().get(name).cloned();
        async { found }
    }

    fn list(&self) -> impl Future<Output = Vec<(String, DeviceDescriptor)>> + Send {
        let all: Vec<_> = self
            .snapshot()
            .devices
            .iter()
            .map(|(name, desc)| (name.clone(), desc.clone()))
            .collect();
        async { all }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intentcp_domain::device::DeviceKind;

    fn switch(id: &str) -> DeviceDescriptor {
        DeviceDescriptor::builder(DeviceKind::Switch)
            .primary_target(id)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_find_registered_device() {
        let registry = SharedRegistry::new([("fan".to_string(), switch("t-fan"))]);
        let found = registry.lookup("fan").await.unwrap();
        assert_eq!(found.primary_target_id.as_deref(), Some("t-fan"));
        assert!(registry.lookup("heater").await.is_none());
    }

    #[tokio::test]
    async fn should_see_replacement_on_next_lookup() {
        let registry = SharedRegistry::default();
        assert!(registry.lookup("fan").await.is_none());

        registry.replace([("fan".to_string(), switch("t-fan"))]);
        assert!(registry.lookup("fan").await.is_some());

        registry.replace([("fan".to_string(), switch("t-fan-2"))]);
        let found = registry.lookup("fan").await.unwrap();
        assert_eq!(found.primary_target_id.as_deref(), Some("t-fan-2"));
    }

    #[tokio::test]
    async fn should_list_devices_sorted_by_name() {
        let registry = SharedRegistry::new([
            ("b".to_string(), switch("2")),
            ("a".to_string(), switch("1")),
        ]);
        let names: Vec<_> = registry.list().await.into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn should_keep_old_snapshot_alive_for_holders() {
        let registry = SharedRegistry::new([("fan".to_string(), switch("t-fan"))]);
        let held = registry.snapshot();
        registry.replace(std::iter::empty());
        assert_eq!(held.len(), 1);
        assert!(registry.snapshot().is_empty());
    }
}
