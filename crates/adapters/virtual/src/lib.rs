//! # intentcp-adapter-virtual
//!
//! In-memory backend client. Every target id is accepted and starts with no
//! data points.
//!
//! | Call | Behaviour |
//! |------|-----------|
//! | `send_command` | Stores the value under its code, returns `{"success": true, "result": true}` |
//! | `get_status` | Returns the stored data points as `{"success": true, "result": [...]}` |
//!
//! The backend can be switched offline to make every call fail with a
//! transport error.
//!
//! ## Dependency rule
//!
//! Depends on `intentcp-app` (port traits) and `intentcp-domain` only.

mod target;

pub use target::VirtualTarget;

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use intentcp_app::ports::BackendClient;
use intentcp_domain::error::IntentError;
use serde_json::{Value, json};

/// Errors raised by the virtual backend.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    #[error("virtual backend is offline (target {0})")]
    Offline(String),
}

impl From<VirtualError> for IntentError {
    fn from(err: VirtualError) -> Self {
        IntentError::transport(err)
    }
}

/// One command received by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommand {
    pub target_id: String,
    pub code: String,
    pub value: Value,
}

/// Simulated backend holding per-target state.
#[derive(Debug, Default)]
pub struct VirtualBackend {
    targets: Mutex<HashMap<String, VirtualTarget>>,
    log: Mutex<Vec<RecordedCommand>>,
    offline: AtomicBool,
}

impl VirtualBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Commands received so far, oldest first.
    #[must_use]
    pub fn commands(&self) -> Vec<RecordedCommand> {
        lock(&self.log).clone()
    }

    /// Snapshot of one target's state.
    #[must_use]
    pub fn target(&self, target_id: &str) -> Option<VirtualTarget> {
        lock(&self.targets).get(target_id).cloned()
    }

    fn ensure_online(&self, target_id: &str) -> Result<(), VirtualError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(VirtualError::Offline(target_id.to_string()));
        }
        Ok(())
    }

    fn apply(&self, target_id: &str, code: &str, value: Value) -> Result<Value, VirtualError> {
        self.ensure_online(target_id)?;
        tracing::debug!(target_id, code, %value, "virtual command");
        lock(&self.targets)
            .entry(target_id.to_string())
            .or_default()
            .apply(code, value.clone());
        lock(&self.log).push(RecordedCommand {
            target_id: target_id.to_string(),
            code: code.to_string(),
            value,
        });
        Ok(json!({ "success": true, "result": true }))
    }

    fn status(&self, target_id: &str) -> Result<Value, VirtualError> {
        self.ensure_online(target_id)?;
        Ok(lock(&self.targets)
            .get(target_id)
            .map_or_else(|| VirtualTarget::default().status(), VirtualTarget::status))
    }
}

impl BackendClient for VirtualBackend {
    fn send_command(
        &self,
        target_id: &str,
        code: &str,
        value: Value,
    ) -> impl Future<Output = Result<Value, IntentError>> + Send {
        let result = self.apply(target_id, code, value).map_err(IntentError::from);
        async { result }
    }

    fn get_status(&self, target_id: &str) -> impl Future<Output = Result<Value, IntentError>> + Send {
        let result = self.status(target_id).map_err(IntentError::from);
        async { result }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_acknowledge_command_and_record_it() {
        let backend = VirtualBackend::new();
        let response = backend
            .send_command("t-lamp", "switch_1", json!(true))
            .await
            .unwrap();

        assert_eq!(response, json!({"success": true, "result": true}));
        assert_eq!(
            backend.commands(),
            vec![RecordedCommand {
                target_id: "t-lamp".to_string(),
                code: "switch_1".to_string(),
                value: json!(true),
            }]
        );
    }

    #[tokio::test]
    async fn should_report_state_written_by_commands() {
        let backend = VirtualBackend::new();
        backend
            .send_command("t-bed", "switch_led", json!(true))
            .await
            .unwrap();

        let status = backend.get_status("t-bed").await.unwrap();
        assert_eq!(
            status,
            json!({"success": true, "result": [{"code": "switch_led", "value": true}]})
        );
    }

    #[tokio::test]
    async fn should_report_empty_status_for_untouched_target() {
        let backend = VirtualBackend::new();
        let status = backend.get_status("t-never").await.unwrap();
        assert_eq!(status["result"], json!([]));
        assert!(backend.target("t-never").is_none());
    }

    #[tokio::test]
    async fn should_fail_with_transport_error_when_offline() {
        let backend = VirtualBackend::new();
        backend.set_offline(true);

        let result = backend.send_command("t-lamp", "switch_1", json!(true)).await;
        assert!(matches!(result, Err(IntentError::Transport(_))));
        assert!(backend.commands().is_empty());

        backend.set_offline(false);
        assert!(backend.get_status("t-lamp").await.is_ok());
    }
}
