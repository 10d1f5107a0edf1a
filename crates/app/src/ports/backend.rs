//! Backend port: the transport that actually drives devices.

use std::future::Future;

use intentcp_domain::error::IntentError;

/// Executes commands against backend target ids.
///
/// One shared instance serves the whole process and is called concurrently.
/// Session handling (including any reconnect-and-retry) is the
/// implementation's concern; callers only see the final response or error.
pub trait BackendClient {
    /// Send `code = value` to `target_id`.
    fn send_command(
        &self,
        target_id: &str,
        code: &str,
        value: serde_json::Value,
    ) -> impl Future<Output = Result<serde_json::Value, IntentError>> + Send;

    /// Read the current status of `target_id`.
    fn get_status(
        &self,
        target_id: &str,
    ) -> impl Future<Output = Result<serde_json::Value, IntentError>> + Send;
}

impl<T: BackendClient + Send + Sync> BackendClient for std::sync::Arc<T> {
    fn send_command(
        &self,
        target_id: &str,
        code: &str,
        value: serde_json::Value,
    ) -> impl Future<Output = Result<serde_json::Value, IntentError>> + Send {
        (**self).send_command(target_id, code, value)
    }

    fn get_status(
        &self,
        target_id: &str,
    ) -> impl Future<Output = Result<serde_json::Value, IntentError>> + Send {
        (**self).get_status(target_id)
    }
}
