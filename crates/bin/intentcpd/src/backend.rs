//! Backend selection.

use std::future::Future;

use intentcp_adapter_tuya::{TuyaClient, TuyaConfig, TuyaError};
use intentcp_adapter_virtual::VirtualBackend;
use intentcp_app::ports::BackendClient;
use intentcp_domain::error::IntentError;
use serde_json::Value;

/// The backend the daemon talks to, chosen once at startup.
pub enum Backend {
    Tuya(TuyaClient),
    Virtual(VirtualBackend),
}

impl Backend {
    /// Use the Tuya cloud when credentials are configured, the in-memory
    /// backend otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(tuya: Option<TuyaConfig>) -> Result<Self, TuyaError> {
        match tuya {
            Some(config) => {
                tracing::info!(endpoint = %config.endpoint, "using tuya cloud backend");
                Ok(Self::Tuya(TuyaClient::new(config)?))
            }
            None => {
                tracing::warn!("no tuya credentials configured, commands go to the virtual backend");
                Ok(Self::Virtual(VirtualBackend::new()))
            }
        }
    }
}

impl BackendClient for Backend {
    fn send_command(
        &self,
        target_id: &str,
        code: &str,
        value: Value,
    ) -> impl Future<Output = Result<Value, IntentError>> + Send {
        async move {
            match self {
                Self::Tuya(client) => BackendClient::send_command(client, target_id, code, value).await,
                Self::Virtual(client) => {
                    BackendClient::send_command(client, target_id, code, value).await
                }
            }
        }
    }

    fn get_status(&self, target_id: &str) -> impl Future<Output = Result<Value, IntentError>> + Send {
        async move {
            match self {
                Self::Tuya(client) => BackendClient::get_status(client, target_id).await,
                Self::Virtual(client) => BackendClient::get_status(client, target_id).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn should_fall_back_to_virtual_backend_without_credentials() {
        let backend = Backend::from_config(None).unwrap();
        assert!(matches!(backend, Backend::Virtual(_)));

        let reply = backend
            .send_command("t-lamp", "switch_led", json!(true))
            .await
            .unwrap();
        assert_eq!(reply, json!({"success": true, "result": true}));

        let status = backend.get_status("t-lamp").await.unwrap();
        assert_eq!(status["result"][0]["code"], "switch_led");
    }

    #[test]
    fn should_select_tuya_backend_with_credentials() {
        let backend = Backend::from_config(Some(TuyaConfig::new("id", "key"))).unwrap();
        assert!(matches!(backend, Backend::Tuya(_)));
    }
}
