//! Tuya cloud credentials.

use serde::Deserialize;

/// Default OpenAPI endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openapi.tuya.com";

/// Configuration for the Tuya backend client.
#[derive(Clone, Deserialize)]
pub struct TuyaConfig {
    /// Cloud project access id (`client_id` header).
    pub access_id: String,
    /// Cloud project access secret, used as the HMAC key.
    pub access_key: String,
    /// Regional OpenAPI base URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl TuyaConfig {
    #[must_use]
    pub fn new(access_id: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            access_id: access_id.into(),
            access_key: access_key.into(),
            endpoint: default_endpoint(),
        }
    }

    /// Set the OpenAPI base URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Absolute URL for `path_and_query`.
    pub(crate) fn url(&self, path_and_query: &str) -> String {
        format!("{}{path_and_query}", self.endpoint.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for TuyaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TuyaConfig")
            .field("access_id", &self.access_id)
            .field("access_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
