//! Signed OpenAPI client with token caching.

use std::future::Future;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tokio::time::Instant;

use intentcp_app::ports::BackendClient;
use intentcp_domain::error::IntentError;
use intentcp_domain::time::now;

use crate::config::TuyaConfig;
use crate::error::TuyaError;
use crate::sign::{SignRequest, sign};

const TOKEN_PATH: &str = "/v1.0/token?grant_type=1";
/// Response code for an expired or revoked access token.
const TOKEN_INVALID: i64 = 1010;
/// Tokens are refreshed this long before they expire.
const TOKEN_MARGIN: Duration = Duration::from_secs(60);
/// Upper bound on how long a token is cached, whatever the backend claims.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
    result: Option<TokenResult>,
}

#[derive(Debug, Deserialize)]
struct TokenResult {
    access_token: String,
    expire_time: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_MARGIN < self.expires_at
    }
}

fn is_token_invalid(response: &Value) -> bool {
    response.get("code").and_then(Value::as_i64) == Some(TOKEN_INVALID)
}

/// Tuya OpenAPI client.
///
/// Safe to share between tasks. The access token is fetched lazily and
/// cached until shortly before it expires.
#[derive(Debug)]
pub struct TuyaClient {
    config: TuyaConfig,
    http: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl TuyaClient {
    /// Build a client. No request is made until the first call.
    ///
    /// # Errors
    ///
    /// Returns [`TuyaError::Http`] if the HTTP client cannot be built.
    pub fn new(config: TuyaConfig) -> Result<Self, TuyaError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            config,
            http,
            token: Mutex::new(None),
        })
    }

    /// Set one data point on a device.
    ///
    /// # Errors
    ///
    /// Returns [`TuyaError`] on network, HTTP status or token failures.
    /// Application-level failures are returned in the response body.
    pub async fn send_command(
        &self,
        target_id: &str,
        code: &str,
        value: Value,
    ) -> Result<Value, TuyaError> {
        let path = format!("/v1.0/iot-03/devices/{target_id}/commands");
        let body = json!({ "commands": [{ "code": code, "value": value }] });
        self.call(Method::POST, &path, Some(&body)).await
    }

    /// Read all data points of a device.
    ///
    /// # Errors
    ///
    /// Returns [`TuyaError`] on network, HTTP status or token failures.
    pub async fn get_status(&self, target_id: &str) -> Result<Value, TuyaError> {
        let path = format!("/v1.0/iot-03/devices/{target_id}/status");
        self.call(Method::GET, &path, None).await
    }

    /// Perform a business call, refreshing the token and retrying once if the
    /// backend reports it invalid.
    async fn call(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, TuyaError> {
        let body = body.map(serde_json::to_vec).transpose()?.unwrap_or_default();

        let token = self.access_token().await?;
        let response = self.request(method.clone(), path, Some(&token), &body).await?;
        if !is_token_invalid(&response) {
            return Ok(response);
        }

        tracing::warn!(path, "tuya token invalid (code {TOKEN_INVALID}), refreshing and retrying once");
        *self.token.lock().await = None;
        let token = self.access_token().await?;
        self.request(method, path, Some(&token), &body).await
    }

    async fn access_token(&self) -> Result<String, TuyaError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh()) {
            return Ok(token.value.clone());
        }

        let response = self.request(Method::GET, TOKEN_PATH, None, &[]).await?;
        let envelope: TokenEnvelope = serde_json::from_value(response)?;
        if !envelope.success {
            return Err(TuyaError::Token {
                code: envelope.code,
                msg: envelope.msg,
            });
        }
        let result = envelope.result.ok_or(TuyaError::MissingToken)?;
        tracing::debug!(expire_time = result.expire_time, "tuya token refreshed");

        let lifetime = Duration::from_secs(result.expire_time).min(MAX_TOKEN_LIFETIME);
        let token = CachedToken {
            value: result.access_token,
            expires_at: Instant::now() + lifetime,
        };
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        access_token: Option<&str>,
        body: &[u8],
    ) -> Result<Value, TuyaError> {
        let timestamp_ms = now().timestamp_millis();
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let signature = sign(
            &self.config.access_key,
            &SignRequest {
                access_id: &self.config.access_id,
                access_token,
                timestamp_ms,
                nonce: &nonce,
                method: method.as_str(),
                path_and_query: path,
                body,
            },
        )?;

        let mut builder = self
            .http
            .request(method, self.config.url(path))
            .header("client_id", &self.config.access_id)
            .header("sign", signature)
            .header("sign_method", "HMAC-SHA256")
            .header("t", timestamp_ms.to_string())
            .header("nonce", nonce);
        if let Some(token) = access_token {
            builder = builder.header("access_token", token);
        }
        if !body.is_empty() {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_vec());
        }

        let response = builder.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

impl BackendClient for TuyaClient {
    fn send_command(
        &self,
        target_id: &str,
        code: &str,
        value: Value,
    ) -> impl Future<Output = Result<Value, IntentError>> + Send {
        async move {
            TuyaClient::send_command(self, target_id, code, value)
                .await
                .map_err(IntentError::from)
        }
    }

    fn get_status(&self, target_id: &str) -> impl Future<Output = Result<Value, IntentError>> + Send {
        async move {
            TuyaClient::get_status(self, target_id)
                .await
                .map_err(IntentError::from)
        }
    }
}
