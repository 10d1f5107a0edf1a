//! # intentcp-adapter-tuya
//!
//! Backend client for the Tuya cloud OpenAPI.
//!
//! ## Responsibilities
//! - Implement the `BackendClient` port from `intentcp-app`
//! - Obtain and cache an access token (`GET /v1.0/token?grant_type=1`)
//! - Sign every request with HMAC-SHA256
//! - Send data-point commands and read device status
//! - On an invalid-token response (code `1010`), refresh the token and retry
//!   the call exactly once
//!
//! Transport failures surface as `IntentError::Transport`. Application-level
//! failures (`"success": false`) are returned unchanged in the response body.
//!
//! ## Dependency rule
//! Depends on `intentcp-app` (for the port trait) and `intentcp-domain`.

mod client;
mod config;
mod error;
mod sign;

pub use client::TuyaClient;
pub use config::{DEFAULT_ENDPOINT, TuyaConfig};
pub use error::TuyaError;
