//! OpenAPI request signing (HMAC-SHA256).
//!
//! ```text
//! stringToSign = METHOD "\n" hex(sha256(body)) "\n" "\n" PATH_AND_QUERY
//! sign         = HEX(HMAC-SHA256(access_key,
//!                    access_id [+ access_token] + t + nonce + stringToSign))
//! ```
//!
//! Token requests are signed without `access_token`.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::TuyaError;

type HmacSha256 = Hmac<Sha256>;

/// Inputs of one signature.
#[derive(Debug, Clone, Copy)]
pub struct SignRequest<'a> {
    pub access_id: &'a str,
    pub access_token: Option<&'a str>,
    pub timestamp_ms: i64,
    pub nonce: &'a str,
    pub method: &'a str,
    pub path_and_query: &'a str,
    pub body: &'a [u8],
}

pub fn string_to_sign(method: &str, body: &[u8], path_and_query: &str) -> String {
    let body_hash = hex::encode(Sha256::digest(body));
    format!("{method}\n{body_hash}\n\n{path_and_query}")
}

/// Uppercase hex signature for `request` under `access_key`.
///
/// # Errors
///
/// Returns [`TuyaError::Signing`] if the key is rejected by the MAC.
pub fn sign(access_key: &str, request: &SignRequest<'_>) -> Result<String, TuyaError> {
    let message = format!(
        "{}{}{}{}{}",
        request.access_id,
        request.access_token.unwrap_or_default(),
        request.timestamp_ms,
        request.nonce,
        string_to_sign(request.method, request.body, request.path_and_query),
    );
    let mut mac = HmacSha256::new_from_slice(access_key.as_bytes())?;
    mac.update(message.as_bytes());
    Ok(hex::encode_upper(mac.finalize().into_bytes()))
}
