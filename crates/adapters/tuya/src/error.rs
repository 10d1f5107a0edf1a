//! Tuya adapter error types.

use intentcp_domain::error::IntentError;

/// Errors raised by the Tuya client.
#[derive(Debug, thiserror::Error)]
pub enum TuyaError {
    /// The HTTP request failed or the response was not JSON.
    #[error("tuya request failed")]
    Http(#[from] reqwest::Error),

    /// A request body could not be encoded, or a response had an unexpected shape.
    #[error("unexpected tuya payload")]
    Json(#[from] serde_json::Error),

    /// The token endpoint refused the credentials.
    #[error("tuya token request rejected (code {code}): {msg}")]
    Token { code: i64, msg: String },

    /// The signing key was rejected.
    #[error("cannot sign tuya request")]
    Signing(#[from] hmac::digest::InvalidLength),

    /// The token response did not carry a token.
    #[error("tuya token response has no result")]
    MissingToken,
}

impl From<TuyaError> for IntentError {
    fn from(err: TuyaError) -> Self {
        IntentError::transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_to_transport_error() {
        let err: IntentError = TuyaError::MissingToken.into();
        assert!(matches!(err, IntentError::Transport(_)));
    }

    #[test]
    fn should_display_token_rejection_with_code() {
        let err = TuyaError::Token {
            code: 1004,
            msg: "sign invalid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "tuya token request rejected (code 1004): sign invalid"
        );
    }
}
