//! Registry-file error type.

use intentcp_domain::error::ValidationError;

/// Errors raised while loading the registry file.
#[derive(Debug, thiserror::Error)]
pub enum RegistryLoadError {
    /// The file exists but could not be read.
    #[error("failed to read registry file")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or does not match the descriptor shape.
    #[error("failed to parse registry file")]
    Parse(#[from] toml::de::Error),

    /// A descriptor parsed but violates a domain rule.
    #[error("invalid descriptor for device {device}")]
    Invalid {
        device: String,
        #[source]
        source: ValidationError,
    },
}
