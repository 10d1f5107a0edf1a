//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `intentcp.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;

use intentcp_adapter_tuya::TuyaConfig;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Device registry file.
    pub registry: RegistryConfig,
    /// Tuya cloud credentials. Without them the virtual backend is used.
    pub tuya: Option<TuyaConfig>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Registry file location.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub path: PathBuf,
}

impl Config {
    /// Load configuration from `intentcp.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("intentcp.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("INTENTCP_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("INTENTCP_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("INTENTCP_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("INTENTCP_REGISTRY") {
            self.registry.path = PathBuf::from(val);
        }
        if let Some(val) = var("INTENTCP_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }

        match (var("TUYA_ACCESS_ID"), var("TUYA_ACCESS_KEY"), &mut self.tuya) {
            (Some(id), Some(key), None) => self.tuya = Some(TuyaConfig::new(id, key)),
            (id, key, Some(tuya)) => {
                if let Some(id) = id {
                    tuya.access_id = id;
                }
                if let Some(key) = key {
                    tuya.access_key = key;
                }
            }
            _ => {}
        }
        if let (Some(endpoint), Some(tuya)) = (var("TUYA_ENDPOINT"), &mut self.tuya) {
            tuya.endpoint = endpoint;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if let Some(tuya) = &self.tuya {
            if tuya.access_id.trim().is_empty() || tuya.access_key.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "tuya access_id and access_key must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "intentcpd=info,intentcp=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config/devices.toml"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.registry.path, PathBuf::from("config/devices.toml"));
        assert!(config.tuya.is_none());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [logging]
            filter = 'debug'

            [registry]
            path = '/etc/intentcp/devices.toml'

            [tuya]
            access_id = 'id'
            access_key = 'key'
            endpoint = 'https://openapi.tuyaeu.com'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(
            config.registry.path,
            PathBuf::from("/etc/intentcp/devices.toml")
        );
        let tuya = config.tuya.unwrap();
        assert_eq!(tuya.access_id, "id");
        assert_eq!(tuya.endpoint, "https://openapi.tuyaeu.com");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_tuya_credentials() {
        let config = Config {
            tuya: Some(TuyaConfig::new("id", " ")),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn should_override_bind_address_from_env() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("INTENTCP_BIND", "127.0.0.1:9000")]));
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn should_ignore_unparsable_port_override() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("INTENTCP_PORT", "http")]));
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn should_prefer_rust_log_over_intentcp_log() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("INTENTCP_LOG", "warn"), ("RUST_LOG", "trace")]));
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_enable_tuya_from_env_credentials() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("TUYA_ACCESS_ID", "id"),
            ("TUYA_ACCESS_KEY", "key"),
            ("TUYA_ENDPOINT", "https://openapi.tuyaus.com"),
            ("INTENTCP_REGISTRY", "/tmp/devices.toml"),
        ]));
        let tuya = config.tuya.as_ref().unwrap();
        assert_eq!(tuya.access_key, "key");
        assert_eq!(tuya.endpoint, "https://openapi.tuyaus.com");
        assert_eq!(config.registry.path, PathBuf::from("/tmp/devices.toml"));
    }

    #[test]
    fn should_not_enable_tuya_from_partial_env_credentials() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("TUYA_ACCESS_ID", "id")]));
        assert!(config.tuya.is_none());
    }
}
