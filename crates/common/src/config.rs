//! Configuration structures for ToyStand
//!
//! Configurations are loaded from an optional YAML file and can be
//! overridden by environment variables.

use crate::error::{Result, ToyStandError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable naming the YAML config file
pub const CONFIG_PATH_ENV: &str = "TOYSTAND_CONFIG";

/// Routes of the deployments this build knows how to construct
pub const KNOWN_DEPLOYMENTS: &[&str] = &["calculator", "fruit-stand"];

/// Top-level configuration for the ToyStand gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToyStandConfig {
    /// Server binding address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path segment the deployment API is mounted under
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,

    /// Deployments to register at startup, by route
    #[serde(default = "default_deployments")]
    pub deployments: Vec<String>,

    /// Model reference handed to every deployment
    #[serde(default)]
    pub model: ModelConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Model reference passed to deployments at construction
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelConfig {
    /// Model name/identifier
    #[serde(default = "default_model_url")]
    pub model_url: String,

    /// Hugging Face access token
    #[serde(default)]
    pub hf_token: Option<String>,
}

// Keeps the token out of logs.
impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("model_url", &self.model_url)
            .field("hf_token", &self.hf_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_url: default_model_url(),
            hf_token: None,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Expose Prometheus metrics on /metrics
    #[serde(default = "default_metrics")]
    pub enable_metrics: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            enable_metrics: default_metrics(),
        }
    }
}

/// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_route_prefix() -> String {
    "/v1".to_string()
}

fn default_deployments() -> Vec<String> {
    KNOWN_DEPLOYMENTS.iter().map(|d| d.to_string()).collect()
}

fn default_model_url() -> String {
    "meta-llama/Llama-3.1-8B-Instruct".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics() -> bool {
    true
}

impl Default for ToyStandConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            route_prefix: default_route_prefix(),
            deployments: default_deployments(),
            model: ModelConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ToyStandConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ToyStandError::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

        let config: ToyStandConfig = serde_yaml::from_str(&content)
            .map_err(|e| ToyStandError::Config(format!("Failed to parse config file {}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration the way the gateway binary does
    ///
    /// Reads the file named by `TOYSTAND_CONFIG` when set (defaults
    /// otherwise), then applies environment overrides and validates.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        config.apply_env_overrides_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// Recognized keys: `MODEL_URL`, `HF_TOKEN`, `TOYSTAND_BIND_ADDRESS`,
    /// `TOYSTAND_PORT`.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model_url) = lookup("MODEL_URL") {
            self.model.model_url = model_url;
        }
        if let Some(token) = lookup("HF_TOKEN") {
            self.model.hf_token = Some(token);
        }
        if let Some(bind_address) = lookup("TOYSTAND_BIND_ADDRESS") {
            self.bind_address = bind_address;
        }
        if let Some(port) = lookup("TOYSTAND_PORT") {
            self.port = port
                .parse()
                .map_err(|_| ToyStandError::Config(format!("Invalid port number: {}", port)))?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ToyStandError::config("Port must be non-zero"));
        }

        if !self.route_prefix.starts_with('/') {
            return Err(ToyStandError::config(format!(
                "Route prefix must start with '/': {}",
                self.route_prefix
            )));
        }
        if self.route_prefix.len() > 1 && self.route_prefix.ends_with('/') {
            return Err(ToyStandError::config(format!(
                "Route prefix must not end with '/': {}",
                self.route_prefix
            )));
        }

        if self.deployments.is_empty() {
            return Err(ToyStandError::config("At least one deployment is required"));
        }

        let mut seen = HashSet::new();
        for name in &self.deployments {
            if !KNOWN_DEPLOYMENTS.contains(&name.as_str()) {
                return Err(ToyStandError::config(format!("Unknown deployment: {}", name)));
            }
            if !seen.insert(name.as_str()) {
                return Err(ToyStandError::config(format!("Duplicate deployment: {}", name)));
            }
        }

        Ok(())
    }

    /// Socket address the HTTP listener binds to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.bind_address, self.port).parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ToyStandConfig::default();

        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.route_prefix, "/v1");
        assert_eq!(config.deployments, vec!["calculator", "fruit-stand"]);
        assert_eq!(config.model.model_url, "meta-llama/Llama-3.1-8B-Instruct");
        assert!(config.model.hf_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ToyStandConfig::default();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn test_config_validation_bad_prefix() {
        let mut config = ToyStandConfig::default();
        config.route_prefix = "v1".to_string();
        assert!(config.validate().is_err());

        config.route_prefix = "/v1/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_deployments() {
        let mut config = ToyStandConfig::default();
        config.deployments = vec![];
        assert!(config.validate().is_err());

        config.deployments = vec!["pizza-oven".to_string()];
        assert!(config.validate().is_err());

        config.deployments = vec!["calculator".to_string(), "calculator".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("MODEL_URL", "local/tiny-model"),
            ("HF_TOKEN", "hf_secret"),
            ("TOYSTAND_PORT", "9000"),
        ]
        .into_iter()
        .collect();

        let mut config = ToyStandConfig::default();
        config
            .apply_env_overrides_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.model.model_url, "local/tiny-model");
        assert_eq!(config.model.hf_token.as_deref(), Some("hf_secret"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind_address, "0.0.0.0");
    }

    #[test]
    fn test_env_override_invalid_port() {
        let mut config = ToyStandConfig::default();
        let result = config.apply_env_overrides_with(|key| {
            (key == "TOYSTAND_PORT").then(|| "eighty".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_model_config_debug_redacts_token() {
        let model = ModelConfig {
            model_url: "m".to_string(),
            hf_token: Some("hf_secret".to_string()),
        };
        let rendered = format!("{:?}", model);
        assert!(!rendered.contains("hf_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_from_file_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 8080\nroute_prefix: /api\ndeployments: [fruit-stand]").unwrap();

        let config = ToyStandConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.route_prefix, "/api");
        assert_eq!(config.deployments, vec!["fruit-stand"]);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert!(config.observability.enable_metrics);
    }

    #[test]
    fn test_from_file_missing() {
        let result = ToyStandConfig::from_file("/nonexistent/toystand.yaml");
        assert!(matches!(result, Err(ToyStandError::Config(_))));
    }
}
