//! Configuration management for the Coffee Inventory server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CIS_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::DEFAULT_TOP_N;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// In-memory store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Audit log configuration
    pub audit: AuditConfig,

    /// Stock analysis configuration
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
    /// JSON snapshot loaded into the store at startup
    #[serde(default)]
    pub seed_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuditConfig {
    /// Name recorded on every audit entry
    pub user_name: String,

    /// When false, mutations are applied without audit entries
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Length of the top performers lists
    pub top_n: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("CIS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("audit.user_name", "System")?
            .set_default("audit.enabled", true)?
            .set_default("analysis.top_n", DEFAULT_TOP_N as u64)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CIS_ prefix)
            .add_source(
                Environment::with_prefix("CIS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            audit: AuditConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            user_name: "System".to_string(),
            enabled: true,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.audit.user_name, "System");
        assert!(config.audit.enabled);
        assert_eq!(config.analysis.top_n, 5);
        assert!(config.store.seed_path.is_none());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }
}
