//! API server configuration.

use std::path::Path;

use serde::Deserialize;

use mapnl_llm::LlmConfig;

/// Top-level server configuration, loaded from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Provider selection, fallback flag and per-backend settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            llm: LlmConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is missing.
    ///
    /// Credentials absent from the file are taken from the environment.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };
        Ok(Self {
            llm: config.llm.with_env_credentials(),
            ..config
        })
    }

    /// Config path: first CLI argument, else `MAPNL_CONFIG`, else `config.toml`.
    pub fn path_from_env() -> String {
        std::env::args()
            .nth(1)
            .or_else(|| std::env::var("MAPNL_CONFIG").ok())
            .unwrap_or_else(|| "config.toml".to_string())
    }
}
