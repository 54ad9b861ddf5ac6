//! Provider configuration, loadable from TOML.

use std::time::Duration;

use serde::Deserialize;

/// Settings for one generation backend, as written in the config file.
///
/// Omitted model/temperature/URL fall back to per-backend defaults at
/// [`ProviderConfig::resolve`] time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderConfig {
    /// Credential for keyed backends.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Endpoint URL.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Model identifier.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Request a streamed reply (Ollama only).
    #[serde(default)]
    pub stream: bool,
    /// Generation request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Availability probe timeout in milliseconds.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

fn default_max_tokens() -> u32 {
    2048
}
fn default_top_p() -> f32 {
    1.0
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_probe_timeout_ms() -> u64 {
    2000
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: None,
            model: None,
            temperature: None,
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            stream: false,
            timeout_secs: default_timeout_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

/// Per-backend fallback values.
#[derive(Debug, Clone, Copy)]
pub struct BackendDefaults {
    pub api_url: Option<&'static str>,
    pub model: &'static str,
    pub temperature: f32,
}

/// A [`ProviderConfig`] with backend defaults applied. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub stream: bool,
    pub timeout: Duration,
    pub probe_timeout: Duration,
}

impl ProviderConfig {
    pub fn resolve(&self, defaults: &BackendDefaults) -> ResolvedConfig {
        ResolvedConfig {
            api_key: non_blank(self.api_key.as_deref()),
            api_url: non_blank(self.api_url.as_deref())
                .or_else(|| defaults.api_url.map(str::to_string)),
            model: non_blank(self.model.as_deref()).unwrap_or_else(|| defaults.model.into()),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            stream: self.stream,
            timeout: Duration::from_secs(self.timeout_secs),
            probe_timeout: Duration::from_millis(self.probe_timeout_ms),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The `[llm]` section: active provider, fallback flag, per-backend tables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlmConfig {
    /// Provider active at startup.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Use the rule cascade when the model path fails.
    #[serde(default = "default_fallback_to_rules")]
    pub fallback_to_rules: bool,
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub ollama: ProviderConfig,
    #[serde(default)]
    pub vllm: ProviderConfig,
    #[serde(default)]
    pub anthropic: ProviderConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_fallback_to_rules() -> bool {
    true
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            fallback_to_rules: default_fallback_to_rules(),
            openai: ProviderConfig::default(),
            ollama: ProviderConfig::default(),
            vllm: ProviderConfig::default(),
            anthropic: ProviderConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Fill missing credentials from `OPENAI_API_KEY` / `ANTHROPIC_API_KEY`.
    pub fn with_env_credentials(mut self) -> Self {
        self.apply_credentials(|key| std::env::var(key).ok());
        self
    }

    /// Fill missing credentials via `lookup`. Values from the file win.
    pub fn apply_credentials(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (section, var) in [
            (&mut self.openai, "OPENAI_API_KEY"),
            (&mut self.anthropic, "ANTHROPIC_API_KEY"),
        ] {
            if non_blank(section.api_key.as_deref()).is_none() {
                section.api_key = lookup(var).and_then(|v| non_blank(Some(v.as_str())));
            }
        }
    }
}
