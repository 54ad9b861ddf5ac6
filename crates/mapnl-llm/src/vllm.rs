//! vLLM backend (OpenAI-compatible server).
//!
//! Unavailable when no URL is configured. Liveness is `GET {root}/health`
//! where `root` is the configured URL cut before `/v1/`.

use async_trait::async_trait;

use crate::config::{BackendDefaults, ProviderConfig, ResolvedConfig};
use crate::error::{LlmError, LlmResult};
use crate::openai::chat_completion;
use crate::provider::{BackendKind, LlmProvider, probe};

pub const PROVIDER_NAME: &str = "vllm";

pub const DEFAULTS: BackendDefaults = BackendDefaults {
    api_url: None,
    model: "/models",
    temperature: 0.7,
};

pub struct VllmProvider {
    client: reqwest::Client,
    settings: ResolvedConfig,
}

impl VllmProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings: config.resolve(&DEFAULTS),
        }
    }

    fn health_url(&self) -> Option<String> {
        let url = self.settings.api_url.as_deref()?;
        let root = match url.rsplit_once("/v1/") {
            Some((root, _)) => root,
            None => url.trim_end_matches('/'),
        };
        Some(format!("{root}/health"))
    }
}

#[async_trait]
impl LlmProvider for VllmProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Server
    }

    fn settings(&self) -> &ResolvedConfig {
        &self.settings
    }

    /// Availability comes from `GET /health` alone; the completions endpoint is never tried.
    async fn is_available(&self) -> bool {
        match self.health_url() {
            Some(url) => probe(&self.client, &url, self.settings.probe_timeout).await,
            None => false,
        }
    }

    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> LlmResult<String> {
        let Some(url) = self.settings.api_url.as_deref() else {
            return Err(LlmError::Unavailable(PROVIDER_NAME.into()));
        };
        chat_completion(
            &self.client,
            PROVIDER_NAME,
            url,
            None,
            &self.settings,
            prompt,
            system_prompt,
        )
        .await
    }
}
