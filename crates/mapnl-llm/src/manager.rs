//! Registry of providers with a single active selection.
//!
//! The registry is fixed at construction. The active name is the only
//! mutable state and changes only through [`ProviderManager::switch`]. Each
//! `generate` call reads the active provider once, under the lock, and
//! releases the lock before any network I/O, so a concurrent switch resolves
//! to either the old or the new provider for that call.

use std::sync::{Arc, PoisonError, RwLock};

use mapnl_protocol::{ProviderInfo, ProviderListing, ProviderStatus, SamplingSummary};

use crate::anthropic::AnthropicProvider;
use crate::config::LlmConfig;
use crate::error::{LlmError, LlmResult};
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;
use crate::provider::LlmProvider;
use crate::vllm::VllmProvider;

/// Text produced by a provider, labelled with the provider that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub provider: String,
    pub text: String,
}

/// Owns every configured provider, the active selection and the fallback flag.
pub struct ProviderManager {
    providers: Vec<Arc<dyn LlmProvider>>,
    active: RwLock<String>,
    fallback_enabled: bool,
}

impl ProviderManager {
    /// Build a manager over `providers`. `active` must name one of them.
    pub fn new(
        providers: Vec<Arc<dyn LlmProvider>>,
        active: &str,
        fallback_enabled: bool,
    ) -> LlmResult<Self> {
        if !providers.iter().any(|p| p.name() == active) {
            return Err(LlmError::Configuration(active.to_string()));
        }
        tracing::info!(
            active,
            fallback_enabled,
            provider_count = providers.len(),
            "provider manager initialized"
        );
        Ok(Self {
            providers,
            active: RwLock::new(active.to_string()),
            fallback_enabled,
        })
    }

    /// Register the four HTTP backends from the `[llm]` config section.
    pub fn from_config(config: &LlmConfig) -> LlmResult<Self> {
        let providers: Vec<Arc<dyn LlmProvider>> = vec![
            Arc::new(OpenAiProvider::new(&config.openai)),
            Arc::new(OllamaProvider::new(&config.ollama)),
            Arc::new(VllmProvider::new(&config.vllm)),
            Arc::new(AnthropicProvider::new(&config.anthropic)),
        ];
        Self::new(providers, &config.provider, config.fallback_to_rules)
    }

    pub fn active_name(&self) -> String {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn fallback_enabled(&self) -> bool {
        self.fallback_enabled
    }

    pub fn provider(&self, name: &str) -> Option<Arc<dyn LlmProvider>> {
        self.providers.iter().find(|p| p.name() == name).cloned()
    }

    /// Snapshot of the currently active provider.
    pub fn active_provider(&self) -> LlmResult<Arc<dyn LlmProvider>> {
        let name = self.active_name();
        self.provider(&name).ok_or(LlmError::Configuration(name))
    }

    /// Make `name` the active provider.
    ///
    /// Fails without touching the selection if `name` is unregistered or the
    /// provider reports unavailable at the moment of the call.
    pub async fn switch(&self, name: &str) -> LlmResult<()> {
        let Some(provider) = self.provider(name) else {
            tracing::error!(provider = name, "invalid provider name");
            return Err(LlmError::Configuration(name.to_string()));
        };

        if !provider.is_available().await {
            tracing::error!(provider = name, "provider is not available");
            return Err(LlmError::Unavailable(name.to_string()));
        }

        *self.active.write().unwrap_or_else(PoisonError::into_inner) = name.to_string();
        tracing::info!(provider = name, "switched provider");
        Ok(())
    }

    /// Generate with the active provider, re-checking its availability first.
    ///
    /// Provider errors are returned verbatim.
    pub async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> LlmResult<Completion> {
        let provider = self.active_provider()?;
        let name = provider.name().to_string();

        if !provider.is_available().await {
            return Err(LlmError::Unavailable(name));
        }

        let text = provider.generate(prompt, system_prompt).await?;
        Ok(Completion {
            provider: name,
            text,
        })
    }

    /// Every registered provider with live availability.
    pub async fn list_providers(&self) -> Vec<ProviderInfo> {
        let active = self.active_name();
        let mut infos = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            infos.push(ProviderInfo {
                name: provider.name().to_string(),
                available: provider.is_available().await,
                active: provider.name() == active,
                config: provider.summary(),
            });
        }
        infos
    }

    pub async fn listing(&self) -> ProviderListing {
        ProviderListing {
            providers: self.list_providers().await,
            active: self.active_name(),
            fallback_enabled: self.fallback_enabled,
        }
    }

    /// Status of the active provider.
    pub async fn status(&self) -> LlmResult<ProviderStatus> {
        let provider = self.active_provider()?;
        let settings = provider.settings();
        Ok(ProviderStatus {
            active_provider: provider.name().to_string(),
            is_available: provider.is_available().await,
            fallback_enabled: self.fallback_enabled,
            config: SamplingSummary {
                model: settings.model.clone(),
                temperature: settings.temperature,
            },
        })
    }
}
