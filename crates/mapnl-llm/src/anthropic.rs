//! Anthropic Messages API backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{BackendDefaults, ProviderConfig, ResolvedConfig};
use crate::error::{LlmError, LlmResult};
use crate::provider::{
    BackendKind, ChatMessage, LlmProvider, build_messages, first_completion, send_checked,
};

pub const PROVIDER_NAME: &str = "anthropic";

const API_VERSION: &str = "2023-06-01";

pub const DEFAULTS: BackendDefaults = BackendDefaults {
    api_url: Some("https://api.anthropic.com/v1/messages"),
    model: "claude-3-5-sonnet-20241022",
    temperature: 0.7,
};

/// Messages API request body. The system prompt is a top-level field.
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

/// Keyed backend for the Anthropic API.
pub struct AnthropicProvider {
    client: reqwest::Client,
    settings: ResolvedConfig,
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings: config.resolve(&DEFAULTS),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Keyed
    }

    fn settings(&self) -> &ResolvedConfig {
        &self.settings
    }

    async fn is_available(&self) -> bool {
        self.settings.api_key.is_some()
    }

    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> LlmResult<String> {
        let Some(key) = self.settings.api_key.as_deref() else {
            return Err(LlmError::Unavailable(PROVIDER_NAME.into()));
        };
        let url = self.settings.api_url.as_deref().unwrap_or_default();

        let body = MessagesRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            system: system_prompt,
            messages: build_messages(prompt, None),
        };

        let request = self
            .client
            .post(url)
            .timeout(self.settings.timeout)
            .header("x-api-key", key)
            .header("anthropic-version", API_VERSION)
            .json(&body);

        let response: MessagesResponse = send_checked(request, PROVIDER_NAME)
            .await?
            .json()
            .await
            .map_err(|e| LlmError::generation(PROVIDER_NAME, e))?;

        let text = response
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text);
        first_completion(text, PROVIDER_NAME)
    }
}
