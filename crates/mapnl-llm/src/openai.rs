//! OpenAI chat-completions backend.
//!
//! The request/response types here are also used by [`crate::vllm`], which
//! speaks the same OpenAI-compatible wire format.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{BackendDefaults, ProviderConfig, ResolvedConfig};
use crate::error::{LlmError, LlmResult};
use crate::provider::{
    BackendKind, ChatMessage, LlmProvider, build_messages, first_completion, send_checked,
};

pub const PROVIDER_NAME: &str = "openai";

pub const DEFAULTS: BackendDefaults = BackendDefaults {
    api_url: Some("https://api.openai.com/v1/chat/completions"),
    model: "gpt-4o-mini-2024-07-18",
    temperature: 1.0,
};

/// Chat-completions request body.
#[derive(Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

/// Chat-completions response (only fields we need).
#[derive(Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Deserialize)]
pub(crate) struct ChoiceMessage {
    pub content: Option<String>,
}

/// POST an OpenAI-compatible chat completion and return the first choice.
pub(crate) async fn chat_completion(
    client: &reqwest::Client,
    provider: &str,
    url: &str,
    bearer: Option<&str>,
    settings: &ResolvedConfig,
    prompt: &str,
    system_prompt: Option<&str>,
) -> LlmResult<String> {
    let body = ChatCompletionRequest {
        model: &settings.model,
        messages: build_messages(prompt, system_prompt),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
        top_p: settings.top_p,
    };

    let mut request = client.post(url).timeout(settings.timeout).json(&body);
    if let Some(key) = bearer {
        request = request.bearer_auth(key);
    }

    let response: ChatCompletionResponse = send_checked(request, provider)
        .await?
        .json()
        .await
        .map_err(|e| LlmError::generation(provider, e))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content);
    first_completion(content, provider)
}

/// Keyed backend for the OpenAI API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    settings: ResolvedConfig,
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings: config.resolve(&DEFAULTS),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
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
        chat_completion(
            &self.client,
            PROVIDER_NAME,
            url,
            Some(key),
            &self.settings,
            prompt,
            system_prompt,
        )
        .await
    }
}
