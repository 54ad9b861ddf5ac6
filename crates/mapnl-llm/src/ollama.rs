//! Ollama backend for a locally-reachable inference server.
//!
//! Availability is a live `GET /api/tags` probe; generation calls
//! `/api/chat`. With `stream = true` the reply is NDJSON and the content
//! fragments of every line are concatenated.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{BackendDefaults, ProviderConfig, ResolvedConfig};
use crate::error::{LlmError, LlmResult};
use crate::provider::{
    BackendKind, ChatMessage, LlmProvider, build_messages, first_completion, probe, send_checked,
};

pub const PROVIDER_NAME: &str = "ollama";

pub const DEFAULTS: BackendDefaults = BackendDefaults {
    api_url: Some("http://localhost:11434/api/chat"),
    model: "mistral:latest",
    temperature: 0.7,
};

/// Ollama chat API request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: u32,
    top_p: f32,
}

/// Ollama chat API response, or one line of a streamed reply.
#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Server backend for Ollama.
pub struct OllamaProvider {
    client: reqwest::Client,
    settings: ResolvedConfig,
}

impl OllamaProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings: config.resolve(&DEFAULTS),
        }
    }

    fn chat_url(&self) -> &str {
        self.settings
            .api_url
            .as_deref()
            .or(DEFAULTS.api_url)
            .unwrap_or_default()
    }

    /// `http://host:11434/api/chat` → `http://host:11434/api/tags`.
    fn tags_url(&self) -> String {
        let url = self.chat_url();
        let base = match url.rsplit_once("/api/") {
            Some((base, _)) => base,
            None => url.trim_end_matches('/'),
        };
        format!("{base}/api/tags")
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Server
    }

    fn settings(&self) -> &ResolvedConfig {
        &self.settings
    }

    async fn is_available(&self) -> bool {
        probe(&self.client, &self.tags_url(), self.settings.probe_timeout).await
    }

    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> LlmResult<String> {
        let body = ChatRequest {
            model: &self.settings.model,
            messages: build_messages(prompt, system_prompt),
            stream: self.settings.stream,
            options: ChatOptions {
                temperature: self.settings.temperature,
                num_predict: self.settings.max_tokens,
                top_p: self.settings.top_p,
            },
        };

        let request = self
            .client
            .post(self.chat_url())
            .timeout(self.settings.timeout)
            .json(&body);
        let response = send_checked(request, PROVIDER_NAME).await?;

        let content = if self.settings.stream {
            let raw = response
                .text()
                .await
                .map_err(|e| LlmError::generation(PROVIDER_NAME, e))?;
            concat_stream(&raw)?
        } else {
            let chat: ChatResponse = response
                .json()
                .await
                .map_err(|e| LlmError::generation(PROVIDER_NAME, e))?;
            chat.message.map(|m| m.content)
        };
        first_completion(content, PROVIDER_NAME)
    }
}

/// Join the `message.content` fragments of an NDJSON stream.
fn concat_stream(raw: &str) -> LlmResult<Option<String>> {
    let mut content: Option<String> = None;
    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let chunk: ChatResponse =
            serde_json::from_str(line).map_err(|e| LlmError::generation(PROVIDER_NAME, e))?;
        if let Some(message) = chunk.message {
            content.get_or_insert_with(String::new).push_str(&message.content);
        }
    }
    Ok(content)
}
