//! The provider capability set and helpers shared by the HTTP backends.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use mapnl_protocol::ProviderSummary;

use crate::config::ResolvedConfig;
use crate::error::{LlmError, LlmResult};

/// How a backend decides whether it is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Remote API, available iff a credential is configured.
    Keyed,
    /// Locally-reachable server, available iff a liveness probe succeeds.
    Server,
}

/// A backend able to turn a prompt into text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Registry name (e.g. "openai", "ollama").
    fn name(&self) -> &str;

    fn kind(&self) -> BackendKind;

    fn settings(&self) -> &ResolvedConfig;

    /// Whether the backend can serve a request right now.
    async fn is_available(&self) -> bool;

    /// Generate a completion for `prompt`, optionally preceded by a system prompt.
    ///
    /// Returns the first completion with surrounding whitespace trimmed. No retries.
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> LlmResult<String>;

    /// Non-secret configuration for introspection.
    fn summary(&self) -> ProviderSummary {
        let settings = self.settings();
        ProviderSummary {
            model: settings.model.clone(),
            api_url: match self.kind() {
                BackendKind::Server => settings.api_url.clone(),
                BackendKind::Keyed => None,
            },
        }
    }
}

/// A single chat message in a request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Optional system message first, then the user prompt.
pub fn build_messages<'a>(prompt: &'a str, system_prompt: Option<&'a str>) -> Vec<ChatMessage<'a>> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: prompt,
    });
    messages
}

/// GET `url` and report whether it answered 2xx within `timeout`.
pub(crate) async fn probe(client: &reqwest::Client, url: &str, timeout: Duration) -> bool {
    match client.get(url).timeout(timeout).send().await {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            tracing::debug!(url, error = %e, "liveness probe failed");
            false
        }
    }
}

/// Send a request and fail on transport errors or non-2xx status.
pub(crate) async fn send_checked(
    request: reqwest::RequestBuilder,
    provider: &str,
) -> LlmResult<reqwest::Response> {
    let response = request
        .send()
        .await
        .map_err(|e| LlmError::generation(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LlmError::generation(
            provider,
            format!("HTTP {status}: {}", body.trim()),
        ));
    }
    Ok(response)
}

/// Trim a completion, rejecting a missing one.
pub(crate) fn first_completion(content: Option<String>, provider: &str) -> LlmResult<String> {
    content
        .map(|c| c.trim().to_string())
        .ok_or_else(|| LlmError::generation(provider, "response contained no completion"))
}
