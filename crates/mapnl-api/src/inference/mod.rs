//! Natural-language command interpretation.
//!
//! Converts map commands ("zoom to 3x", "trip from pune to goa") into
//! renderer actions.
//!
//! Two tiers:
//! - **LLM** (active provider): may return several actions per command.
//! - **Rule cascade** (local): ordered regex matchers, at most one action.
//!
//! The rule cascade runs when the active provider is unavailable, or when
//! the LLM path fails and fallback is enabled.

pub mod llm;
pub mod rules;

use std::sync::Arc;

use mapnl_llm::{LlmError, ProviderManager};
use mapnl_protocol::InterpretationResult;

/// Errors from the LLM path that were not absorbed by the rule cascade.
#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl InterpretError {
    /// Pipeline stage that produced the error, for logs and error bodies.
    pub fn stage(&self) -> &'static str {
        match self {
            InterpretError::Llm(LlmError::Configuration(_)) => "select",
            InterpretError::Llm(LlmError::Unavailable(_)) => "availability",
            InterpretError::Llm(LlmError::Generation { .. }) => "generate",
            InterpretError::MalformedResponse(_) => "extract",
        }
    }
}

/// Per-request interpreter over a shared provider manager.
pub struct CommandInterpreter {
    manager: Arc<ProviderManager>,
}

impl CommandInterpreter {
    pub fn new(manager: Arc<ProviderManager>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &Arc<ProviderManager> {
        &self.manager
    }

    /// Interpret one command.
    ///
    /// Only fails when the LLM path fails with fallback disabled. An
    /// unavailable provider always goes to the rule cascade.
    pub async fn interpret(&self, text: &str) -> Result<InterpretationResult, InterpretError> {
        let text = text.trim();
        let provider = self.manager.active_name();
        tracing::info!(command = text, provider = %provider, "interpreting command");

        match self.interpret_with_llm(text).await {
            Ok(result) => {
                tracing::info!(
                    provider = result.provider.as_deref().unwrap_or_default(),
                    actions = result.actions.len(),
                    "LLM interpretation succeeded"
                );
                return Ok(result);
            }
            Err(InterpretError::Llm(LlmError::Unavailable(name))) => {
                tracing::info!(provider = %name, "provider unavailable, using rule cascade");
            }
            Err(e) if self.manager.fallback_enabled() => {
                tracing::warn!(
                    provider = %provider,
                    stage = e.stage(),
                    error = %e,
                    "LLM parsing failed, falling back to rule cascade"
                );
            }
            Err(e) => {
                tracing::error!(
                    provider = %provider,
                    stage = e.stage(),
                    error = %e,
                    "LLM parsing failed and fallback is disabled"
                );
                return Err(e);
            }
        }

        Ok(rules::interpret(text))
    }

    async fn interpret_with_llm(&self, text: &str) -> Result<InterpretationResult, InterpretError> {
        let completion = self
            .manager
            .generate(&llm::user_prompt(text), Some(llm::SYSTEM_PROMPT.as_str()))
            .await?;
        let actions = llm::parse_actions(&completion.text)?;
        Ok(InterpretationResult::llm(actions, completion.provider))
    }
}
