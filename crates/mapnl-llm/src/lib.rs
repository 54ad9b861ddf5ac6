//! Text-generation providers for command interpretation.
//!
//! - `LlmProvider` trait over `{generate, is_available}` (mockable in tests)
//! - Keyed remote backends: `OpenAiProvider`, `AnthropicProvider`
//! - Locally-reachable server backends: `OllamaProvider`, `VllmProvider`
//! - `ProviderManager` owning the registry, the active selection and the
//!   rule-fallback flag
//! - `MockProvider` for testing without a backend

pub mod anthropic;
pub mod config;
pub mod error;
pub mod manager;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod vllm;

// Re-exports for convenience.
pub use anthropic::AnthropicProvider;
pub use config::{BackendDefaults, LlmConfig, ProviderConfig, ResolvedConfig};
pub use error::{LlmError, LlmResult};
pub use manager::{Completion, ProviderManager};
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use provider::{BackendKind, ChatMessage, LlmProvider};
pub use vllm::VllmProvider;
