//! Provider and manager error types.

use std::fmt::Display;

use thiserror::Error;

/// Errors raised by providers and the provider manager.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// Referenced provider is not registered.
    #[error("unknown provider: {0}")]
    Configuration(String),

    /// Provider is not configured or not reachable right now.
    #[error("provider {0} is not available")]
    Unavailable(String),

    /// Transport or backend failure while generating.
    #[error("{provider} generation failed: {cause}")]
    Generation { provider: String, cause: String },
}

impl LlmError {
    pub fn generation(provider: impl Into<String>, cause: impl Display) -> Self {
        Self::Generation {
            provider: provider.into(),
            cause: cause.to_string(),
        }
    }
}

/// Convenience alias for provider results.
pub type LlmResult<T> = Result<T, LlmError>;
