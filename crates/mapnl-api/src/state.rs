//! Shared application state for the Axum server.

use std::sync::Arc;

use mapnl_llm::ProviderManager;

use crate::inference::CommandInterpreter;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Provider registry and active selection.
    pub manager: Arc<ProviderManager>,
    /// Command interpreter over the same manager.
    pub interpreter: Arc<CommandInterpreter>,
}

impl AppState {
    pub fn new(manager: Arc<ProviderManager>) -> Self {
        let interpreter = Arc::new(CommandInterpreter::new(Arc::clone(&manager)));
        Self {
            manager,
            interpreter,
        }
    }
}
