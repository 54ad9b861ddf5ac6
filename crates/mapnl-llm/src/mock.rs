//! Mock provider for testing without a generation backend.
//!
//! Availability can be flipped at runtime, replies are fixed per instance,
//! and every `generate` call is recorded for assertion in tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ResolvedConfig;
use crate::error::{LlmError, LlmResult};
use crate::provider::{BackendKind, LlmProvider};

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Failure(String),
}

/// In-memory implementation of [`LlmProvider`].
///
/// Thread-safe via `Mutex` (fine for test contexts).
pub struct MockProvider {
    name: String,
    available: AtomicBool,
    reply: Mutex<MockReply>,
    calls: Mutex<Vec<(String, Option<String>)>>,
    settings: ResolvedConfig,
}

impl MockProvider {
    /// Available provider replying with an empty action array.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available: AtomicBool::new(true),
            reply: Mutex::new(MockReply::Text("[]".into())),
            calls: Mutex::new(Vec::new()),
            settings: ResolvedConfig {
                api_key: None,
                api_url: None,
                model: "mock-model".into(),
                temperature: 0.0,
                max_tokens: 2048,
                top_p: 1.0,
                stream: false,
                timeout: Duration::from_secs(30),
                probe_timeout: Duration::from_secs(2),
            },
        }
    }

    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.set_reply(text);
        self
    }

    pub fn with_failure(self, cause: impl Into<String>) -> Self {
        self.set_failure(cause);
        self
    }

    pub fn set_reply(&self, text: impl Into<String>) {
        *self.reply.lock().unwrap() = MockReply::Text(text.into());
    }

    /// Make every subsequent `generate` fail with a generation error.
    pub fn set_failure(&self, cause: impl Into<String>) {
        *self.reply.lock().unwrap() = MockReply::Failure(cause.into());
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Recorded `(prompt, system_prompt)` pairs.
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Keyed
    }

    fn settings(&self) -> &ResolvedConfig {
        &self.settings
    }

    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> LlmResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), system_prompt.map(str::to_string)));

        let reply = self.reply.lock().unwrap().clone();
        match reply {
            MockReply::Text(text) => Ok(text.trim().to_string()),
            MockReply::Failure(cause) => Err(LlmError::generation(&self.name, cause)),
        }
    }
}
