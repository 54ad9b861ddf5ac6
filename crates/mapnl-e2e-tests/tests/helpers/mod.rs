//! Shared test harness for E2E integration tests.
//!
//! Builds the real provider manager from an `LlmConfig` whose server
//! backends point at wiremock servers, then drives the axum router.
//! The openai backend is keyed with a dummy key; anthropic has no key and is
//! therefore always unavailable.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mapnl_api::routes::build_router;
use mapnl_api::state::AppState;
use mapnl_llm::{LlmConfig, ProviderConfig, ProviderManager};

/// End-to-end harness: router + one mock server per HTTP backend.
pub struct TestHarness {
    pub state: AppState,
    pub router: Router,
    pub openai: MockServer,
    pub ollama: MockServer,
    pub vllm: MockServer,
}

fn backend(url: String) -> ProviderConfig {
    ProviderConfig {
        api_url: Some(url),
        timeout_secs: 2,
        probe_timeout_ms: 500,
        ..Default::default()
    }
}

impl TestHarness {
    /// Start mock servers and build the app with `active` selected.
    ///
    /// No routes are mounted: every server backend starts unavailable.
    pub async fn start(active: &str, fallback_to_rules: bool) -> Self {
        let openai = MockServer::start().await;
        let ollama = MockServer::start().await;
        let vllm = MockServer::start().await;

        let config = LlmConfig {
            provider: active.to_string(),
            fallback_to_rules,
            openai: ProviderConfig {
                api_key: Some("sk-test".into()),
                ..backend(format!("{}/v1/chat/completions", openai.uri()))
            },
            ollama: backend(format!("{}/api/chat", ollama.uri())),
            vllm: backend(format!("{}/v1/chat/completions", vllm.uri())),
            anthropic: ProviderConfig::default(),
        };

        let manager = Arc::new(ProviderManager::from_config(&config).unwrap());
        let state = AppState::new(manager);
        let router = build_router(state.clone());

        Self {
            state,
            router,
            openai,
            ollama,
            vllm,
        }
    }

    // ── Mock backends ───────────────────────────────────────────

    pub async fn ollama_healthy(&self) {
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": []})))
            .mount(&self.ollama)
            .await;
    }

    pub async fn ollama_replies(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "mistral:latest",
                "message": {"role": "assistant", "content": content},
                "done": true
            })))
            .mount(&self.ollama)
            .await;
    }

    pub async fn ollama_fails(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(status).set_body_string("model not loaded"))
            .mount(&self.ollama)
            .await;
    }

    pub async fn vllm_healthy(&self) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.vllm)
            .await;
    }

    pub async fn vllm_replies(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
            .mount(&self.vllm)
            .await;
    }

    pub async fn openai_replies(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
            .mount(&self.openai)
            .await;
    }

    /// Number of generation requests a server has received.
    pub async fn generation_calls(server: &MockServer) -> usize {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == "POST")
            .count()
    }

    // ── HTTP ────────────────────────────────────────────────────

    /// POST /api/interpret-command. Returns (status, JSON body).
    pub async fn interpret(&self, text: &str) -> (StatusCode, Value) {
        self.post("/api/interpret-command", json!({"text": text}))
            .await
    }

    /// POST /api/llm/switch-provider. Returns (status, JSON body).
    pub async fn switch(&self, provider: &str) -> (StatusCode, Value) {
        self.post("/api/llm/switch-provider", json!({"provider": provider}))
            .await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }
}

/// OpenAI-compatible chat completion body.
pub fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}
