//! API route definitions and router builder.

pub mod actions;
pub mod health;
pub mod interpret;
pub mod providers;

use axum::Router;
use axum::http::Uri;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/interpret-command", post(interpret::interpret_command))
        .route("/actions", get(actions::list_actions))
        // Provider endpoints
        .route("/llm/providers", get(providers::list_providers))
        .route("/llm/switch-provider", post(providers::switch_provider))
        .route("/llm/status", get(providers::status));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {uri}"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use mapnl_llm::{LlmProvider, MockProvider, ProviderManager};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct Fixture {
        primary: Arc<MockProvider>,
        secondary: Arc<MockProvider>,
        state: AppState,
    }

    fn fixture(fallback: bool) -> Fixture {
        let primary = Arc::new(MockProvider::new("primary"));
        let secondary = Arc::new(MockProvider::new("secondary"));
        let providers = vec![
            Arc::clone(&primary) as Arc<dyn LlmProvider>,
            Arc::clone(&secondary) as Arc<dyn LlmProvider>,
        ];
        let manager = ProviderManager::new(providers, "primary", fallback).unwrap();
        Fixture {
            primary,
            secondary,
            state: AppState::new(Arc::new(manager)),
        }
    }

    fn app(fixture: &Fixture) -> Router {
        build_router(fixture.state.clone())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    // ── Health ──────────────────────────────────────────────────

    #[tokio::test]
    async fn health_returns_ok() {
        let f = fixture(true);
        let response = app(&f)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let f = fixture(true);
        let response = app(&f)
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["status"], 404);
    }

    // ── Interpret ───────────────────────────────────────────────

    #[tokio::test]
    async fn interpret_via_llm() {
        let f = fixture(true);
        f.primary
            .set_reply(r#"[{"type": "zoom", "mode": "to", "value": 4}]"#);

        let response = app(&f)
            .oneshot(post_json(
                "/api/interpret-command",
                json!({"text": "make it bigger"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["method"], "llm");
        assert_eq!(json["provider"], "primary");
        assert_eq!(
            json["actions"],
            json!([{"type": "zoom", "mode": "to", "value": 4}])
        );
    }

    #[tokio::test]
    async fn interpret_via_rules_when_unavailable() {
        let f = fixture(false);
        f.primary.set_available(false);

        let response = app(&f)
            .oneshot(post_json(
                "/api/interpret-command",
                json!({"text": "zoom out by 2x"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["method"], "rules");
        assert!(json.get("provider").is_none());
        assert_eq!(
            json["actions"],
            json!([{"type": "zoom", "mode": "by", "value": 0.5}])
        );
    }

    #[tokio::test]
    async fn interpret_unparsed_is_200_with_marker() {
        let f = fixture(true);
        f.primary.set_available(false);

        let response = app(&f)
            .oneshot(post_json("/api/interpret-command", json!({"text": "hmm"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["actions"], json!([]));
        assert_eq!(json["error"], "Could not parse command");
    }

    #[tokio::test]
    async fn interpret_error_without_fallback_is_500() {
        let f = fixture(false);
        f.primary.set_failure("HTTP 502: bad gateway");

        let response = app(&f)
            .oneshot(post_json("/api/interpret-command", json!({"text": "reset"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        let error = json["error"].as_str().unwrap();
        assert!(error.starts_with("LLM parsing failed:"));
        assert!(error.contains("bad gateway"));
        assert_eq!(json["stage"], "generate");
    }

    #[tokio::test]
    async fn interpret_missing_text_is_rejected() {
        let f = fixture(true);
        let response = app(&f)
            .oneshot(post_json("/api/interpret-command", json!({"command": "reset"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    // ── Providers ───────────────────────────────────────────────

    #[tokio::test]
    async fn list_providers() {
        let f = fixture(true);
        f.secondary.set_available(false);

        let response = app(&f)
            .oneshot(Request::get("/api/llm/providers").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["active"], "primary");
        assert_eq!(json["fallback_enabled"], true);
        assert_eq!(json["providers"][0]["name"], "primary");
        assert_eq!(json["providers"][0]["active"], true);
        assert_eq!(json["providers"][1]["available"], false);
        assert_eq!(json["providers"][1]["config"]["model"], "mock-model");
    }

    #[tokio::test]
    async fn switch_provider_lowercases_name() {
        let f = fixture(true);
        let response = app(&f)
            .oneshot(post_json(
                "/api/llm/switch-provider",
                json!({"provider": "SECONDARY"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["provider"], "secondary");
        assert_eq!(f.state.manager.active_name(), "secondary");
    }

    #[tokio::test]
    async fn switch_to_unavailable_is_400() {
        let f = fixture(true);
        f.secondary.set_available(false);

        let response = app(&f)
            .oneshot(post_json(
                "/api/llm/switch-provider",
                json!({"provider": "secondary"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(f.state.manager.active_name(), "primary");
    }

    #[tokio::test]
    async fn switch_to_unknown_is_400() {
        let f = fixture(true);
        let response = app(&f)
            .oneshot(post_json(
                "/api/llm/switch-provider",
                json!({"provider": "gemini"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["status"], 400);
        assert!(json["error"].as_str().unwrap().contains("gemini"));
    }

    #[tokio::test]
    async fn status_reports_active_provider() {
        let f = fixture(false);
        let response = app(&f)
            .oneshot(Request::get("/api/llm/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["active_provider"], "primary");
        assert_eq!(json["is_available"], true);
        assert_eq!(json["fallback_enabled"], false);
        assert_eq!(json["config"]["model"], "mock-model");
    }

    // ── Actions ─────────────────────────────────────────────────

    #[tokio::test]
    async fn list_actions_covers_vocabulary() {
        let f = fixture(true);
        let response = app(&f)
            .oneshot(Request::get("/api/actions").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let actions = json["actions"].as_array().unwrap();
        assert_eq!(actions.len(), 12);
        assert_eq!(actions[0]["type"], "zoom");
        assert!(actions.iter().any(|a| a["type"] == "view_location_table"));
        assert!(actions.iter().all(|a| a["description"].is_string()));
    }
}
