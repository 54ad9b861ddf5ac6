//! E2E tests for the rule cascade through the HTTP surface.
//!
//! The active provider is the keyless anthropic backend, so every request
//! goes straight to the cascade.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use helpers::TestHarness;

async fn harness() -> TestHarness {
    TestHarness::start("anthropic", false).await
}

async fn actions_for(h: &TestHarness, text: &str) -> Value {
    let (status, body) = h.interpret(text).await;
    assert_eq!(status, StatusCode::OK, "{text:?}");
    assert_eq!(body["method"], "rules", "{text:?}");
    body["actions"].clone()
}

#[tokio::test]
async fn e2e_every_matcher_reachable() {
    let h = harness().await;

    let cases = [
        ("zoom to 3x", json!({"type": "zoom", "mode": "to", "value": 3.0})),
        ("zoom in to 5x", json!({"type": "zoom", "mode": "to", "value": 5.0})),
        ("zoom out by 4x", json!({"type": "zoom", "mode": "by", "value": 0.25})),
        ("zoom out", json!({"type": "zoom_out"})),
        ("show full map", json!({"type": "zoom_out"})),
        ("Reset", json!({"type": "reset"})),
        ("zoom to lat 19.07 lon 72.87", json!({"type": "center", "lat": 19.07, "lon": 72.87})),
        ("goto station Howrah", json!({"type": "goto_station", "name": "howrah"})),
        (
            "start journey from agra to jaipur at 2.5x speed",
            json!({"type": "start_trip", "source": "agra", "destination": "jaipur", "speed": 2.5}),
        ),
        (
            "move camera backward by 15",
            json!({"type": "move_camera", "direction": "backward", "distance": 15.0, "duration": 2000}),
        ),
        (
            "camera position x=1 y=2 z=3",
            json!({"type": "camera_offset", "x": 1.0, "y": 2.0, "z": 3.0, "duration": 2000}),
        ),
        (
            "goto 22.57, 88.36",
            json!({"type": "goto_location", "lat": 22.57, "lon": 88.36, "altitude": 50.0, "duration": 2000}),
        ),
        ("13.08, 80.27", json!({"type": "center", "lat": 13.08, "lon": 80.27})),
    ];

    for (text, expected) in cases {
        assert_eq!(actions_for(&h, text).await, json!([expected]), "{text:?}");
    }
}

#[tokio::test]
async fn e2e_cascade_returns_at_most_one_action() {
    let h = harness().await;
    let actions = actions_for(&h, "zoom to 3x then reset then goto station agra").await;
    assert_eq!(actions, json!([{"type": "zoom", "mode": "to", "value": 3.0}]));
}

#[tokio::test]
async fn e2e_unmatched_is_empty_not_error() {
    let h = harness().await;
    let (status, body) = h.interpret("   what is the weather   ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["actions"], json!([]));
    assert_eq!(body["error"], "Could not parse command");
    assert!(body.get("provider").is_none());
}

#[tokio::test]
async fn e2e_cascade_is_deterministic() {
    let h = harness().await;
    let first = h.interpret("move camera left").await;
    for _ in 0..5 {
        assert_eq!(h.interpret("move camera left").await, first);
    }
}
