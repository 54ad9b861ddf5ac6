//! Action vocabulary endpoint.

use axum::Json;
use serde::Serialize;

use mapnl_protocol::ActionKind;

#[derive(Debug, Serialize)]
pub struct ActionDescription {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ActionList {
    pub actions: Vec<ActionDescription>,
}

/// GET /api/actions: actions the renderer understands.
pub async fn list_actions() -> Json<ActionList> {
    Json(ActionList {
        actions: ActionKind::ALL
            .iter()
            .map(|kind| ActionDescription {
                kind: kind.tag(),
                description: kind.description(),
            })
            .collect(),
    })
}
