//! Command interpretation endpoint.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use mapnl_protocol::InterpretationResult;

use crate::error::ApiResult;
use crate::state::AppState;

/// Request body for interpreting a command.
#[derive(Debug, Deserialize)]
pub struct InterpretRequest {
    /// Natural-language command text.
    pub text: String,
}

/// POST /api/interpret-command: turn a command into renderer actions.
pub async fn interpret_command(
    State(state): State<AppState>,
    Json(req): Json<InterpretRequest>,
) -> ApiResult<Json<InterpretationResult>> {
    let result = state.interpreter.interpret(&req.text).await?;
    Ok(Json(result))
}
