//! Provider introspection and switching endpoints.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use mapnl_protocol::{ProviderListing, ProviderStatus};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for switching the active provider.
#[derive(Debug, Deserialize)]
pub struct SwitchRequest {
    pub provider: String,
}

#[derive(Debug, Serialize)]
pub struct SwitchResponse {
    pub success: bool,
    pub provider: String,
    pub message: String,
}

/// GET /api/llm/providers: every provider with live availability.
pub async fn list_providers(State(state): State<AppState>) -> Json<ProviderListing> {
    Json(state.manager.listing().await)
}

/// POST /api/llm/switch-provider: change the active provider.
pub async fn switch_provider(
    State(state): State<AppState>,
    Json(req): Json<SwitchRequest>,
) -> ApiResult<Json<SwitchResponse>> {
    let name = req.provider.trim().to_lowercase();
    state.manager.switch(&name).await.map_err(|e| {
        ApiError::BadRequest(format!(
            "provider {name} is not available or not configured ({e})"
        ))
    })?;

    Ok(Json(SwitchResponse {
        success: true,
        message: format!("Switched to {name} provider"),
        provider: name,
    }))
}

/// GET /api/llm/status: the active provider.
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<ProviderStatus>> {
    let status = state
        .manager
        .status()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(status))
}
