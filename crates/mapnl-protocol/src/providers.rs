use serde::{Deserialize, Serialize};

/// Non-secret configuration surfaced for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub model: String,
    /// Endpoint URL, only reported for locally-reachable server backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// One row of the provider listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    /// Live availability at the time of listing.
    pub available: bool,
    pub active: bool,
    pub config: ProviderSummary,
}

/// Response body for `GET /api/llm/providers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderListing {
    pub providers: Vec<ProviderInfo>,
    pub active: String,
    pub fallback_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingSummary {
    pub model: String,
    pub temperature: f32,
}

/// Response body for `GET /api/llm/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub active_provider: String,
    pub is_available: bool,
    pub fallback_enabled: bool,
    pub config: SamplingSummary,
}
