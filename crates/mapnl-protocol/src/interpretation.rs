use serde::{Deserialize, Serialize};

use crate::actions::{Action, ActionObject};

/// Marker attached to a rule-path result when no matcher applied.
pub const UNPARSED_MARKER: &str = "Could not parse command";

/// Which path produced an interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// A generation backend produced a JSON action array.
    Llm,
    /// The deterministic rule cascade handled the text.
    Rules,
}

/// Terminal outcome of a successful interpretation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    LlmSuccess,
    RuleSuccess,
    RuleEmpty,
}

/// Result of interpreting one free-text command.
///
/// `actions` is always a sequence, possibly empty, never a bare object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretationResult {
    pub actions: Vec<ActionObject>,
    pub method: Method,
    /// Provider that generated the actions (LLM path only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Non-fatal marker, set when the rule cascade found nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InterpretationResult {
    pub fn llm(actions: Vec<ActionObject>, provider: impl Into<String>) -> Self {
        Self {
            actions,
            method: Method::Llm,
            provider: Some(provider.into()),
            error: None,
        }
    }

    pub fn rules(action: Action) -> Self {
        Self {
            actions: vec![action.into()],
            method: Method::Rules,
            provider: None,
            error: None,
        }
    }

    pub fn unparsed() -> Self {
        Self {
            actions: Vec::new(),
            method: Method::Rules,
            provider: None,
            error: Some(UNPARSED_MARKER.into()),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self.method {
            Method::Llm => Outcome::LlmSuccess,
            Method::Rules if self.actions.is_empty() => Outcome::RuleEmpty,
            Method::Rules => Outcome::RuleSuccess,
        }
    }
}
