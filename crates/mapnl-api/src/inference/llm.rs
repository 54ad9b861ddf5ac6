//! LLM path: instruction prompt, JSON-array extraction, element validation.
//!
//! Models wrap their answer in prose or markdown fences often enough that
//! the reply is never parsed as-is. [`extract_json_array`] finds the first
//! top-level array with a bracket scan that understands strings and nesting,
//! so coordinate arrays inside action parameters do not end the match early.

use std::sync::LazyLock;

use serde_json::Value;

use mapnl_protocol::{ActionKind, ActionObject};

use super::InterpretError;

const PROMPT_HEADER: &str = "You are a map control assistant. Convert the user's natural-language \
instruction into a JSON array of actions for a map renderer.

Available actions:
";

const PROMPT_FOOTER: &str = r#"
Only output valid JSON: an array of action objects, no explanation.
Each object must have a "type" field naming one of the actions above.
Use several objects when the instruction asks for several steps.

Examples:
Instruction: zoom to 3x
JSON: [{"type": "zoom", "mode": "to", "value": 3}]

Instruction: go to New Delhi station and then zoom in by 2x
JSON: [{"type": "goto_station", "name": "New Delhi"}, {"type": "zoom", "mode": "by", "value": 2}]

Instruction: start a trip from Mumbai to Pune at 5x speed
JSON: [{"type": "start_trip", "source": "Mumbai", "destination": "Pune", "speed": 5}]

Instruction: show me details about the Taj Mahal
JSON: [{"type": "show_location_details", "location": "Taj Mahal"}]

Instruction: reset the view
JSON: [{"type": "reset"}]"#;

/// Instruction prompt enumerating the full action vocabulary.
pub static SYSTEM_PROMPT: LazyLock<String> = LazyLock::new(|| {
    let mut prompt = String::from(PROMPT_HEADER);
    for (i, kind) in ActionKind::ALL.iter().enumerate() {
        prompt.push_str(&format!("{}. {} - {}\n", i + 1, kind.tag(), kind.description()));
    }
    prompt.push_str(PROMPT_FOOTER);
    prompt
});

/// User turn for a single command.
pub fn user_prompt(text: &str) -> String {
    format!("Instruction: {text}\n\nJSON:")
}

/// First top-level JSON array in `text` that parses as an array.
///
/// A balanced candidate that fails to parse is skipped whole; scanning
/// resumes after it. Returns `None` for truncated or bracket-free replies.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut from = 0;

    while let Some(offset) = text[from..].find('[') {
        let start = from + offset;
        match balanced_end(bytes, start) {
            Some(end) => {
                let candidate = &text[start..=end];
                if serde_json::from_str::<Vec<Value>>(candidate).is_ok() {
                    return Some(candidate);
                }
                from = end + 1;
            }
            None => from = start + 1,
        }
    }
    None
}

/// Index of the bracket closing the one at `start`, skipping string contents.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut closers: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'[' => closers.push(b']'),
            b'{' => closers.push(b'}'),
            b']' | b'}' => {
                if closers.pop()? != b {
                    return None;
                }
                if closers.is_empty() {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract and validate the action array from a model reply.
///
/// Elements without a recognized `type` are dropped. An empty array is a
/// valid answer; a non-empty one where nothing survives is not.
pub fn parse_actions(reply: &str) -> Result<Vec<ActionObject>, InterpretError> {
    let json = extract_json_array(reply)
        .ok_or_else(|| InterpretError::MalformedResponse("no JSON array in reply".into()))?;
    let elements: Vec<Value> = serde_json::from_str(json)
        .map_err(|e| InterpretError::MalformedResponse(e.to_string()))?;

    let total = elements.len();
    let actions: Vec<ActionObject> = elements
        .into_iter()
        .filter_map(|element| match ActionObject::try_from(element) {
            Ok(action) => Some(action),
            Err(e) => {
                tracing::warn!(error = %e, "dropping invalid action element");
                None
            }
        })
        .collect();

    if total > 0 && actions.is_empty() {
        return Err(InterpretError::MalformedResponse(format!(
            "none of {total} elements is a recognized action"
        )));
    }
    Ok(actions)
}
