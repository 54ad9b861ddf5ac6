//! Rule cascade: deterministic fallback parser for map commands.
//!
//! An ordered table of regex matchers run against the lower-cased command.
//! The first matcher that produces an action wins and nothing after it runs.
//! A numeric capture that fails to parse makes its matcher fall through to
//! the next one. Later rules are broader than earlier ones (the bare
//! coordinate pair matches almost anything with a comma), so the order of
//! [`CASCADE`] is part of the observable behavior.

use std::sync::LazyLock;

use regex::Regex;

use mapnl_protocol::{
    Action, CameraDirection, DEFAULT_DURATION_MS, DEFAULT_GOTO_ALTITUDE, DEFAULT_MOVE_DISTANCE,
    DEFAULT_TRIP_SPEED, InterpretationResult, ZoomMode,
};

/// A named matcher in the cascade.
pub struct Rule {
    pub name: &'static str,
    matcher: fn(&str) -> Option<Action>,
}

/// A successful cascade evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub rule: &'static str,
    pub action: Action,
}

/// Matchers in priority order.
pub static CASCADE: [Rule; 12] = [
    Rule { name: "zoom_to_factor", matcher: zoom_to_factor },
    Rule { name: "zoom_direction_to", matcher: zoom_direction_to },
    Rule { name: "zoom_direction_by", matcher: zoom_direction_by },
    Rule { name: "zoom_out_full", matcher: zoom_out_full },
    Rule { name: "reset", matcher: reset },
    Rule { name: "zoom_to_lat_lon", matcher: zoom_to_lat_lon },
    Rule { name: "goto_station", matcher: goto_station },
    Rule { name: "start_trip", matcher: start_trip },
    Rule { name: "move_camera", matcher: move_camera },
    Rule { name: "camera_offset", matcher: camera_offset },
    Rule { name: "goto_location", matcher: goto_location },
    Rule { name: "bare_coordinates", matcher: bare_coordinates },
];

/// Run the cascade over `text` (lower-cased internally).
pub fn parse_command(text: &str) -> Option<RuleMatch> {
    let lower = text.trim().to_lowercase();
    CASCADE.iter().find_map(|rule| {
        (rule.matcher)(&lower).map(|action| RuleMatch {
            rule: rule.name,
            action,
        })
    })
}

/// Cascade result as a wire-level interpretation. Never fails.
pub fn interpret(text: &str) -> InterpretationResult {
    match parse_command(text) {
        Some(hit) => {
            tracing::info!(rule = hit.rule, action = %hit.action.kind(), "rule cascade matched");
            InterpretationResult::rules(hit.action)
        }
        None => {
            tracing::info!(command = text, "rule cascade found no match");
            InterpretationResult::unparsed()
        }
    }
}

/// Parse a captured number, rejecting malformed and non-finite values.
fn number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ── Zoom ────────────────────────────────────────────────────────

static RE_ZOOM_TO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"zoom to (\d+(?:\.\d+)?)x").unwrap());

static RE_ZOOM_DIR_TO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"zoom (in|out) to (\d+(?:\.\d+)?)x").unwrap());

static RE_ZOOM_DIR_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"zoom (in|out) by (\d+(?:\.\d+)?)x").unwrap());

static RE_ZOOM_OUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"zoom\s+out(?:\s+to\s+india)?$").unwrap());

static RE_FULL_MAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"show\s+full\s+map").unwrap());

static RE_ZOOM_LAT_LON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"zoom to lat[:=\s]*([0-9.+-]+)\s*,?\s*lon[:=\s]*([0-9.+-]+)").unwrap()
});

fn zoom_to_factor(text: &str) -> Option<Action> {
    let caps = RE_ZOOM_TO.captures(text)?;
    Some(Action::Zoom {
        mode: ZoomMode::To,
        value: number(&caps[1])?,
    })
}

/// "zoom in to 3x" / "zoom out to 3x": the direction word is ignored.
fn zoom_direction_to(text: &str) -> Option<Action> {
    let caps = RE_ZOOM_DIR_TO.captures(text)?;
    Some(Action::Zoom {
        mode: ZoomMode::To,
        value: number(&caps[2])?,
    })
}

/// "zoom in by N x" → factor N, "zoom out by N x" → factor 1/N.
/// A zero factor falls through in either direction.
fn zoom_direction_by(text: &str) -> Option<Action> {
    let caps = RE_ZOOM_DIR_BY.captures(text)?;
    let value = number(&caps[2]).filter(|v| *v != 0.0)?;
    let factor = if &caps[1] == "in" { value } else { 1.0 / value };
    Some(Action::Zoom {
        mode: ZoomMode::By,
        value: factor,
    })
}

fn zoom_out_full(text: &str) -> Option<Action> {
    (RE_ZOOM_OUT.is_match(text) || RE_FULL_MAP.is_match(text)).then_some(Action::ZoomOut {})
}

fn reset(text: &str) -> Option<Action> {
    text.contains("reset").then_some(Action::Reset {})
}

fn zoom_to_lat_lon(text: &str) -> Option<Action> {
    let caps = RE_ZOOM_LAT_LON.captures(text)?;
    Some(Action::Center {
        lat: number(&caps[1])?,
        lon: number(&caps[2])?,
    })
}

// ── Stations & trips ────────────────────────────────────────────

static RE_GOTO_STATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"goto station (.+)").unwrap());

static RE_TRIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:start\s+)?(?:trip|journey)\s+from\s+([a-zA-Z\s]+?)\s+to\s+([a-zA-Z\s]+?)(?:\s+at\s+(\d+(?:\.\d+)?)x?\s*speed)?(?:\s|$)",
    )
    .unwrap()
});

fn goto_station(text: &str) -> Option<Action> {
    let caps = RE_GOTO_STATION.captures(text)?;
    let name = caps[1].trim();
    (!name.is_empty()).then(|| Action::GotoStation { name: name.into() })
}

fn start_trip(text: &str) -> Option<Action> {
    let caps = RE_TRIP.captures(text)?;
    let speed = match caps.get(3) {
        Some(m) => number(m.as_str())?,
        None => DEFAULT_TRIP_SPEED,
    };
    Some(Action::StartTrip {
        source: caps[1].trim().into(),
        destination: caps[2].trim().into(),
        speed,
    })
}

// ── Camera ──────────────────────────────────────────────────────

static RE_MOVE_CAMERA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"move\s+camera\s+(left|right|up|down|forward|backward)(?:\s+by\s+)?(\d+(?:\.\d+)?)?(?:\s+units?)?",
    )
    .unwrap()
});

static RE_CAMERA_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:move\s+camera\s+to|camera\s+position)\s+x[:=\s]*([0-9.+-]+)\s*y[:=\s]*([0-9.+-]+)\s*z[:=\s]*([0-9.+-]+)",
    )
    .unwrap()
});

static RE_GOTO_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:goto|move\s+(?:to|camera\s+to))\s+(?:location\s+)?(?:lat\s*)?([0-9.+-]+)\s*,?\s*(?:lon\s*)?([0-9.+-]+)",
    )
    .unwrap()
});

fn move_camera(text: &str) -> Option<Action> {
    let caps = RE_MOVE_CAMERA.captures(text)?;
    let direction = CameraDirection::from_word(&caps[1])?;
    let distance = match caps.get(2) {
        Some(m) => number(m.as_str())?,
        None => DEFAULT_MOVE_DISTANCE,
    };
    Some(Action::MoveCamera {
        direction,
        distance,
        duration: DEFAULT_DURATION_MS,
    })
}

fn camera_offset(text: &str) -> Option<Action> {
    let caps = RE_CAMERA_OFFSET.captures(text)?;
    Some(Action::CameraOffset {
        x: number(&caps[1])?,
        y: number(&caps[2])?,
        z: number(&caps[3])?,
        duration: DEFAULT_DURATION_MS,
    })
}

fn goto_location(text: &str) -> Option<Action> {
    let caps = RE_GOTO_LOCATION.captures(text)?;
    Some(Action::GotoLocation {
        lat: number(&caps[1])?,
        lon: number(&caps[2])?,
        altitude: DEFAULT_GOTO_ALTITUDE,
        duration: DEFAULT_DURATION_MS,
    })
}

// ── Catch-all ───────────────────────────────────────────────────

static RE_BARE_COORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9.+-]+)\s*,\s*([0-9.+-]+)").unwrap());

fn bare_coordinates(text: &str) -> Option<Action> {
    let caps = RE_BARE_COORDS.captures(text)?;
    Some(Action::Center {
        lat: number(&caps[1])?,
        lon: number(&caps[2])?,
    })
}
