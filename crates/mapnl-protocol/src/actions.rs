use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One structured instruction for the map renderer.
///
/// Serialized as an internally tagged object: `{"type": "zoom", "mode": "to", "value": 3.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Zoom {
        mode: ZoomMode,
        value: f64,
    },
    ZoomOut {},
    Reset {},
    Center {
        lat: f64,
        lon: f64,
    },
    Pan {
        lat: f64,
        lon: f64,
    },
    GotoStation {
        name: String,
    },
    StartTrip {
        source: String,
        destination: String,
        #[serde(default = "default_trip_speed")]
        speed: f64,
    },
    MoveCamera {
        direction: CameraDirection,
        #[serde(default = "default_move_distance")]
        distance: f64,
        #[serde(default = "default_duration_ms")]
        duration: u64,
    },
    CameraOffset {
        x: f64,
        y: f64,
        z: f64,
        #[serde(default = "default_duration_ms")]
        duration: u64,
    },
    GotoLocation {
        lat: f64,
        lon: f64,
        #[serde(default = "default_goto_altitude")]
        altitude: f64,
        #[serde(default = "default_duration_ms")]
        duration: u64,
    },
    ShowLocationDetails {
        location: String,
        #[serde(default = "default_details_altitude")]
        altitude: f64,
        #[serde(default = "default_animate")]
        animate: bool,
    },
    ViewLocationTable {
        location: String,
        #[serde(default = "default_duration_ms")]
        duration: u64,
    },
}

/// Whether a zoom value is absolute or a relative factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomMode {
    To,
    By,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraDirection {
    Left,
    Right,
    Up,
    Down,
    Forward,
    Backward,
}

impl CameraDirection {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "forward" => Some(Self::Forward),
            "backward" => Some(Self::Backward),
            _ => None,
        }
    }
}

pub const DEFAULT_TRIP_SPEED: f64 = 3.0;
pub const DEFAULT_MOVE_DISTANCE: f64 = 10.0;
pub const DEFAULT_DURATION_MS: u64 = 2000;
pub const DEFAULT_GOTO_ALTITUDE: f64 = 50.0;
pub const DEFAULT_DETAILS_ALTITUDE: f64 = 17000.0;

fn default_trip_speed() -> f64 {
    DEFAULT_TRIP_SPEED
}
fn default_move_distance() -> f64 {
    DEFAULT_MOVE_DISTANCE
}
fn default_duration_ms() -> u64 {
    DEFAULT_DURATION_MS
}
fn default_goto_altitude() -> f64 {
    DEFAULT_GOTO_ALTITUDE
}
fn default_details_altitude() -> f64 {
    DEFAULT_DETAILS_ALTITUDE
}
fn default_animate() -> bool {
    true
}

/// Wire tag of an [`Action`], i.e. the value of its `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Zoom,
    ZoomOut,
    Reset,
    Center,
    Pan,
    GotoStation,
    StartTrip,
    MoveCamera,
    CameraOffset,
    GotoLocation,
    ShowLocationDetails,
    ViewLocationTable,
}

impl ActionKind {
    /// Every action kind, in the order they are presented to the model.
    pub const ALL: [ActionKind; 12] = [
        ActionKind::Zoom,
        ActionKind::Center,
        ActionKind::Pan,
        ActionKind::GotoStation,
        ActionKind::ZoomOut,
        ActionKind::Reset,
        ActionKind::StartTrip,
        ActionKind::MoveCamera,
        ActionKind::CameraOffset,
        ActionKind::GotoLocation,
        ActionKind::ShowLocationDetails,
        ActionKind::ViewLocationTable,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ActionKind::Zoom => "zoom",
            ActionKind::ZoomOut => "zoom_out",
            ActionKind::Reset => "reset",
            ActionKind::Center => "center",
            ActionKind::Pan => "pan",
            ActionKind::GotoStation => "goto_station",
            ActionKind::StartTrip => "start_trip",
            ActionKind::MoveCamera => "move_camera",
            ActionKind::CameraOffset => "camera_offset",
            ActionKind::GotoLocation => "goto_location",
            ActionKind::ShowLocationDetails => "show_location_details",
            ActionKind::ViewLocationTable => "view_location_table",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Parameter summary and usage hint, shared by the model prompt and `/api/actions`.
    pub fn description(self) -> &'static str {
        match self {
            ActionKind::Zoom => "(mode: to|by, value: number)",
            ActionKind::Center => "(lat, lon)",
            ActionKind::Pan => "(lat, lon)",
            ActionKind::GotoStation => {
                "(name) - automatically zooms to 400km radius around station"
            }
            ActionKind::ZoomOut => "- shows full India map",
            ActionKind::Reset => "- resets to full India view",
            ActionKind::StartTrip => {
                "(source: station name, destination: station name, speed: optional number default 3.0) \
                 - animates trip from source to destination"
            }
            ActionKind::MoveCamera => {
                "(direction: left|right|up|down|forward|backward, distance: number, duration: optional ms)"
            }
            ActionKind::CameraOffset => {
                "(x: number, y: number, z: number, duration: optional ms) - move camera by exact offset"
            }
            ActionKind::GotoLocation => {
                "(lat: number, lon: number, altitude: optional number, duration: optional ms) \
                 - move camera to specific location"
            }
            ActionKind::ShowLocationDetails => {
                "(location: string, altitude: optional number default 17000, animate: optional boolean \
                 default true) - shows detailed information about ANY location/city/station (e.g., Delhi, \
                 Mumbai, Kolkata, Chennai) with zoom animation and displays paginated data table. Extract \
                 the location name from the user's query"
            }
            ActionKind::ViewLocationTable => {
                "(location: string, duration: optional number default 2000) - navigates camera to an \
                 already-open location table. Use this when user says 'view [location]', 'go to [location] \
                 table', 'show [location] view'. This ONLY works if the table is already open"
            }
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Zoom { .. } => ActionKind::Zoom,
            Action::ZoomOut {} => ActionKind::ZoomOut,
            Action::Reset {} => ActionKind::Reset,
            Action::Center { .. } => ActionKind::Center,
            Action::Pan { .. } => ActionKind::Pan,
            Action::GotoStation { .. } => ActionKind::GotoStation,
            Action::StartTrip { .. } => ActionKind::StartTrip,
            Action::MoveCamera { .. } => ActionKind::MoveCamera,
            Action::CameraOffset { .. } => ActionKind::CameraOffset,
            Action::GotoLocation { .. } => ActionKind::GotoLocation,
            Action::ShowLocationDetails { .. } => ActionKind::ShowLocationDetails,
            Action::ViewLocationTable { .. } => ActionKind::ViewLocationTable,
        }
    }
}

/// Why a JSON value was rejected as an action.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("action is not a JSON object")]
    NotAnObject,

    #[error("action has no string \"type\" field")]
    MissingType,

    #[error("unknown action type: {0}")]
    UnknownType(String),
}

/// A validated action element as it travels on the wire.
///
/// Guaranteed to be a JSON object whose `type` names a known [`ActionKind`].
/// All other fields are carried through untouched, so model replies with
/// extra parameters reach the renderer as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionObject {
    kind: ActionKind,
    fields: Map<String, Value>,
}

impl ActionObject {
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Strictly decode into a typed [`Action`], applying field defaults.
    pub fn to_action(&self) -> Result<Action, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields.clone()))
    }
}

impl TryFrom<Value> for ActionObject {
    type Error = ActionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(fields) = value else {
            return Err(ActionError::NotAnObject);
        };
        let tag = fields
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ActionError::MissingType)?;
        let kind = ActionKind::from_tag(tag).ok_or_else(|| ActionError::UnknownType(tag.into()))?;
        Ok(Self { kind, fields })
    }
}

impl From<Action> for ActionObject {
    fn from(action: Action) -> Self {
        let kind = action.kind();
        let fields = match serde_json::to_value(&action) {
            Ok(Value::Object(map)) => map,
            _ => {
                let mut map = Map::new();
                map.insert("type".into(), Value::from(kind.tag()));
                map
            }
        };
        Self { kind, fields }
    }
}

impl Serialize for ActionObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ActionObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ActionObject::try_from(value).map_err(serde::de::Error::custom)
    }
}
