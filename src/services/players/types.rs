use std::{collections::BTreeMap, fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::RegistryError;

/// Identifier the browser assigns to a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TabId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(TabId)
    }
}

impl From<i64> for TabId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Current playback state of a tab's player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlaybackState {
    /// Media in the tab is playing
    Playing,

    /// Media in the tab is paused
    Paused,

    /// Nothing reported yet
    #[default]
    Stopped,
}

impl From<bool> for PlaybackState {
    fn from(playing: bool) -> Self {
        if playing { Self::Playing } else { Self::Paused }
    }
}

impl From<PlaybackState> for &'static str {
    fn from(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &'static str = (*self).into();
        f.write_str(name)
    }
}

/// Control operations a player can relay back to its tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlAction {
    /// Start playback
    Play,

    /// Pause playback
    Pause,

    /// Toggle between playing and paused
    PlayPause,

    /// Stop playback
    Stop,

    /// Skip to the next item
    Next,

    /// Go back to the previous item
    Previous,
}

impl ControlAction {
    /// Name sent to the browser in the `command` field.
    pub fn command_name(self) -> &'static str {
        match self {
            ControlAction::Play => "play",
            ControlAction::Pause => "pause",
            ControlAction::PlayPause => "playPause",
            ControlAction::Stop => "stop",
            ControlAction::Next => "next",
            ControlAction::Previous => "previous",
        }
    }
}

impl FromStr for ControlAction {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "play" => Ok(Self::Play),
            "pause" => Ok(Self::Pause),
            "play_pause" | "playPause" => Ok(Self::PlayPause),
            "stop" => Ok(Self::Stop),
            "next" => Ok(Self::Next),
            "previous" => Ok(Self::Previous),
            other => Err(RegistryError::UnknownAction(other.to_string())),
        }
    }
}

/// Artist as reported by the extension: a single name or a list
#[derive(Debug, Clone, PartialEq)]
pub enum ArtistField {
    /// One artist name
    One(String),
    /// Several artist names, first one is the primary artist
    Many(Vec<String>),
}

/// Media state reported by the extension for one tab.
///
/// Every field is optional; missing and `null` values fall back to the
/// defaults applied in [`Player::update_state`](super::Player::update_state).
/// A field of the wrong type is treated as missing rather than rejecting
/// the report, except `playing`, which takes the truthiness of any value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StateReport {
    /// Whether media is currently playing
    #[serde(deserialize_with = "deserialize_truthy")]
    pub playing: Option<bool>,

    /// Playback offset in seconds
    #[serde(deserialize_with = "deserialize_number")]
    pub position: Option<f64>,

    /// Track title
    #[serde(deserialize_with = "deserialize_text")]
    pub title: Option<String>,

    /// Track artist(s)
    #[serde(deserialize_with = "deserialize_artist")]
    pub artist: Option<ArtistField>,

    /// Album name
    #[serde(deserialize_with = "deserialize_text")]
    pub album: Option<String>,

    /// Track duration in seconds
    #[serde(deserialize_with = "deserialize_number")]
    pub duration: Option<f64>,
}

fn deserialize_truthy<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        Value::Null => None,
        Value::Bool(b) => Some(b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|n| n != 0.0)),
        Value::String(s) => Some(!s.is_empty()),
        Value::Array(items) => Some(!items.is_empty()),
        Value::Object(fields) => Some(!fields.is_empty()),
    }))
}

fn deserialize_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_f64))
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn deserialize_artist<'de, D>(deserializer: D) -> Result<Option<ArtistField>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(name)) => Some(ArtistField::One(name)),
        Some(Value::Array(items)) => Some(ArtistField::Many(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(name) => Some(name),
                    _ => None,
                })
                .collect(),
        )),
        _ => None,
    })
}

/// Track metadata kept for a player
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    /// Track title
    pub title: String,

    /// Track artists, never empty
    pub artist: Vec<String>,

    /// Album name
    pub album: String,

    /// Track length in microseconds
    pub length_micros: i64,
}

impl TrackMetadata {
    /// Metadata used before any report has been applied
    pub fn unknown() -> Self {
        Self {
            title: "Unknown".to_string(),
            artist: vec!["Unknown".to_string()],
            album: String::new(),
            length_micros: 0,
        }
    }

    /// Primary artist
    pub fn first_artist(&self) -> &str {
        self.artist.first().map_or("Unknown", String::as_str)
    }
}

impl From<&StateReport> for TrackMetadata {
    fn from(report: &StateReport) -> Self {
        let artist = match &report.artist {
            Some(ArtistField::One(name)) => vec![name.clone()],
            Some(ArtistField::Many(names)) if !names.is_empty() => names.clone(),
            Some(ArtistField::Many(_)) | None => vec!["Unknown".to_string()],
        };

        Self {
            title: report
                .title
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            artist,
            album: report.album.clone().unwrap_or_default(),
            length_micros: to_micros(report.duration.unwrap_or(0.0)),
        }
    }
}

/// Convert a duration in seconds to whole microseconds, truncating
pub fn to_micros(seconds: f64) -> i64 {
    (seconds * 1_000_000.0) as i64
}

/// A playback state transition observed during an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// State before the update
    pub old: PlaybackState,
    /// State after the update
    pub new: PlaybackState,
}

/// Events emitted by the registry
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    /// A player was created for a newly reported tab
    PlayerCreated(TabId),

    /// A player was removed after its tab closed
    PlayerRemoved(TabId),

    /// Player's playback state changed
    PlaybackChanged {
        /// Tab whose player changed state
        tab_id: TabId,
        /// State before the update
        old: PlaybackState,
        /// State after the update
        new: PlaybackState,
    },
}

/// Overall playback status across all tracked tabs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Whether at least one tab is playing
    pub playing: bool,

    /// Number of tracked tabs
    pub tab_count: usize,

    /// Playing tabs in ascending id order
    pub playing_tabs: Vec<TabId>,
}

/// Per-tab summary returned by `list_tabs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSummary {
    /// Whether the tab is playing
    pub playing: bool,

    /// Track title
    pub title: String,

    /// Primary artist
    pub artist: String,

    /// Playback state name
    pub status: String,
}

/// Summaries of every tracked tab keyed by the tab id as a string
pub type ListSnapshot = BTreeMap<String, TabSummary>;
