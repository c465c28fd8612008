use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Deserialize)]
pub struct ActivePlayer {
    #[serde(rename = "playerid")]
    pub id: i64,

    #[serde(rename = "type")]
    pub kind: String,
}

impl ActivePlayer {
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.kind == "video"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerProperties {
    #[serde(default)]
    pub videostreams: Vec<VideoStream>,
}

impl PlayerProperties {
    /// The first stream, once the player has reported a real width for it.
    #[must_use]
    pub fn described_stream(&self) -> Option<&VideoStream> {
        self.videostreams.first().filter(|s| s.width > 0)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct VideoStream {
    #[serde(default)]
    pub width: u32,

    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerItemResponse {
    pub item: PlayerItem,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerItem {
    #[serde(default)]
    pub label: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub showtitle: Option<String>,

    #[serde(default)]
    pub premiered: Option<String>,

    #[serde(default)]
    pub customproperties: HashMap<String, Value>,
}

impl PlayerItem {
    /// A custom property rendered as text; numbers are accepted, blanks are not.
    #[must_use]
    pub fn custom(&self, key: &str) -> Option<String> {
        match self.customproperties.get(key)? {
            Value::String(s) => non_empty(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    TvShow,
    Episode,
    Other,
}

impl MediaKind {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "movie" => Self::Movie,
            "tvshow" | "tv" => Self::TvShow,
            "episode" => Self::Episode,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn is_episodic(self) -> bool {
        matches!(self, Self::TvShow | Self::Episode)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Movie => "movie",
            Self::TvShow => "tvshow",
            Self::Episode => "episode",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}
