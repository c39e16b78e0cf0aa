//! Presence data model - snapshots as delivered by the presence API

use serde::{Deserialize, Deserializer, Serialize};

/// Activity kind codes used by the presence API.
pub mod kinds {
    pub const PLAYING: u8 = 0;
    pub const STREAMING: u8 = 1;
    pub const LISTENING: u8 = 2;
    pub const WATCHING: u8 = 3;
    pub const CUSTOM: u8 = 4;
    pub const COMPETING: u8 = 5;
}

/// Activity name the API reports for music listening.
pub const MUSIC_ACTIVITY_NAME: &str = "Spotify";

/// Discord status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Online,
    Idle,
    Dnd,
    Offline,
}

impl Default for Status {
    fn default() -> Self { Self::Offline }
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Online => "online",
            Status::Idle => "idle",
            Status::Dnd => "dnd",
            Status::Offline => "offline",
        }
    }

    /// Parse a status code. Unrecognized codes map to `Offline`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "online" => Status::Online,
            "idle" => Status::Idle,
            "dnd" => Status::Dnd,
            _ => Status::Offline,
        }
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = Option::<String>::deserialize(deserializer)?;
        Ok(code.map(|c| Status::from_code(&c)).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Emoji {
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One activity entry of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<Emoji>,
}

impl Activity {
    pub fn new(kind: u8, name: impl Into<String>) -> Self {
        Self { kind, name: name.into(), details: None, state: None, emoji: None }
    }
    pub fn with_details(mut self, d: impl Into<String>) -> Self { self.details = Some(d.into()); self }
    pub fn with_state(mut self, s: impl Into<String>) -> Self { self.state = Some(s.into()); self }
    pub fn with_emoji(mut self, name: impl Into<String>) -> Self {
        self.emoji = Some(Emoji { name: name.into(), id: None });
        self
    }

    pub fn is_music(&self) -> bool {
        self.name == MUSIC_ACTIVITY_NAME
    }

    pub fn is_custom_status(&self) -> bool {
        self.kind == kinds::CUSTOM
    }

    /// A "playing" entry that is neither music listening nor a custom status.
    pub fn is_playing(&self) -> bool {
        self.kind == kinds::PLAYING && !self.is_music() && !self.is_custom_status()
    }
}

/// Full presence state at a point in time. Replaced wholesale on every update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PresenceSnapshot {
    #[serde(default)]
    pub discord_status: Status,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub activities: Vec<Activity>,
}

impl PresenceSnapshot {
    pub fn new(status: Status) -> Self {
        Self { discord_status: status, activities: Vec::new() }
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Activity>, D::Error> {
    Ok(Option::<Vec<Activity>>::deserialize(deserializer)?.unwrap_or_default())
}
