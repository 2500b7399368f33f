//! VK API response shapes.
//!
//! Only the fields the bot uses are modelled; everything else is ignored.

use serde::{de::DeserializeOwned, Deserialize};

use vkm_core::{
    errors::Error,
    music::{Friend, Group, Identity, Playlist, Track},
    Result,
};

/// VK error code for "User authorization failed".
pub const AUTH_FAILED: i64 = 5;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: Option<T>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: String,
}

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Self {
        let msg = if e.error_msg.is_empty() {
            format!("VK error {}", e.error_code)
        } else {
            e.error_msg
        };
        if e.error_code == AUTH_FAILED {
            Error::Credential(msg)
        } else {
            Error::Remote(msg)
        }
    }
}

/// Unwrap `{"response": ...}` or turn `{"error": ...}` into an [`Error`].
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| Error::Remote(format!("malformed VK response: {e}")))?;
    if let Some(err) = envelope.error {
        return Err(err.into());
    }
    envelope
        .response
        .ok_or_else(|| Error::Remote("VK response has no payload".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct Items<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct AudioItem {
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    duration: Option<i64>,
    #[serde(default)]
    url: Option<String>,
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

impl From<AudioItem> for Track {
    fn from(item: AudioItem) -> Self {
        let defaults = Track::default();
        Track {
            artist: non_blank(item.artist).unwrap_or(defaults.artist),
            title: non_blank(item.title).unwrap_or(defaults.title),
            duration_seconds: item
                .duration
                .and_then(|d| u32::try_from(d).ok())
                .unwrap_or(0),
            playback_url: non_blank(item.url),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserItem {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl From<UserItem> for Identity {
    fn from(u: UserItem) -> Self {
        Identity {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

impl From<UserItem> for Friend {
    fn from(u: UserItem) -> Self {
        Friend {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GroupItem {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl From<GroupItem> for Group {
    fn from(g: GroupItem) -> Self {
        Group {
            id: g.id,
            name: g.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    pub id: i64,
    #[serde(default)]
    pub owner_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub count: u32,
}

impl From<PlaylistItem> for Playlist {
    fn from(p: PlaylistItem) -> Self {
        Playlist {
            id: p.id,
            owner_id: p.owner_id,
            title: p.title,
            count: p.count,
        }
    }
}
