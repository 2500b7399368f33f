use std::{fmt, str::FromStr};

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// One audio record as returned by the remote API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub artist: String,
    pub title: String,
    pub duration_seconds: u32,
    pub playback_url: Option<String>,
}

impl Default for Track {
    fn default() -> Self {
        Self {
            artist: UNKNOWN_ARTIST.to_string(),
            title: UNKNOWN_TITLE.to_string(),
            duration_seconds: 0,
            playback_url: None,
        }
    }
}

impl Track {
    /// `m:ss`, minutes unpadded.
    pub fn duration_label(&self) -> String {
        format!(
            "{}:{:02}",
            self.duration_seconds / 60,
            self.duration_seconds % 60
        )
    }

    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

/// Tracks in server order. The position of a track is its address in
/// `play_audio_<index>` callbacks, so the list is never reordered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AudioList(Vec<Track>);

impl AudioList {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self(tracks)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.0.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.0
    }
}

impl From<Vec<Track>> for AudioList {
    fn from(tracks: Vec<Track>) -> Self {
        Self(tracks)
    }
}

impl FromIterator<Track> for AudioList {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Where the current list came from; decides where "back" leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceTag {
    MyMusic,
    FriendsMusic,
    GroupsMusic,
    Playlists,
    Recommendations,
    AlgorithmicMixes,
    Search,
}

impl SourceTag {
    pub const ALL: [SourceTag; 7] = [
        SourceTag::MyMusic,
        SourceTag::FriendsMusic,
        SourceTag::GroupsMusic,
        SourceTag::Playlists,
        SourceTag::Recommendations,
        SourceTag::AlgorithmicMixes,
        SourceTag::Search,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceTag::MyMusic => "my_music",
            SourceTag::FriendsMusic => "friends_music",
            SourceTag::GroupsMusic => "groups_music",
            SourceTag::Playlists => "playlists",
            SourceTag::Recommendations => "recommendations",
            SourceTag::AlgorithmicMixes => "algorithmic_mixes",
            SourceTag::Search => "search",
        }
    }

    /// Callback data of the button that reopens this source.
    pub fn menu_command(self) -> &'static str {
        match self {
            SourceTag::Search => "search_music",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or(())
    }
}

/// The account owner behind an access token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Identity {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Friend {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playlist {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub count: u32,
}
