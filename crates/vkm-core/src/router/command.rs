//! Callback data grammar.
//!
//! Button payloads are short `_`-joined ASCII tokens. Classification walks an
//! ordered rule table and the first matching rule wins, so a longer prefix must
//! be listed before any shorter prefix it extends (`play_audio_page_` before
//! `play_audio_`).

use std::{fmt, str::FromStr};

use crate::{errors::Error, music::SourceTag, Result};

/// Which list a `friend_`/`group_`/`playlist_` button opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubList {
    Friend,
    Group,
    Playlist,
}

impl SubList {
    pub fn prefix(self) -> &'static str {
        match self {
            SubList::Friend => "friend_",
            SubList::Group => "group_",
            SubList::Playlist => "playlist_",
        }
    }

    /// Sub-lists report the coarse parent tag so "back" returns to the
    /// parent listing rather than the specific friend/group/playlist.
    pub fn source(self) -> SourceTag {
        match self {
            SubList::Friend => SourceTag::FriendsMusic,
            SubList::Group => SourceTag::GroupsMusic,
            SubList::Playlist => SourceTag::Playlists,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackCommand {
    MainMenu,
    Noop,
    SetToken,
    Info,
    ProgramInfo,
    TokenManagement,
    CheckToken,
    /// One of the top-level sources; `Search` opens the search prompt.
    Browse(SourceTag),
    Open(SubList, String),
    /// Page start index as sent; clamped by the router.
    Page(i64),
    Play(usize),
    Unknown(String),
}

const PAGE_PREFIX: &str = "play_audio_page_";
const PLAY_PREFIX: &str = "play_audio_";

#[derive(Clone, Copy)]
enum Matcher {
    Exact(&'static str),
    Prefix(&'static str),
}

impl Matcher {
    /// The part after the matched token, if it matches.
    fn strip<'a>(&self, data: &'a str) -> Option<&'a str> {
        match self {
            Matcher::Exact(lit) => (data == *lit).then_some(""),
            Matcher::Prefix(prefix) => data.strip_prefix(prefix),
        }
    }
}

/// What a matched rule produces.
#[derive(Clone, Copy)]
enum Kind {
    MainMenu,
    Noop,
    SetToken,
    Info,
    ProgramInfo,
    TokenManagement,
    CheckToken,
    Browse(SourceTag),
    Open(SubList),
    Page,
    Play,
}

/// Evaluated top to bottom.
const RULES: &[(Matcher, Kind)] = &[
    (Matcher::Exact("main_menu"), Kind::MainMenu),
    (Matcher::Exact("noop"), Kind::Noop),
    (Matcher::Exact("set_token"), Kind::SetToken),
    (Matcher::Exact("info"), Kind::Info),
    (Matcher::Exact("program_info"), Kind::ProgramInfo),
    (Matcher::Exact("token_management"), Kind::TokenManagement),
    (Matcher::Exact("check_token"), Kind::CheckToken),
    (Matcher::Exact("my_music"), Kind::Browse(SourceTag::MyMusic)),
    (Matcher::Exact("friends_music"), Kind::Browse(SourceTag::FriendsMusic)),
    (Matcher::Exact("groups_music"), Kind::Browse(SourceTag::GroupsMusic)),
    (Matcher::Exact("playlists"), Kind::Browse(SourceTag::Playlists)),
    (Matcher::Exact("recommendations"), Kind::Browse(SourceTag::Recommendations)),
    (Matcher::Exact("algorithmic_mixes"), Kind::Browse(SourceTag::AlgorithmicMixes)),
    (Matcher::Exact("search_music"), Kind::Browse(SourceTag::Search)),
    (Matcher::Exact("search"), Kind::Browse(SourceTag::Search)),
    (Matcher::Prefix("friend_"), Kind::Open(SubList::Friend)),
    (Matcher::Prefix("group_"), Kind::Open(SubList::Group)),
    (Matcher::Prefix("playlist_"), Kind::Open(SubList::Playlist)),
    (Matcher::Prefix(PAGE_PREFIX), Kind::Page),
    (Matcher::Prefix(PLAY_PREFIX), Kind::Play),
];

fn build(kind: Kind, data: &str, rest: &str) -> Result<CallbackCommand> {
    Ok(match kind {
        Kind::MainMenu => CallbackCommand::MainMenu,
        Kind::Noop => CallbackCommand::Noop,
        Kind::SetToken => CallbackCommand::SetToken,
        Kind::Info => CallbackCommand::Info,
        Kind::ProgramInfo => CallbackCommand::ProgramInfo,
        Kind::TokenManagement => CallbackCommand::TokenManagement,
        Kind::CheckToken => CallbackCommand::CheckToken,
        Kind::Browse(tag) => CallbackCommand::Browse(tag),
        Kind::Open(sub) => open(sub, data, rest)?,
        Kind::Page => page(data, rest)?,
        Kind::Play => play(data)?,
    })
}

fn open(kind: SubList, data: &str, rest: &str) -> Result<CallbackCommand> {
    let id = rest.split('_').next().unwrap_or_default();
    if id.is_empty() {
        return Err(Error::MalformedCommand(format!("{data}: missing id")));
    }
    Ok(CallbackCommand::Open(kind, id.to_string()))
}

/// Plain ASCII decimal digits, saturating at `i64::MAX`. Signs, spaces and
/// empty input are rejected.
fn digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.bytes().fold(0i64, |n, b| {
        n.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    }))
}

/// Page starts may be negative (clamped to the first page later) and may be
/// arbitrarily large (clamped to the last page).
fn page(data: &str, rest: &str) -> Result<CallbackCommand> {
    let (negative, body) = match rest.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, rest),
    };
    let start = digits(body)
        .ok_or_else(|| Error::MalformedCommand(format!("{data}: bad page index")))?;
    Ok(CallbackCommand::Page(if negative { -start } else { start }))
}

/// Track selection must be exactly `play`, `audio`, `<index>`.
fn play(data: &str) -> Result<CallbackCommand> {
    let parts: Vec<&str> = data.split('_').collect();
    let [p, a, index] = parts.as_slice() else {
        return Err(Error::MalformedCommand(format!(
            "{data}: expected play_audio_<n>"
        )));
    };
    if *p != "play" || *a != "audio" {
        return Err(Error::MalformedCommand(data.to_string()));
    }
    let index = digits(index)
        .ok_or_else(|| Error::MalformedCommand(format!("{data}: bad track index")))?;
    Ok(CallbackCommand::Play(
        usize::try_from(index).unwrap_or(usize::MAX),
    ))
}

impl CallbackCommand {
    /// Classify callback data. Unmatched data is `Unknown`; data that matches a
    /// rule but has a bad payload is `Error::MalformedCommand`.
    pub fn classify(data: &str) -> Result<Self> {
        for (matcher, kind) in RULES {
            if let Some(rest) = matcher.strip(data) {
                return build(*kind, data, rest);
            }
        }
        Ok(CallbackCommand::Unknown(data.to_string()))
    }
}

impl FromStr for CallbackCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::classify(s)
    }
}

impl fmt::Display for CallbackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackCommand::MainMenu => f.write_str("main_menu"),
            CallbackCommand::Noop => f.write_str("noop"),
            CallbackCommand::SetToken => f.write_str("set_token"),
            CallbackCommand::Info => f.write_str("info"),
            CallbackCommand::ProgramInfo => f.write_str("program_info"),
            CallbackCommand::TokenManagement => f.write_str("token_management"),
            CallbackCommand::CheckToken => f.write_str("check_token"),
            CallbackCommand::Browse(tag) => f.write_str(tag.menu_command()),
            CallbackCommand::Open(kind, id) => write!(f, "{}{id}", kind.prefix()),
            CallbackCommand::Page(start) => write!(f, "{PAGE_PREFIX}{start}"),
            CallbackCommand::Play(index) => write!(f, "{PLAY_PREFIX}{index}"),
            CallbackCommand::Unknown(data) => f.write_str(data),
        }
    }
}
