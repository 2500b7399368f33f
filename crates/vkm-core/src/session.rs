use std::{sync::Arc, time::Duration};

use moka::future::Cache;
use tokio::sync::Mutex;

use crate::{
    domain::{ChatId, UserId},
    music::{AudioList, SourceTag, Track},
};

/// The list currently shown to a user together with where it came from.
///
/// Both halves live in one value so the list is never stored without the
/// source tag "back" buttons depend on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing {
    pub tracks: AudioList,
    pub source: SourceTag,
}

/// Per chat/user browsing state.
#[derive(Debug, Default)]
pub struct Session {
    listing: Option<Listing>,
    pub awaiting_search_query: bool,
}

impl Session {
    pub fn listing(&self) -> Option<&Listing> {
        self.listing.as_ref()
    }

    /// Replace the current list. Callers only do this after a successful fetch.
    pub fn commit_listing(&mut self, tracks: AudioList, source: SourceTag) {
        self.listing = Some(Listing { tracks, source });
    }

    /// Resolve a `play_audio_<index>` selection to the track and its back target.
    pub fn track_at(&self, index: usize) -> Option<(&Track, SourceTag)> {
        let listing = self.listing.as_ref()?;
        let track = listing.tracks.get(index)?;
        Some((track, listing.source))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub chat_id: ChatId,
    pub user_id: UserId,
}

impl SessionKey {
    pub fn new(chat_id: ChatId, user_id: UserId) -> Self {
        Self { chat_id, user_id }
    }
}

/// Sessions keyed by chat + user, created on first use.
///
/// Bounded: at most `capacity` sessions are kept and a session untouched for
/// `idle_timeout` is evicted. An evicted user simply starts from an empty
/// session ("list not found, return to menu").
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<SessionKey, Arc<Mutex<Session>>>,
}

impl SessionStore {
    pub fn new(capacity: u64, idle_timeout: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(idle_timeout)
            .build();
        Self { cache }
    }

    /// Session handle for `key`. Hold its lock across one read-modify-render
    /// sequence so updates for the same user never interleave.
    pub async fn get(&self, key: SessionKey) -> Arc<Mutex<Session>> {
        self.cache
            .get_with(key, async { Arc::new(Mutex::new(Session::default())) })
            .await
    }
}
