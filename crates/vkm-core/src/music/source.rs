use std::path::Path;

use async_trait::async_trait;

use crate::{
    credentials::AccessToken,
    music::types::{AudioList, Friend, Group, Identity, Playlist},
    Result,
};

/// Port for the remote music backend (VK today).
///
/// Every listing either succeeds with the full ordered result or fails with an
/// [`crate::Error`]; a rejected token is reported as `Error::Credential`, any
/// other failure as `Error::Remote` carrying the upstream message.
#[async_trait]
pub trait AudioSource: Send + Sync {
    async fn check_credential(&self, token: &AccessToken) -> Result<Identity>;

    async fn list_own(&self, token: &AccessToken) -> Result<AudioList>;
    async fn list_friend(&self, token: &AccessToken, friend_id: &str) -> Result<AudioList>;
    async fn list_group(&self, token: &AccessToken, group_id: &str) -> Result<AudioList>;
    async fn list_playlist(&self, token: &AccessToken, playlist_id: &str) -> Result<AudioList>;

    async fn list_friends(&self, token: &AccessToken) -> Result<Vec<Friend>>;
    async fn list_groups(&self, token: &AccessToken) -> Result<Vec<Group>>;
    async fn list_playlists(&self, token: &AccessToken) -> Result<Vec<Playlist>>;

    /// Personal recommendations. Implementations fall back to a popularity
    /// search when the recommendation endpoint is unavailable.
    async fn list_recommendations(&self, token: &AccessToken) -> Result<AudioList>;
    async fn search(&self, token: &AccessToken, query: &str) -> Result<AudioList>;

    /// Write the media behind `url` into `dest`, returning the byte count.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}
