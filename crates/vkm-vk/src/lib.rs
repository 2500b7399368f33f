//! VK API adapter.
//!
//! Implements [`AudioSource`] on top of the VK HTTP API (the method endpoints
//! Kate Mobile uses) with a single shared `reqwest` client.

mod wire;

use std::{path::Path, time::Duration};

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use vkm_core::{
    config::Config,
    credentials::AccessToken,
    errors::Error,
    music::{AudioList, AudioSource, Friend, Group, Identity, Playlist, Track},
    Result,
};

use wire::{decode, AudioItem, GroupItem, Items, PlaylistItem, UserItem};

const AUDIO_COUNT: &str = "100";
const FRIENDS_COUNT: &str = "100";
const GROUPS_COUNT: &str = "100";
const PLAYLISTS_COUNT: &str = "50";
const RECOMMENDATIONS_COUNT: &str = "50";
const SEARCH_COUNT: &str = "50";
/// `audio.search` sort order by popularity.
const SORT_BY_POPULARITY: &str = "2";

const VK_ORIGIN: &str = "https://vk.com";

/// Queries used when personal recommendations are unavailable.
const POPULAR_QUERIES: &[&str] = &[
    "популярные песни 2024",
    "хиты",
    "top hits",
    "новинки музыки",
    "русские хиты",
    "зарубежные хиты",
    "топ чарт",
    "billboard top 100",
];

#[derive(Clone, Debug)]
pub struct VkClient {
    http: reqwest::Client,
    base: String,
    version: String,
    download_timeout: Duration,
}

impl VkClient {
    pub fn new(
        base: impl Into<String>,
        version: impl Into<String>,
        user_agent: &str,
        api_timeout: Duration,
        download_timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7"),
        );

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(api_timeout)
            .build()
            .map_err(|e| Error::Config(format!("cannot build http client: {e}")))?;

        Ok(Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
            version: version.into(),
            download_timeout,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.vk_api_base.clone(),
            cfg.vk_api_version.clone(),
            &cfg.vk_user_agent,
            cfg.api_timeout,
            cfg.browse.download_timeout,
        )
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.base)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let resp = self
            .http
            .get(self.method_url(method))
            .query(&[("access_token", token.as_str()), ("v", self.version.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| Error::Remote(format!("request to {method} failed: {e}")))?;

        let body = resp
            .text()
            .await
            .map_err(|e| Error::Remote(format!("reading {method} response failed: {e}")))?;

        let result = decode(&body);
        match &result {
            Ok(_) => debug!(method, "vk call ok"),
            Err(e) => warn!(method, "vk call failed: {e}"),
        }
        result
    }

    async fn audio_get(&self, token: &AccessToken, params: &[(&str, &str)]) -> Result<AudioList> {
        let items: Items<AudioItem> = self.call(token, "audio.get", params).await?;
        Ok(into_tracks(items))
    }

    async fn audio_search(
        &self,
        token: &AccessToken,
        query: &str,
        popular: bool,
    ) -> Result<AudioList> {
        let mut params = vec![
            ("q", query),
            ("count", SEARCH_COUNT),
            ("auto_complete", "1"),
        ];
        if popular {
            params.push(("sort", SORT_BY_POPULARITY));
        }
        let items: Items<AudioItem> = self.call(token, "audio.search", &params).await?;
        Ok(into_tracks(items))
    }

    /// Owner id of the token: the numeric prefix when present, else `users.get`.
    async fn own_id(&self, token: &AccessToken) -> Result<i64> {
        match token.owner_hint() {
            Some(id) => Ok(id),
            None => Ok(self.current_user(token).await?.id),
        }
    }

    async fn current_user(&self, token: &AccessToken) -> Result<UserItem> {
        let users: Vec<UserItem> = self
            .call(token, "users.get", &[("fields", "first_name,last_name")])
            .await?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| Error::Remote("users.get returned no user".to_string()))
    }
}

fn into_tracks(items: Items<AudioItem>) -> AudioList {
    items.items.into_iter().map(Track::from).collect()
}

/// Groups own audio under the negated group id.
fn group_owner_id(group_id: &str) -> Result<String> {
    let id: i64 = group_id
        .trim()
        .parse()
        .map_err(|_| Error::MalformedCommand(format!("bad group id: {group_id}")))?;
    Ok((-id.abs()).to_string())
}

fn pick_popular_query() -> &'static str {
    POPULAR_QUERIES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or("top hits")
}

#[async_trait]
impl AudioSource for VkClient {
    async fn check_credential(&self, token: &AccessToken) -> Result<Identity> {
        Ok(self.current_user(token).await?.into())
    }

    async fn list_own(&self, token: &AccessToken) -> Result<AudioList> {
        let owner = self.own_id(token).await?.to_string();
        self.audio_get(token, &[("owner_id", owner.as_str()), ("count", AUDIO_COUNT)])
            .await
    }

    async fn list_friend(&self, token: &AccessToken, friend_id: &str) -> Result<AudioList> {
        self.audio_get(token, &[("owner_id", friend_id), ("count", AUDIO_COUNT)])
            .await
    }

    async fn list_group(&self, token: &AccessToken, group_id: &str) -> Result<AudioList> {
        let owner = group_owner_id(group_id)?;
        self.audio_get(token, &[("owner_id", owner.as_str()), ("count", AUDIO_COUNT)])
            .await
    }

    async fn list_playlist(&self, token: &AccessToken, playlist_id: &str) -> Result<AudioList> {
        let owner = self.own_id(token).await?.to_string();
        self.audio_get(
            token,
            &[
                ("owner_id", owner.as_str()),
                ("album_id", playlist_id),
                ("count", AUDIO_COUNT),
            ],
        )
        .await
    }

    async fn list_friends(&self, token: &AccessToken) -> Result<Vec<Friend>> {
        let items: Items<UserItem> = self
            .call(
                token,
                "friends.get",
                &[
                    ("count", FRIENDS_COUNT),
                    ("fields", "first_name,last_name"),
                    ("order", "name"),
                ],
            )
            .await?;
        Ok(items.items.into_iter().map(Friend::from).collect())
    }

    async fn list_groups(&self, token: &AccessToken) -> Result<Vec<Group>> {
        let items: Items<GroupItem> = self
            .call(
                token,
                "groups.get",
                &[
                    ("count", GROUPS_COUNT),
                    ("extended", "1"),
                    ("fields", "name"),
                    ("filter", "groups"),
                ],
            )
            .await?;
        Ok(items.items.into_iter().map(Group::from).collect())
    }

    async fn list_playlists(&self, token: &AccessToken) -> Result<Vec<Playlist>> {
        let owner = self.own_id(token).await?.to_string();
        let items: Items<PlaylistItem> = self
            .call(
                token,
                "audio.getPlaylists",
                &[("owner_id", owner.as_str()), ("count", PLAYLISTS_COUNT)],
            )
            .await?;
        Ok(items.items.into_iter().map(Playlist::from).collect())
    }

    async fn list_recommendations(&self, token: &AccessToken) -> Result<AudioList> {
        let result: Result<Items<AudioItem>> = self
            .call(
                token,
                "audio.getRecommendations",
                &[("count", RECOMMENDATIONS_COUNT), ("shuffle", "1")],
            )
            .await;
        match result {
            Ok(items) => Ok(into_tracks(items)),
            Err(Error::Credential(msg)) => Err(Error::Credential(msg)),
            Err(e) => {
                let query = pick_popular_query();
                warn!(%query, "recommendations unavailable ({e}); searching popular music");
                self.audio_search(token, query, true).await
            }
        }
    }

    async fn search(&self, token: &AccessToken, query: &str) -> Result<AudioList> {
        self.audio_search(token, query, false).await
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let mut resp = self
            .http
            .get(url)
            .header(header::REFERER, format!("{VK_ORIGIN}/"))
            .header(header::ORIGIN, VK_ORIGIN)
            .timeout(self.download_timeout)
            .send()
            .await
            .map_err(|e| Error::Remote(format!("download request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Remote(format!("download failed: HTTP {status}")));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| Error::Remote(format!("download interrupted: {e}")))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(bytes = written, "download complete");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_ids_become_negative_owner_ids() {
        assert_eq!(group_owner_id("123").unwrap(), "-123");
        assert_eq!(group_owner_id("-123").unwrap(), "-123");
        assert!(matches!(
            group_owner_id("abc"),
            Err(Error::MalformedCommand(_))
        ));
    }

    #[test]
    fn popular_query_comes_from_the_list() {
        for _ in 0..20 {
            assert!(POPULAR_QUERIES.contains(&pick_popular_query()));
        }
    }

    #[test]
    fn method_urls_ignore_trailing_slash() {
        let client = VkClient::new(
            "https://api.vk.com/method/",
            "5.131",
            "test-agent",
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.method_url("users.get"),
            "https://api.vk.com/method/users.get"
        );
    }

    #[tokio::test]
    async fn unreachable_api_is_a_remote_error() {
        let client = VkClient::new(
            "http://127.0.0.1:9",
            "5.131",
            "test-agent",
            Duration::from_secs(2),
            Duration::from_secs(2),
        )
        .unwrap();
        let token = AccessToken::parse("1.token").unwrap();
        assert!(matches!(
            client.list_own(&token).await,
            Err(Error::Remote(_))
        ));
    }

    #[tokio::test]
    async fn failed_download_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("track.mp3");
        let client = VkClient::new(
            "http://127.0.0.1:9",
            "5.131",
            "test-agent",
            Duration::from_secs(2),
            Duration::from_secs(2),
        )
        .unwrap();
        assert!(client
            .download("http://127.0.0.1:9/x.mp3", &dest)
            .await
            .is_err());
        assert!(!dest.exists());
    }
}
