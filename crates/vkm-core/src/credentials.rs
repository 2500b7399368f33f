use std::{
    fmt,
    path::{Path, PathBuf},
};

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::Result;

/// Opaque VK access token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Trimmed, non-empty token text.
    pub fn parse(raw: &str) -> Option<Self> {
        let t = raw.trim();
        if t.is_empty() {
            None
        } else {
            Some(Self(t.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Some token formats start with `<owner_id>.`; use that when present.
    pub fn owner_hint(&self) -> Option<i64> {
        let (head, _) = self.0.split_once('.')?;
        head.parse::<i64>().ok()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// The single stored token plus the plain-text file it persists to.
pub struct CredentialStore {
    path: PathBuf,
    current: RwLock<Option<AccessToken>>,
}

impl CredentialStore {
    pub fn new(path: PathBuf, token: Option<AccessToken>) -> Self {
        Self {
            path,
            current: RwLock::new(token),
        }
    }

    /// Load the token file; a missing or empty file just means "no token yet".
    pub async fn load(path: PathBuf) -> Self {
        let token = match tokio::fs::read_to_string(&path).await {
            Ok(text) => AccessToken::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("failed to read token file {}: {e}", path.display());
                None
            }
        };

        match &token {
            Some(_) => info!("VK token loaded from {}", path.display()),
            None => warn!("no VK token in {}; waiting for /token", path.display()),
        }

        Self::new(path, token)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn current(&self) -> Option<AccessToken> {
        self.current.read().await.clone()
    }

    /// Persist `token` and make it current. The file is written first so a
    /// failed write leaves the previous token in place.
    pub async fn replace(&self, token: AccessToken) -> Result<()> {
        tokio::fs::write(&self.path, token.as_str()).await?;
        *self.current.write().await = Some(token);
        info!("VK token saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_parse_trims_and_rejects_blank() {
        assert!(AccessToken::parse("   \n").is_none());
        let t = AccessToken::parse("  vk1.a.abc \n").unwrap();
        assert_eq!(t.as_str(), "vk1.a.abc");
    }

    #[test]
    fn owner_hint_reads_numeric_prefix() {
        assert_eq!(
            AccessToken::parse("12345.secret").unwrap().owner_hint(),
            Some(12345)
        );
        assert_eq!(AccessToken::parse("vk1.a.x").unwrap().owner_hint(), None);
        assert_eq!(AccessToken::parse("nodots").unwrap().owner_hint(), None);
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let t = AccessToken::parse("12345.secret").unwrap();
        assert!(!format!("{t:?}").contains("secret"));
    }

    #[tokio::test]
    async fn missing_file_loads_as_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::load(dir.path().join("vk_token.txt")).await;
        assert!(store.current().await.is_none());
    }

    #[tokio::test]
    async fn replace_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vk_token.txt");
        std::fs::write(&path, "old.token\n").unwrap();

        let store = CredentialStore::load(path.clone()).await;
        assert_eq!(store.current().await.unwrap().as_str(), "old.token");

        store
            .replace(AccessToken::parse("77.fresh").unwrap())
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "77.fresh");

        let reloaded = CredentialStore::load(path).await;
        assert_eq!(reloaded.current().await.unwrap().as_str(), "77.fresh");
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_token() {
        let dir = tempfile::tempdir().unwrap();
        // A directory path cannot be written as a file.
        let store = CredentialStore::new(
            dir.path().to_path_buf(),
            AccessToken::parse("1.keep"),
        );
        assert!(store.replace(AccessToken::parse("2.new").unwrap()).await.is_err());
        assert_eq!(store.current().await.unwrap().as_str(), "1.keep");
    }
}
