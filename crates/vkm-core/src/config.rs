use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

pub const DEFAULT_VK_API_BASE: &str = "https://api.vk.com/method";
pub const DEFAULT_VK_API_VERSION: &str = "5.131";
pub const DEFAULT_VK_USER_AGENT: &str =
    "KateMobileAndroid/51.1-442 (Android 11; SDK 30; arm64-v8a; Samsung SM-G991B; ru_RU)";

/// Settings the callback router needs to render lists and play tracks.
#[derive(Clone, Debug)]
pub struct BrowseSettings {
    pub page_size: usize,
    pub button_label_max_length: usize,
    pub entity_list_limit: usize,
    pub temp_dir: PathBuf,
    pub download_timeout: Duration,
}

impl Default for BrowseSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            button_label_max_length: 20,
            entity_list_limit: 10,
            temp_dir: env::temp_dir().join("vkm-bot"),
            download_timeout: Duration::from_secs(120),
        }
    }
}

/// Typed configuration, read from the environment (and `.env` if present).
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,

    // VK
    pub token_file: PathBuf,
    pub vk_api_base: String,
    pub vk_api_version: String,
    pub vk_user_agent: String,
    pub api_timeout: Duration,

    // Browsing / playback
    pub browse: BrowseSettings,

    // Sessions
    pub session_capacity: u64,
    pub session_idle_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let token_file = env_path("VK_TOKEN_FILE").unwrap_or_else(|| PathBuf::from("vk_token.txt"));
        let vk_api_base = env_str("VK_API_BASE")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_VK_API_BASE.to_string());
        let vk_api_version = env_str("VK_API_VERSION")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_VK_API_VERSION.to_string());
        let vk_user_agent = env_str("VK_USER_AGENT")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_VK_USER_AGENT.to_string());
        let api_timeout = Duration::from_millis(env_u64("VK_API_TIMEOUT_MS").unwrap_or(15_000));

        let defaults = BrowseSettings::default();
        let browse = BrowseSettings {
            page_size: env_usize("PAGE_SIZE").unwrap_or(defaults.page_size).max(1),
            button_label_max_length: env_usize("BUTTON_LABEL_MAX_LENGTH")
                .unwrap_or(defaults.button_label_max_length)
                .max(1),
            entity_list_limit: env_usize("ENTITY_LIST_LIMIT")
                .unwrap_or(defaults.entity_list_limit)
                .max(1),
            temp_dir: env_path("TEMP_DIR").unwrap_or(defaults.temp_dir),
            download_timeout: env_u64("DOWNLOAD_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.download_timeout),
        };

        // Downloads land here; make sure it exists before the first track is played.
        fs::create_dir_all(&browse.temp_dir)?;

        let session_capacity = env_u64("SESSION_CAPACITY").unwrap_or(10_000).max(1);
        let session_idle_timeout =
            Duration::from_secs(env_u64("SESSION_IDLE_SECS").unwrap_or(86_400).max(1));

        Ok(Self {
            telegram_bot_token,
            token_file,
            vk_api_base,
            vk_api_version,
            vk_user_agent,
            api_timeout,
            browse,
            session_capacity,
            session_idle_timeout,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_lines_are_parsed_with_quotes_and_comments() {
        let parsed = parse_dotenv(
            "# comment\nTELEGRAM_BOT_TOKEN = \"123:abc\"\n\nPAGE_SIZE=5\nbroken line\nVK_TOKEN_FILE='tok.txt'\n=nokey\n",
        );
        assert_eq!(
            parsed,
            vec![
                ("TELEGRAM_BOT_TOKEN".to_string(), "123:abc".to_string()),
                ("PAGE_SIZE".to_string(), "5".to_string()),
                ("VK_TOKEN_FILE".to_string(), "tok.txt".to_string()),
            ]
        );
    }

    #[test]
    fn browse_defaults_match_bot_limits() {
        let d = BrowseSettings::default();
        assert_eq!(d.page_size, 10);
        assert_eq!(d.button_label_max_length, 20);
        assert_eq!(d.entity_list_limit, 10);
    }
}
