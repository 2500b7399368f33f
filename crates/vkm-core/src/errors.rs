/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the router can
/// decide how a failure is surfaced (rendered message or toast).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Missing or rejected VK access token.
    #[error("credential error: {0}")]
    Credential(String),

    /// A VK API call failed (network or API-level). Carries the upstream text.
    #[error("{0}")]
    Remote(String),

    #[error("malformed command: {0}")]
    MalformedCommand(String),

    #[error("track not found")]
    NotFound,

    #[error("track has no playable url")]
    Unplayable,

    /// Temporary media file could not be created, written or released.
    #[error("resource error: {0}")]
    Resource(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
