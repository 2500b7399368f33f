//! Music model and the port used to fetch it.

pub mod source;
pub mod types;

pub use source::AudioSource;
pub use types::{AudioList, Friend, Group, Identity, Playlist, SourceTag, Track};
