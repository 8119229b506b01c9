//! Per-guild music queue, YouTube resolution and voice playback.

/// Player service tying sessions, sources and songbird together.
pub mod player;
/// Per-guild queue and playback state machine.
pub mod session;
/// Search and stream resolution through `yt-dlp`.
pub mod source;
/// `ffmpeg` child process feeding PCM into songbird.
pub mod transcode;

pub use player::{Jukebox, PlayOutcome};
pub use session::{Advance, Enqueued, GuildSession, PlaybackState, QueueEntry};
pub use source::{TrackSource, YtDlp};

use thiserror::Error;

/// Errors that can occur during music operations
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Failed to get voice manager")]
    NoVoiceManager,

    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("No search results for '{0}'")]
    NoMatch(String),

    #[error("Audio source error: {0}")]
    AudioSourceError(String),

    #[error("Transcoder error: {0}")]
    TranscodeError(String),

    #[error("Track control error: {0}")]
    TrackControl(String),
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;
