//! Voice explanations: fetch synthesised speech and play it, one clip at a
//! time.
//!
//! * [`VoicePlayback`] — in-flight guard + fetch/play flow.
//! * [`AudioPlayer`] / [`RodioPlayer`] — blocking audio output.
//! * [`VoiceError`] — fetch and playback failures.

pub mod playback;
pub mod player;

use thiserror::Error;

use crate::api::ApiError;

pub use playback::VoicePlayback;
pub use player::{AudioPlayer, RodioPlayer};

/// Alert text shown for any playback failure.
pub const PLAYBACK_ALERT: &str = "Failed to play audio";

#[derive(Debug, Error)]
pub enum VoiceError {
    /// The backend call failed.
    #[error("failed to fetch voice explanation: {0}")]
    Fetch(#[from] ApiError),

    /// The backend answered with an empty body.
    #[error("voice explanation was empty")]
    EmptyClip,

    /// No usable output device / stream.
    #[error("audio output unavailable: {0}")]
    Output(String),

    /// The payload could not be decoded as audio.
    #[error("could not decode audio: {0}")]
    Decode(String),

    /// The blocking playback task panicked or was cancelled.
    #[error("playback task failed: {0}")]
    Internal(String),
}
