//! Audio output for synthesised voice explanations.
//!
//! [`AudioPlayer::play`] blocks until the clip has finished, so callers run
//! it on the blocking pool.  Every output resource a player opens is released
//! before `play` returns, whether playback succeeded or not.

use std::io::Cursor;

use crate::api::AudioClip;

use super::VoiceError;

/// Plays one decoded clip to completion.
pub trait AudioPlayer: Send + Sync {
    fn play(&self, clip: &AudioClip) -> Result<(), VoiceError>;
}

/// Plays clips on the default output device via `rodio`.
pub struct RodioPlayer {
    volume: f32,
}

impl RodioPlayer {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.max(0.0),
        }
    }
}

impl AudioPlayer for RodioPlayer {
    fn play(&self, clip: &AudioClip) -> Result<(), VoiceError> {
        // The stream handle must outlive the sink; both drop at the end of
        // this call.
        let (_stream, handle) = rodio::OutputStream::try_default()
            .map_err(|e| VoiceError::Output(e.to_string()))?;
        let sink = rodio::Sink::try_new(&handle).map_err(|e| VoiceError::Output(e.to_string()))?;

        let source = rodio::Decoder::new(Cursor::new(clip.bytes.clone()))
            .map_err(|e| VoiceError::Decode(e.to_string()))?;

        log::debug!(
            "voice: playing {} bytes ({})",
            clip.bytes.len(),
            clip.content_type.as_deref().unwrap_or("unknown type")
        );

        sink.set_volume(self.volume);
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}
