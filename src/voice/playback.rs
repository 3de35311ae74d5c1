//! Shared voice-explanation flow used by the prediction and voice tabs.
//!
//! ```text
//! trigger(input)
//!   ├─ already playing → None (no request)
//!   └─ Some(future)
//!        ├─ POST /voice/explain  → AudioClip
//!        ├─ spawn_blocking(player.play)
//!        └─ flag cleared (success, fetch error, playback error, drop)
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::{PredictionInput, ShelfLifeApi};

use super::{AudioPlayer, VoiceError};

/// Clears the in-flight flag when dropped.
struct PlayingGuard(Arc<AtomicBool>);

impl Drop for PlayingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct VoicePlayback {
    api: Arc<dyn ShelfLifeApi>,
    player: Arc<dyn AudioPlayer>,
    playing: Arc<AtomicBool>,
}

impl VoicePlayback {
    pub fn new(api: Arc<dyn ShelfLifeApi>, player: Arc<dyn AudioPlayer>) -> Self {
        Self {
            api,
            player,
            playing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// `true` from a successful [`trigger`](Self::trigger) until its future
    /// completes or is dropped.
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// Fetch and play the voice explanation for `input`.
    ///
    /// Returns `None`, without issuing a request, while another playback is
    /// in flight.
    pub fn trigger(
        &self,
        input: PredictionInput,
    ) -> Option<impl Future<Output = Result<(), VoiceError>> + Send + 'static> {
        if self
            .playing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("voice: playback already in flight, ignoring trigger");
            return None;
        }

        let guard = PlayingGuard(Arc::clone(&self.playing));
        let api = Arc::clone(&self.api);
        let player = Arc::clone(&self.player);

        Some(async move {
            let _guard = guard;
            fetch_and_play(api, player, input).await
        })
    }
}

async fn fetch_and_play(
    api: Arc<dyn ShelfLifeApi>,
    player: Arc<dyn AudioPlayer>,
    input: PredictionInput,
) -> Result<(), VoiceError> {
    let clip = api.voice_explanation(&input).await?;
    if clip.bytes.is_empty() {
        return Err(VoiceError::EmptyClip);
    }

    tokio::task::spawn_blocking(move || player.play(&clip))
        .await
        .map_err(|e| VoiceError::Internal(e.to_string()))?
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
