//! Prediction state and the hook that drives it.
//!
//! [`PredictionState`] holds the outcome of the latest prediction request:
//! last result, in-flight flag and last error message.  The egui update loop
//! reads it every frame; [`PredictionHook::predict`] is the only writer.
//!
//! Each call takes a request token.  Only the completion carrying the newest
//! token is applied, so an older response that resolves late can neither
//! overwrite a newer result nor clear the in-flight flag of a newer request.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::api::{ApiError, PredictionInput, PredictionResult, ShelfLifeApi};

/// Shown when the backend gives no usable error message.
pub const FALLBACK_ERROR: &str = "Failed to get prediction";

// ---------------------------------------------------------------------------
// PredictionError
// ---------------------------------------------------------------------------

/// A failed prediction, with the message that was stored for display.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PredictionError {
    pub message: String,
    #[source]
    pub source: ApiError,
}

impl From<ApiError> for PredictionError {
    fn from(source: ApiError) -> Self {
        let message = source
            .server_message()
            .unwrap_or(FALLBACK_ERROR)
            .to_string();
        Self { message, source }
    }
}

// ---------------------------------------------------------------------------
// PredictionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PredictionState {
    /// Result of the last successful prediction.  Kept when a later request
    /// fails.
    pub result: Option<PredictionResult>,
    /// `true` while the newest request is in flight.
    pub loading: bool,
    /// Message of the last failure; cleared when a new request starts.
    pub error: Option<String>,
    latest_token: u64,
}

/// Thread-safe handle to [`PredictionState`].  Never hold the lock across an
/// `.await`.
pub type SharedPrediction = Arc<Mutex<PredictionState>>;

// ---------------------------------------------------------------------------
// PredictionHook
// ---------------------------------------------------------------------------

/// Owns the prediction state and triggers requests against the backend.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct PredictionHook {
    api: Arc<dyn ShelfLifeApi>,
    state: SharedPrediction,
}

impl PredictionHook {
    pub fn new(api: Arc<dyn ShelfLifeApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(PredictionState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PredictionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> PredictionState {
        self.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Start a prediction.
    ///
    /// The in-flight flag is set and the previous error cleared before this
    /// returns; the returned future performs the request and records its
    /// outcome.  On failure the stored message is the backend's `error`
    /// field, or [`FALLBACK_ERROR`], and the same message is returned to the
    /// caller.
    pub fn predict(
        &self,
        input: PredictionInput,
    ) -> impl Future<Output = Result<PredictionResult, PredictionError>> + Send + 'static {
        let token = {
            let mut st = self.lock();
            st.latest_token += 1;
            st.loading = true;
            st.error = None;
            st.latest_token
        };
        log::debug!("prediction #{token}: {} / {}", input.food_type, input.storage_type);

        let hook = self.clone();
        async move {
            let outcome = hook.api.predict(&input).await.map_err(PredictionError::from);
            hook.finish(token, &outcome);
            outcome
        }
    }

    fn finish(&self, token: u64, outcome: &Result<PredictionResult, PredictionError>) {
        let mut st = self.lock();
        if st.latest_token != token {
            log::debug!("prediction #{token}: superseded, discarding response");
            return;
        }

        st.loading = false;
        match outcome {
            Ok(result) => {
                log::info!(
                    "prediction #{token}: {} ({} days left)",
                    result.safety_classification,
                    result.predicted_remaining_days
                );
                st.result = Some(result.clone());
            }
            Err(err) => {
                log::warn!("prediction #{token} failed: {}", err.source);
                st.error = Some(err.message.clone());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
