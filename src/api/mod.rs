//! Transport layer: typed access to the shelf-life prediction backend.
//!
//! This module provides:
//! * [`ShelfLifeApi`] — async trait describing the backend contract.
//! * [`ApiClient`] — reqwest implementation against a configurable base URL.
//! * Wire types ([`PredictionInput`], [`PredictionResult`], …).
//! * [`ApiError`] — transport / status / decode failures.
//!
//! # Endpoints
//!
//! | Method/Path | Request | Response |
//! |---|---|---|
//! | `GET /health` | — | [`HealthStatus`] |
//! | `POST /predict` | [`PredictionInput`] | [`PredictionResult`] |
//! | `POST /explain` | [`PredictionInput`] | [`Explanation`] |
//! | `POST /voice/explain` | [`PredictionInput`] | [`AudioClip`] |
//! | `POST /chat` | `{message, context}` | [`ChatReply`] |
//! | `POST /chat/prediction_explanation` | [`PredictionInput`] | [`PredictionExplanation`] |
//! | `POST /chat/storage_advice` | `{food_type, storage_conditions}` | [`ChatReply`] |
//! | `POST /batch_predict` | `{items}` | `{results}` |

pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ApiClient, ShelfLifeApi};
pub use error::ApiError;
pub use types::{
    AudioClip, ChatReply, Explanation, FoodType, HealthStatus, PredictionExplanation,
    PredictionInput, PredictionResult, QaPair, StorageConditions, StorageType,
};
