//! State/hook layer for shelf-life predictions.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shelflife_client::api::ApiClient;
//! use shelflife_client::config::AppConfig;
//! use shelflife_client::prediction::PredictionHook;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let hook = PredictionHook::new(Arc::new(ApiClient::from_config(&config.api)));
//!
//!     match hook.predict(config.form.initial_input()).await {
//!         Ok(result) => println!("{} days left", result.predicted_remaining_days),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! ```

pub mod state;

pub use state::{
    PredictionError, PredictionHook, PredictionState, SharedPrediction, FALLBACK_ERROR,
};
