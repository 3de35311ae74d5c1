//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::api::{FoodType, PredictionInput, StorageType};
use crate::view::Tab;

// ---------------------------------------------------------------------------
// ApiConfig
// ---------------------------------------------------------------------------

/// Connection settings for the shelf-life prediction backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    ///
    /// - Web proxy default: `http://localhost:3000/api`
    /// - Backend directly:  `http://localhost:5001`
    pub base_url: String,
    /// Maximum seconds to wait for a single response.  Voice synthesis is
    /// the slowest call (the backend itself waits up to 30 s on its TTS
    /// provider).
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".into(),
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceConfig
// ---------------------------------------------------------------------------

/// Settings for voice-explanation playback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Output volume multiplier (1.0 = unchanged).
    pub volume: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window appearance and behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial inner window size `(width, height)` in logical pixels.
    pub window_size: (f32, f32),
    /// Tab shown when the window opens.
    pub start_tab: Tab,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (960.0, 720.0),
            start_tab: Tab::Prediction,
        }
    }
}

// ---------------------------------------------------------------------------
// FormConfig
// ---------------------------------------------------------------------------

/// Initial values of the prediction form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub food_type: FoodType,
    pub storage_type: StorageType,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, 0 – 100.
    pub humidity: f64,
    pub days_stored: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            food_type: FoodType::Dairy,
            storage_type: StorageType::Refrigerator,
            temperature: 4.0,
            humidity: 65.0,
            days_stored: 2.0,
        }
    }
}

impl FormConfig {
    /// The [`PredictionInput`] the form starts from.
    pub fn initial_input(&self) -> PredictionInput {
        PredictionInput {
            food_type: self.food_type,
            temperature: self.temperature,
            humidity: self.humidity,
            storage_type: self.storage_type,
            days_stored: self.days_stored,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use shelflife_client::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend connection settings.
    pub api: ApiConfig,
    /// Voice playback settings.
    pub voice: VoiceConfig,
    /// Window settings.
    pub ui: UiConfig,
    /// Prediction form defaults.
    pub form: FormConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
