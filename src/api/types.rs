//! Wire types exchanged with the prediction backend.
//!
//! Field names follow the backend's JSON exactly (`snake_case`), so no
//! renaming is applied beyond the lowercase enum values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FoodType / StorageType
// ---------------------------------------------------------------------------

/// Food categories offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodType {
    Dairy,
    Meat,
    Vegetables,
    Fruits,
    Bakery,
    Seafood,
}

impl FoodType {
    pub const ALL: [FoodType; 6] = [
        FoodType::Dairy,
        FoodType::Meat,
        FoodType::Vegetables,
        FoodType::Fruits,
        FoodType::Bakery,
        FoodType::Seafood,
    ];

    /// Wire value, e.g. `"vegetables"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodType::Dairy => "dairy",
            FoodType::Meat => "meat",
            FoodType::Vegetables => "vegetables",
            FoodType::Fruits => "fruits",
            FoodType::Bakery => "bakery",
            FoodType::Seafood => "seafood",
        }
    }

    /// Capitalised label for the UI.
    pub fn label(&self) -> &'static str {
        match self {
            FoodType::Dairy => "Dairy",
            FoodType::Meat => "Meat",
            FoodType::Vegetables => "Vegetables",
            FoodType::Fruits => "Fruits",
            FoodType::Bakery => "Bakery",
            FoodType::Seafood => "Seafood",
        }
    }
}

impl fmt::Display for FoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the food is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Refrigerator,
    Freezer,
    Pantry,
}

impl StorageType {
    pub const ALL: [StorageType; 3] = [
        StorageType::Refrigerator,
        StorageType::Freezer,
        StorageType::Pantry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Refrigerator => "refrigerator",
            StorageType::Freezer => "freezer",
            StorageType::Pantry => "pantry",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StorageType::Refrigerator => "Refrigerator",
            StorageType::Freezer => "Freezer",
            StorageType::Pantry => "Pantry",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PredictionInput
// ---------------------------------------------------------------------------

/// Storage parameters submitted for a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub food_type: FoodType,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, 0 – 100.
    pub humidity: f64,
    pub storage_type: StorageType,
    pub days_stored: f64,
}

impl PredictionInput {
    /// Copy of `self` with every non-finite number replaced by `0`.
    ///
    /// `serde_json` would otherwise emit `null` for `NaN`, which the backend
    /// rejects.
    pub fn sanitized(mut self) -> Self {
        for value in [
            &mut self.temperature,
            &mut self.humidity,
            &mut self.days_stored,
        ] {
            if !value.is_finite() {
                *value = 0.0;
            }
        }
        self
    }
}

// ---------------------------------------------------------------------------
// PredictionResult
// ---------------------------------------------------------------------------

/// Backend verdict for one [`PredictionInput`].
///
/// The input fields are echoed back as the backend normalised them, so
/// `food_type` / `storage_type` stay plain strings here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub food_type: String,
    pub storage_type: String,
    pub temperature: f64,
    pub humidity: f64,
    pub days_stored: f64,
    pub predicted_remaining_days: f64,
    pub raw_prediction: f64,
    /// Normally one of `"Safe"`, `"Consume Soon"`, `"Expired"`; any other
    /// label is kept verbatim and rendered neutrally.
    pub safety_classification: String,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub feature_importance: BTreeMap<String, f64>,
}

// ---------------------------------------------------------------------------
// Auxiliary payloads
// ---------------------------------------------------------------------------

/// `GET /health` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub pipeline_loaded: bool,
}

/// `POST /explain` body: the prediction plus the backend's free-form
/// explanation of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub explanation: serde_json::Value,
    #[serde(default)]
    pub result: Option<PredictionResult>,
}

/// `POST /chat` request body.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
    pub context: &'a str,
}

/// Reply of the chat-style endpoints: either `response` or `error` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatReply {
    /// The text to show: the response, else the error.
    pub fn into_text(self) -> Option<String> {
        self.response.or(self.error)
    }
}

/// One question/answer pair of a prediction explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// `POST /chat/prediction_explanation` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionExplanation {
    #[serde(default)]
    pub explanation: Vec<QaPair>,
}

/// Conditions sent along with a storage-advice request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConditions {
    pub storage_type: StorageType,
    pub temperature: f64,
    pub humidity: f64,
}

impl From<&PredictionInput> for StorageConditions {
    fn from(input: &PredictionInput) -> Self {
        let input = input.sanitized();
        Self {
            storage_type: input.storage_type,
            temperature: input.temperature,
            humidity: input.humidity,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StorageAdviceRequest<'a> {
    pub food_type: FoodType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_conditions: Option<&'a StorageConditions>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchRequest<'a> {
    pub items: &'a [PredictionInput],
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchResponse {
    pub results: Vec<PredictionResult>,
}

/// Synthesised speech returned by `POST /voice/explain`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    /// `Content-Type` header, normally `audio/mpeg`.
    pub content_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
