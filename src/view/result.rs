//! Display models derived from a [`PredictionResult`].
//!
//! Kept free of egui types so the mapping from backend data to what the user
//! sees can be tested without a window.

use std::cmp::Ordering;

use crate::api::{PredictionInput, PredictionResult};

/// Colour family of a safety badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Yellow,
    Red,
}

/// Safety classification as rendered in the result panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyBadge {
    pub label: String,
    /// `None` for labels the client does not recognise.
    pub tone: Option<Tone>,
    pub icon: Option<&'static str>,
}

impl SafetyBadge {
    pub fn for_classification(label: &str) -> Self {
        let (tone, icon) = match label {
            "Safe" => (Some(Tone::Green), Some("✔")),
            "Consume Soon" => (Some(Tone::Yellow), Some("⚠")),
            "Expired" => (Some(Tone::Red), Some("✖")),
            _ => (None, None),
        };
        Self {
            label: label.to_string(),
            tone,
            icon,
        }
    }
}

/// One bar of the feature-importance chart.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBar {
    pub name: String,
    pub weight: f64,
    /// `weight` relative to the largest weight, in `0.0..=1.0`.
    pub fraction: f32,
}

/// Everything the result panel shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub remaining_days: String,
    pub raw_prediction: String,
    pub badge: SafetyBadge,
    /// `None` when the backend reports no severity (empty or `"none"`).
    pub severity: Option<String>,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    /// Sorted by descending weight.
    pub features: Vec<FeatureBar>,
}

impl From<&PredictionResult> for ResultView {
    fn from(result: &PredictionResult) -> Self {
        let severity = Some(result.severity.trim())
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("none"))
            .map(str::to_string);

        Self {
            remaining_days: format_number(result.predicted_remaining_days),
            raw_prediction: format_number(result.raw_prediction),
            badge: SafetyBadge::for_classification(&result.safety_classification),
            severity,
            issues: result.issues.clone(),
            recommendations: result.recommendations.clone(),
            features: feature_bars(result),
        }
    }
}

fn feature_bars(result: &PredictionResult) -> Vec<FeatureBar> {
    let mut entries: Vec<(&String, f64)> = result
        .feature_importance
        .iter()
        .filter(|(_, w)| w.is_finite())
        .map(|(name, w)| (name, *w))
        .collect();
    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    let max = entries
        .iter()
        .map(|(_, w)| w.abs())
        .fold(0.0_f64, f64::max);

    entries
        .into_iter()
        .map(|(name, weight)| FeatureBar {
            name: name.clone(),
            weight,
            fraction: if max > 0.0 {
                (weight.abs() / max) as f32
            } else {
                0.0
            },
        })
        .collect()
}

/// Format a number with at most two decimals and no trailing zeros.
///
/// ```
/// use shelflife_client::view::format_number;
///
/// assert_eq!(format_number(3.0), "3");
/// assert_eq!(format_number(2.5), "2.5");
/// assert_eq!(format_number(1.234), "1.23");
/// ```
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "–".to_string();
    }
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        t => t.to_string(),
    }
}

/// `(label, value)` rows summarising the current form input.
pub fn input_summary(input: &PredictionInput) -> Vec<(&'static str, String)> {
    vec![
        ("Food Type", input.food_type.label().to_string()),
        ("Storage", input.storage_type.label().to_string()),
        ("Temperature", format!("{}°C", format_number(input.temperature))),
        ("Humidity", format!("{}%", format_number(input.humidity))),
        ("Days Stored", format_number(input.days_stored)),
    ]
}
