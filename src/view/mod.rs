//! View models: tab selection and display data derived from backend results.

pub mod result;

use serde::{Deserialize, Serialize};

pub use result::{format_number, input_summary, FeatureBar, ResultView, SafetyBadge, Tone};

/// The three mutually exclusive views of the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Prediction,
    Voice,
    Chat,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Prediction, Tab::Voice, Tab::Chat];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Prediction => "Predict",
            Tab::Voice => "Voice",
            Tab::Chat => "Chat",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_labels() {
        let labels: Vec<&str> = Tab::ALL.iter().map(Tab::label).collect();
        assert_eq!(labels, vec!["Predict", "Voice", "Chat"]);
    }

    #[test]
    fn tab_serialises_lowercase() {
        assert_eq!(serde_json::to_value(Tab::Voice).unwrap(), serde_json::json!("voice"));
    }
}
