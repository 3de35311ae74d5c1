//! Shared form state for the three tabs.
//!
//! [`FormState`] owns the one [`PredictionInput`] every tab reads from.  The
//! numeric fields are edited as free text; whatever the user types is
//! coerced to a finite number on every edit, so the input handed to the
//! transport layer never contains `NaN`.

use crate::api::{FoodType, PredictionInput, StorageType};

/// Parse a numeric form field.  Empty, non-numeric or non-finite text
/// becomes `0`.
///
/// ```
/// use shelflife_client::form::coerce_number;
///
/// assert_eq!(coerce_number("4.5"), 4.5);
/// assert_eq!(coerce_number(" -18 "), -18.0);
/// assert_eq!(coerce_number(""), 0.0);
/// assert_eq!(coerce_number("abc"), 0.0);
/// assert_eq!(coerce_number("NaN"), 0.0);
/// ```
pub fn coerce_number(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Which numeric field is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Temperature,
    Humidity,
    DaysStored,
}

/// Single owned form state, passed to each tab by reference.
#[derive(Debug, Clone)]
pub struct FormState {
    input: PredictionInput,
    temperature_text: String,
    humidity_text: String,
    days_stored_text: String,
}

impl FormState {
    pub fn new(initial: PredictionInput) -> Self {
        let initial = initial.sanitized();
        Self {
            temperature_text: initial.temperature.to_string(),
            humidity_text: initial.humidity.to_string(),
            days_stored_text: initial.days_stored.to_string(),
            input: initial,
        }
    }

    /// The current input, ready to submit.
    pub fn input(&self) -> PredictionInput {
        self.input
    }

    pub fn set_food_type(&mut self, food_type: FoodType) {
        self.input.food_type = food_type;
    }

    pub fn set_storage_type(&mut self, storage_type: StorageType) {
        self.input.storage_type = storage_type;
    }

    pub fn text(&self, field: NumericField) -> &str {
        match field {
            NumericField::Temperature => &self.temperature_text,
            NumericField::Humidity => &self.humidity_text,
            NumericField::DaysStored => &self.days_stored_text,
        }
    }

    /// Raw text buffer for a numeric field, for binding to a text edit.
    /// Call [`FormState::commit`] after the buffer changes.
    pub fn text_mut(&mut self, field: NumericField) -> &mut String {
        match field {
            NumericField::Temperature => &mut self.temperature_text,
            NumericField::Humidity => &mut self.humidity_text,
            NumericField::DaysStored => &mut self.days_stored_text,
        }
    }

    /// Re-parse the text buffer of `field` into the input.
    pub fn commit(&mut self, field: NumericField) {
        match field {
            NumericField::Temperature => {
                self.input.temperature = coerce_number(&self.temperature_text)
            }
            NumericField::Humidity => self.input.humidity = coerce_number(&self.humidity_text),
            NumericField::DaysStored => {
                self.input.days_stored = coerce_number(&self.days_stored_text)
            }
        }
    }

    /// Replace the text of `field` and commit it in one step.
    pub fn set_text(&mut self, field: NumericField, text: &str) {
        *self.text_mut(field) = text.to_string();
        self.commit(field);
    }
}
