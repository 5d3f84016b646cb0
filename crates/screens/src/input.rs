//! Per-field input state: current value paired with current error.

use chrono::{DateTime, Utc};
use domain::InvalidInput;

/// State of a free-text form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFieldState {
    pub value: String,
    pub error: Option<InvalidInput>,
}

/// State of a date picker field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateState {
    pub value: Option<DateTime<Utc>>,
    pub error: Option<InvalidInput>,
}
