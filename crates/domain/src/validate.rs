//! Field-level validation engine.
//!
//! All checks are pure total functions: same input, same output, no I/O.
//! They are called in three places with identical semantics: on load of an
//! existing record, on every field-edit event, and once more as the
//! authoritative gate before a write is committed.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::money::Money;

/// A single field's validation failure, suitable for inline display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// The field is required but empty or absent.
    #[error("this field is required")]
    Required,

    /// The value is shorter than the allowed minimum.
    #[error("must be at least {min} characters")]
    TooShort { min: usize },

    /// The value is longer than the allowed maximum.
    #[error("must be at most {max} characters")]
    TooLong { max: usize },

    /// The value is outside the allowed numeric range.
    #[error("must be greater than zero and at most {max}")]
    OutOfRange { max: Money },
}

/// Checks a text field against required-ness and length bounds.
///
/// An empty value fails with [`InvalidInput::Required`] when the field is
/// required; when it is optional, an empty value passes and the length
/// bounds are not applied. Length is measured in characters.
pub fn check_text(
    value: &str,
    is_required: bool,
    min_len: usize,
    max_len: usize,
) -> Option<InvalidInput> {
    if value.is_empty() {
        return is_required.then_some(InvalidInput::Required);
    }
    let len = value.chars().count();
    if len < min_len {
        Some(InvalidInput::TooShort { min: min_len })
    } else if len > max_len {
        Some(InvalidInput::TooLong { max: max_len })
    } else {
        None
    }
}

/// Checks a decimal field against required-ness and an upper bound.
///
/// An absent value fails with [`InvalidInput::Required`] when the field is
/// required. A present value must be strictly positive and at most
/// `max_value`, whether or not the field is required.
pub fn check_decimal(
    value: Option<Money>,
    is_required: bool,
    max_value: Money,
) -> Option<InvalidInput> {
    match value {
        None => is_required.then_some(InvalidInput::Required),
        Some(amount) => {
            if !amount.is_positive() || amount > max_value {
                Some(InvalidInput::OutOfRange { max: max_value })
            } else {
                None
            }
        }
    }
}

/// Checks a date field against required-ness.
pub fn check_date(value: Option<DateTime<Utc>>, is_required: bool) -> Option<InvalidInput> {
    if value.is_none() && is_required {
        Some(InvalidInput::Required)
    } else {
        None
    }
}
