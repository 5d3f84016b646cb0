//! Aggregate validation errors.

use crate::validate::InvalidInput;

/// A single field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as exposed to the presentation layer.
    pub field: &'static str,
    /// What was wrong with it.
    pub error: InvalidInput,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

/// Aggregate validation failure for a candidate record.
///
/// Produced by the per-entity `validate()` gates. A mutation use case
/// returns this as a single refusal; no partial write ever happens and
/// the store is not invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    /// Builds a failure from collected field errors.
    ///
    /// Returns `Ok(())` when no field failed, so `validate()`
    /// implementations can end with `ValidationFailure::from_fields(..)`.
    pub fn from_fields(
        fields: impl IntoIterator<Item = (&'static str, Option<InvalidInput>)>,
    ) -> Result<(), Self> {
        let errors: Vec<FieldError> = fields
            .into_iter()
            .filter_map(|(field, error)| error.map(|error| FieldError { field, error }))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self { errors })
        }
    }

    /// Returns the error for a specific field, if that field failed.
    pub fn field(&self, name: &str) -> Option<InvalidInput> {
        self.errors
            .iter()
            .find(|e| e.field == name)
            .map(|e| e.error)
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed: ")?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}
