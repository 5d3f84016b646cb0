//! Group entity: the root scope for bills and members.

use common::EntityId;
use serde::{Deserialize, Serialize};

use crate::error::ValidationFailure;
use crate::validate;

/// A group of people sharing expenses.
///
/// `id` is `None` until the store persists the record; the store assigns
/// the identifier on first insert and it never changes afterwards.
/// Deleting a group cascades to all bills and members referencing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Option<EntityId>,
    pub name: String,
}

impl Group {
    pub const IS_NAME_REQUIRED: bool = true;
    pub const MIN_NAME_LEN: usize = 3;
    pub const MAX_NAME_LEN: usize = 50;

    /// Creates a new, not-yet-persisted group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Validates every field, aggregating all failures.
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        ValidationFailure::from_fields([(
            "name",
            validate::check_text(
                &self.name,
                Self::IS_NAME_REQUIRED,
                Self::MIN_NAME_LEN,
                Self::MAX_NAME_LEN,
            ),
        )])
    }
}
