//! Member entity: a participant within a group.

use common::EntityId;
use serde::{Deserialize, Serialize};

use crate::error::ValidationFailure;
use crate::validate;

/// A member of a group.
///
/// Holds a non-owning back-reference to its parent group, used only for
/// lookup and filtering. Deleted transitively when the group is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Option<EntityId>,
    pub group_id: EntityId,
    pub name: String,
}

impl Member {
    pub const IS_NAME_REQUIRED: bool = true;
    pub const MIN_NAME_LEN: usize = 3;
    pub const MAX_NAME_LEN: usize = 50;

    /// Creates a new, not-yet-persisted member of the given group.
    pub fn new(group_id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id: None,
            group_id,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::InvalidInput;

    #[test]
    fn valid_member_passes() {
        assert!(Member::new(EntityId::new(), "Alice").validate().is_ok());
    }

    #[test]
    fn empty_name_is_required() {
        let failure = Member::new(EntityId::new(), "").validate().unwrap_err();
        assert_eq!(failure.field("name"), Some(InvalidInput::Required));
    }
}
