use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a persisted record.
///
/// Newtype over a UUID so record identifiers cannot be confused with
/// other UUID-based values. The store assigns an `EntityId` on first
/// insert; it never changes afterwards.
///
/// Ordered (`Ord`) so comparators can use it as a deterministic
/// tie-break key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Generates a fresh random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps a pre-existing UUID, mainly for fixtures and imports.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Exposes the wrapped UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<EntityId> for Uuid {
    fn from(id: EntityId) -> Self {
        id.0
    }
}
