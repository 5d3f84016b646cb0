use common::EntityId;
use thiserror::Error;

/// Errors that can occur when interacting with the entity store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The record (or a parent it references) does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        entity: &'static str,
        id: EntityId,
    },

    /// The persistence backend is unavailable or failed.
    ///
    /// The in-memory store never produces this; backends over a real
    /// storage engine surface their failures through it.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for entity store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
