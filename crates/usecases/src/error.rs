use domain::ValidationFailure;
use entity_store::StoreError;
use thiserror::Error;

/// Errors surfaced at the use case boundary.
#[derive(Debug, Clone, Error)]
pub enum UseCaseError {
    /// The candidate record failed field validation; the store was not
    /// invoked.
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    /// The store refused or failed the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for use case operations.
pub type Result<T> = std::result::Result<T, UseCaseError>;
