//! Use case layer: the boundary the presentation layer talks to.
//!
//! Query use cases are thin, stateless wrappers that hand out live ordered
//! sequences from the entity store. Mutation use cases revalidate the full
//! candidate record and refuse with an aggregate [`UseCaseError::Invalid`]
//! before the store is ever invoked, so no partial writes can happen.

pub mod bill;
pub mod error;
pub mod group;
pub mod member;

pub use bill::BillUseCases;
pub use error::{Result, UseCaseError};
pub use group::GroupUseCases;
pub use member::MemberUseCases;
