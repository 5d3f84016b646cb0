//! Entity store: persistence contract and in-memory implementation.
//!
//! This crate provides:
//! - [`EntityStore`]: per-entity CRUD plus live ordered observation,
//!   the contract the query/mutation layer is written against
//! - [`ListStream`]: an unbounded, cancellable stream of full ordered
//!   list snapshots, one per underlying data change
//! - [`InMemoryStore`]: the reference implementation backing tests and
//!   in-process use, including cascade delete of a group's dependents

pub mod error;
pub mod memory;
pub mod store;

pub use common::EntityId;
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use store::{EntityStore, ListStream};
