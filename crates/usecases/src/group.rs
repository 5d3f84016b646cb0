//! Group use cases.

use std::sync::Arc;

use common::EntityId;
use domain::{Group, GroupOrder};
use entity_store::{EntityStore, ListStream};

use crate::Result;

/// Use cases for managing groups.
#[derive(Clone)]
pub struct GroupUseCases {
    store: Arc<dyn EntityStore>,
}

impl GroupUseCases {
    /// Creates the use cases over the given store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Live ordered sequence of all groups.
    pub async fn get_groups(&self, order: GroupOrder) -> Result<ListStream<Group>> {
        Ok(self.store.observe_groups(order).await?)
    }

    /// Single-shot read of one group.
    pub async fn get_group_by_id(&self, id: EntityId) -> Result<Option<Group>> {
        Ok(self.store.group_by_id(id).await?)
    }

    /// Validates the candidate group and writes it.
    ///
    /// When any field check fails, refuses with an aggregate validation
    /// failure without invoking the store.
    #[tracing::instrument(skip(self))]
    pub async fn upsert_group(&self, group: Group) -> Result<EntityId> {
        group.validate()?;
        Ok(self.store.upsert_group(group).await?)
    }

    /// Deletes a group and, by store-level cascade, its bills and members.
    #[tracing::instrument(skip(self))]
    pub async fn delete_group(&self, id: EntityId) -> Result<()> {
        Ok(self.store.delete_group(id).await?)
    }
}
