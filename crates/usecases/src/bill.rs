//! Bill use cases.

use std::sync::Arc;

use common::EntityId;
use domain::{Bill, BillOrder};
use entity_store::{EntityStore, ListStream};

use crate::Result;

/// Use cases for managing bills.
#[derive(Clone)]
pub struct BillUseCases {
    store: Arc<dyn EntityStore>,
}

impl BillUseCases {
    /// Creates the use cases over the given store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Live ordered sequence of one group's bills.
    ///
    /// Stateless: liveness and caching are the store's responsibility.
    pub async fn get_bills(
        &self,
        group_id: EntityId,
        order: BillOrder,
    ) -> Result<ListStream<Bill>> {
        Ok(self.store.observe_bills(group_id, order).await?)
    }

    /// Single-shot read of one bill, used for edit-form initialization.
    pub async fn get_bill_by_id(&self, id: EntityId) -> Result<Option<Bill>> {
        Ok(self.store.bill_by_id(id).await?)
    }

    /// Validates the candidate bill and writes it.
    ///
    /// When any field check fails, refuses with an aggregate validation
    /// failure without invoking the store. On success returns the record's
    /// identifier (freshly assigned for inserts).
    #[tracing::instrument(skip(self))]
    pub async fn upsert_bill(&self, bill: Bill) -> Result<EntityId> {
        bill.validate()?;
        Ok(self.store.upsert_bill(bill).await?)
    }

    /// Deletes a bill.
    #[tracing::instrument(skip(self))]
    pub async fn delete_bill(&self, id: EntityId) -> Result<()> {
        Ok(self.store.delete_bill(id).await?)
    }
}
