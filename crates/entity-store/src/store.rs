use std::pin::Pin;

use async_trait::async_trait;
use common::EntityId;
use domain::{Bill, BillOrder, Group, GroupOrder, Member, MemberOrder};
use futures_core::Stream;

use crate::Result;

/// A live sequence of full ordered list snapshots.
///
/// On subscribe the stream yields the current snapshot immediately, then
/// one new snapshot per relevant insert, update, or delete. The stream is
/// unbounded; cancel it by dropping it (or aborting the task consuming
/// it). It ends only when the store itself is dropped.
pub type ListStream<T> = Pin<Box<dyn Stream<Item = Vec<T>> + Send>>;

/// Core trait for entity store implementations.
///
/// Exposes per-entity point reads, live ordered observation, and writes.
/// All implementations must be thread-safe (Send + Sync) and must provide
/// snapshot-consistent reads: a completed write is reflected in every
/// observing stream's next emitted snapshot.
///
/// Ordering is a store-level instruction: the comparator comes from the
/// ordering policy in `domain` and the store applies it when materializing
/// each snapshot.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Point read of a group. Returns `None` for an unknown id.
    async fn group_by_id(&self, id: EntityId) -> Result<Option<Group>>;

    /// Point read of a bill.
    async fn bill_by_id(&self, id: EntityId) -> Result<Option<Bill>>;

    /// Point read of a member.
    async fn member_by_id(&self, id: EntityId) -> Result<Option<Member>>;

    /// Observes all groups under the given order.
    async fn observe_groups(&self, order: GroupOrder) -> Result<ListStream<Group>>;

    /// Observes the bills of one group under the given order.
    async fn observe_bills(&self, group_id: EntityId, order: BillOrder)
    -> Result<ListStream<Bill>>;

    /// Observes the members of one group under the given order.
    async fn observe_members(
        &self,
        group_id: EntityId,
        order: MemberOrder,
    ) -> Result<ListStream<Member>>;

    /// Inserts or updates a group.
    ///
    /// Inserts (assigning a fresh id) when `group.id` is `None`; otherwise
    /// updates the matching record, failing with [`StoreError::NotFound`]
    /// when it has vanished. Returns the record's identifier.
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    async fn upsert_group(&self, group: Group) -> Result<EntityId>;

    /// Inserts or updates a bill. The referenced group must exist.
    async fn upsert_bill(&self, bill: Bill) -> Result<EntityId>;

    /// Inserts or updates a member. The referenced group must exist.
    async fn upsert_member(&self, member: Member) -> Result<EntityId>;

    /// Deletes a group and, by cascade, all bills and members
    /// referencing it.
    async fn delete_group(&self, id: EntityId) -> Result<()>;

    /// Deletes a bill.
    async fn delete_bill(&self, id: EntityId) -> Result<()>;

    /// Deletes a member.
    async fn delete_member(&self, id: EntityId) -> Result<()>;
}
