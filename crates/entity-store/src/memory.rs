use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use domain::{Bill, BillOrder, Group, GroupOrder, Member, MemberOrder};
use futures_util::stream;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{RwLock, broadcast};

use crate::{EntityStore, ListStream, Result, StoreError};

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Which slice of the data a completed write touched.
///
/// Bill and member changes carry their group scope so that observers of
/// other groups are not woken up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Groups,
    Bills { group_id: EntityId },
    Members { group_id: EntityId },
}

#[derive(Default)]
struct Tables {
    groups: HashMap<EntityId, Group>,
    bills: HashMap<EntityId, Bill>,
    members: HashMap<EntityId, Member>,
}

/// In-memory entity store implementation.
///
/// Writes take the table write lock, mutate, release, and then publish a
/// [`Change`] notification; observers recompute their snapshot under the
/// read lock, so every emitted snapshot reflects all completed writes.
/// A lagged observer resynchronizes the same way: it recomputes from
/// current state instead of replaying missed notifications.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    changes: broadcast::Sender<Change>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new empty store with the given change-feed capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(capacity);
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            changes,
        }
    }

    /// Returns the number of stored groups.
    pub async fn group_count(&self) -> usize {
        self.tables.read().await.groups.len()
    }

    /// Returns the number of stored bills.
    pub async fn bill_count(&self) -> usize {
        self.tables.read().await.bills.len()
    }

    /// Returns the number of stored members.
    pub async fn member_count(&self) -> usize {
        self.tables.read().await.members.len()
    }

    /// Clears all tables.
    pub async fn clear(&self) {
        let mut tables = self.tables.write().await;
        tables.groups.clear();
        tables.bills.clear();
        tables.members.clear();
    }

    fn notify(&self, change: Change) {
        tracing::trace!(?change, "store change");
        // No receivers is fine; send only fails when nobody listens.
        let _ = self.changes.send(change);
    }

    /// Builds a live snapshot stream: the current snapshot first, then one
    /// recomputed snapshot per matching change.
    fn observe<T, F, M>(&self, snapshot: F, is_relevant: M) -> ListStream<T>
    where
        T: Send + 'static,
        F: Fn(&Tables) -> Vec<T> + Send + Sync + 'static,
        M: Fn(Change) -> bool + Send + Sync + 'static,
    {
        let tables = Arc::clone(&self.tables);
        let rx = self.changes.subscribe();
        let stream = stream::unfold(
            (tables, rx, snapshot, is_relevant, false),
            |(tables, mut rx, snapshot, is_relevant, primed)| async move {
                if !primed {
                    let list = snapshot(&*tables.read().await);
                    metrics::counter!("store_snapshots_emitted").increment(1);
                    return Some((list, (tables, rx, snapshot, is_relevant, true)));
                }
                loop {
                    match rx.recv().await {
                        Ok(change) if is_relevant(change) => {
                            let list = snapshot(&*tables.read().await);
                            metrics::counter!("store_snapshots_emitted").increment(1);
                            return Some((list, (tables, rx, snapshot, is_relevant, true)));
                        }
                        Ok(_) => continue,
                        Err(RecvError::Lagged(missed)) => {
                            tracing::debug!(missed, "observer lagged, resynchronizing");
                            let list = snapshot(&*tables.read().await);
                            metrics::counter!("store_snapshots_emitted").increment(1);
                            return Some((list, (tables, rx, snapshot, is_relevant, true)));
                        }
                        Err(RecvError::Closed) => return None,
                    }
                }
            },
        );
        Box::pin(stream)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn group_by_id(&self, id: EntityId) -> Result<Option<Group>> {
        Ok(self.tables.read().await.groups.get(&id).cloned())
    }

    async fn bill_by_id(&self, id: EntityId) -> Result<Option<Bill>> {
        Ok(self.tables.read().await.bills.get(&id).cloned())
    }

    async fn member_by_id(&self, id: EntityId) -> Result<Option<Member>> {
        Ok(self.tables.read().await.members.get(&id).cloned())
    }

    async fn observe_groups(&self, order: GroupOrder) -> Result<ListStream<Group>> {
        Ok(self.observe(
            move |tables| {
                let mut groups: Vec<Group> = tables.groups.values().cloned().collect();
                groups.sort_by(|a, b| order.compare(a, b));
                groups
            },
            |change| matches!(change, Change::Groups),
        ))
    }

    async fn observe_bills(
        &self,
        group_id: EntityId,
        order: BillOrder,
    ) -> Result<ListStream<Bill>> {
        Ok(self.observe(
            move |tables| {
                let mut bills: Vec<Bill> = tables
                    .bills
                    .values()
                    .filter(|bill| bill.group_id == group_id)
                    .cloned()
                    .collect();
                bills.sort_by(|a, b| order.compare(a, b));
                bills
            },
            move |change| change == Change::Bills { group_id },
        ))
    }

    async fn observe_members(
        &self,
        group_id: EntityId,
        order: MemberOrder,
    ) -> Result<ListStream<Member>> {
        Ok(self.observe(
            move |tables| {
                let mut members: Vec<Member> = tables
                    .members
                    .values()
                    .filter(|member| member.group_id == group_id)
                    .cloned()
                    .collect();
                members.sort_by(|a, b| order.compare(a, b));
                members
            },
            move |change| change == Change::Members { group_id },
        ))
    }

    async fn upsert_group(&self, group: Group) -> Result<EntityId> {
        let mut tables = self.tables.write().await;
        let id = match group.id {
            Some(id) if !tables.groups.contains_key(&id) => {
                return Err(StoreError::NotFound { entity: "group", id });
            }
            Some(id) => id,
            None => EntityId::new(),
        };
        tables.groups.insert(id, Group { id: Some(id), ..group });
        drop(tables);
        metrics::counter!("store_writes", "entity" => "group").increment(1);
        self.notify(Change::Groups);
        Ok(id)
    }

    async fn upsert_bill(&self, bill: Bill) -> Result<EntityId> {
        let mut tables = self.tables.write().await;
        if !tables.groups.contains_key(&bill.group_id) {
            return Err(StoreError::NotFound {
                entity: "group",
                id: bill.group_id,
            });
        }
        let id = match bill.id {
            Some(id) if !tables.bills.contains_key(&id) => {
                return Err(StoreError::NotFound { entity: "bill", id });
            }
            Some(id) => id,
            None => EntityId::new(),
        };
        let group_id = bill.group_id;
        let previous = tables.bills.insert(id, Bill { id: Some(id), ..bill });
        drop(tables);
        metrics::counter!("store_writes", "entity" => "bill").increment(1);
        self.notify(Change::Bills { group_id });
        // A move between groups must also wake the old scope's observers.
        if let Some(previous) = previous
            && previous.group_id != group_id
        {
            self.notify(Change::Bills {
                group_id: previous.group_id,
            });
        }
        Ok(id)
    }

    async fn upsert_member(&self, member: Member) -> Result<EntityId> {
        let mut tables = self.tables.write().await;
        if !tables.groups.contains_key(&member.group_id) {
            return Err(StoreError::NotFound {
                entity: "group",
                id: member.group_id,
            });
        }
        let id = match member.id {
            Some(id) if !tables.members.contains_key(&id) => {
                return Err(StoreError::NotFound { entity: "member", id });
            }
            Some(id) => id,
            None => EntityId::new(),
        };
        let group_id = member.group_id;
        let previous = tables.members.insert(
            id,
            Member {
                id: Some(id),
                ..member
            },
        );
        drop(tables);
        metrics::counter!("store_writes", "entity" => "member").increment(1);
        self.notify(Change::Members { group_id });
        if let Some(previous) = previous
            && previous.group_id != group_id
        {
            self.notify(Change::Members {
                group_id: previous.group_id,
            });
        }
        Ok(id)
    }

    async fn delete_group(&self, id: EntityId) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.groups.remove(&id).is_none() {
            return Err(StoreError::NotFound { entity: "group", id });
        }
        // Cascade: drop every dependent of this group, and nothing else.
        tables.bills.retain(|_, bill| bill.group_id != id);
        tables.members.retain(|_, member| member.group_id != id);
        drop(tables);
        metrics::counter!("store_deletes", "entity" => "group").increment(1);
        self.notify(Change::Groups);
        self.notify(Change::Bills { group_id: id });
        self.notify(Change::Members { group_id: id });
        Ok(())
    }

    async fn delete_bill(&self, id: EntityId) -> Result<()> {
        let mut tables = self.tables.write().await;
        let Some(bill) = tables.bills.remove(&id) else {
            return Err(StoreError::NotFound { entity: "bill", id });
        };
        drop(tables);
        metrics::counter!("store_deletes", "entity" => "bill").increment(1);
        self.notify(Change::Bills {
            group_id: bill.group_id,
        });
        Ok(())
    }

    async fn delete_member(&self, id: EntityId) -> Result<()> {
        let mut tables = self.tables.write().await;
        let Some(member) = tables.members.remove(&id) else {
            return Err(StoreError::NotFound { entity: "member", id });
        };
        drop(tables);
        metrics::counter!("store_deletes", "entity" => "member").increment(1);
        self.notify(Change::Members {
            group_id: member.group_id,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Money, OrderType};
    use futures_util::StreamExt;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn seeded_group(store: &InMemoryStore) -> EntityId {
        store
            .upsert_group(Group::new("Holiday trip"))
            .await
            .unwrap()
    }

    fn bill(group_id: EntityId, name: &str, cents: i64) -> Bill {
        Bill {
            id: None,
            group_id,
            name: name.to_string(),
            description: None,
            amount: Some(Money::from_cents(cents)),
            date: None,
        }
    }

    async fn next_snapshot<T>(stream: &mut ListStream<T>) -> Vec<T> {
        timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("timed out waiting for snapshot")
            .expect("stream ended unexpectedly")
    }

    #[tokio::test]
    async fn upsert_assigns_id_on_first_insert() {
        let store = InMemoryStore::new();
        let id = seeded_group(&store).await;

        let stored = store.group_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.id, Some(id));
        assert_eq!(stored.name, "Holiday trip");
    }

    #[tokio::test]
    async fn upsert_with_id_updates_in_place() {
        let store = InMemoryStore::new();
        let id = seeded_group(&store).await;

        let renamed = Group {
            id: Some(id),
            name: "Summer trip".to_string(),
        };
        let same_id = store.upsert_group(renamed).await.unwrap();
        assert_eq!(same_id, id);
        assert_eq!(store.group_count().await, 1);
        let stored = store.group_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Summer trip");
    }

    #[tokio::test]
    async fn upsert_of_vanished_id_is_not_found() {
        let store = InMemoryStore::new();
        let ghost = Group {
            id: Some(EntityId::new()),
            name: "Ghost".to_string(),
        };
        let result = store.upsert_group(ghost).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn upsert_bill_requires_existing_group() {
        let store = InMemoryStore::new();
        let result = store.upsert_bill(bill(EntityId::new(), "Dinner", 100)).await;
        assert!(matches!(
            result,
            Err(StoreError::NotFound {
                entity: "group",
                ..
            })
        ));
        assert_eq!(store.bill_count().await, 0);
    }

    #[tokio::test]
    async fn delete_of_missing_record_is_not_found() {
        let store = InMemoryStore::new();
        let result = store.delete_bill(EntityId::new()).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn cascade_delete_removes_only_that_groups_dependents() {
        let store = InMemoryStore::new();
        let g1 = seeded_group(&store).await;
        let g2 = store.upsert_group(Group::new("Flatmates")).await.unwrap();

        let b1 = store.upsert_bill(bill(g1, "Dinner", 4250)).await.unwrap();
        let b2 = store.upsert_bill(bill(g2, "Rent", 90000)).await.unwrap();
        store
            .upsert_member(Member::new(g1, "Alice"))
            .await
            .unwrap();
        let m2 = store.upsert_member(Member::new(g2, "Bob")).await.unwrap();

        store.delete_group(g1).await.unwrap();

        assert!(store.group_by_id(g1).await.unwrap().is_none());
        assert!(store.bill_by_id(b1).await.unwrap().is_none());
        assert_eq!(store.member_count().await, 1);
        // The other group is untouched.
        assert!(store.group_by_id(g2).await.unwrap().is_some());
        assert!(store.bill_by_id(b2).await.unwrap().is_some());
        assert!(store.member_by_id(m2).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn observe_emits_current_snapshot_immediately() {
        let store = InMemoryStore::new();
        let group_id = seeded_group(&store).await;
        store.upsert_bill(bill(group_id, "Dinner", 4250)).await.unwrap();

        let mut stream = store
            .observe_bills(group_id, BillOrder::default())
            .await
            .unwrap();
        let snapshot = next_snapshot(&mut stream).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name, "Dinner");
    }

    #[tokio::test]
    async fn observe_reemits_on_matching_change() {
        let store = InMemoryStore::new();
        let group_id = seeded_group(&store).await;

        let mut stream = store
            .observe_bills(group_id, BillOrder::Name(OrderType::Ascending))
            .await
            .unwrap();
        assert!(next_snapshot(&mut stream).await.is_empty());

        store.upsert_bill(bill(group_id, "Taxi", 1500)).await.unwrap();
        let snapshot = next_snapshot(&mut stream).await;
        assert_eq!(snapshot.len(), 1);

        store.upsert_bill(bill(group_id, "Dinner", 4250)).await.unwrap();
        let snapshot = next_snapshot(&mut stream).await;
        // Full ordered snapshot, not a delta.
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].name, "Dinner");
        assert_eq!(snapshot[1].name, "Taxi");
    }

    #[tokio::test]
    async fn observe_ignores_changes_in_other_scopes() {
        let store = InMemoryStore::new();
        let g1 = seeded_group(&store).await;
        let g2 = store.upsert_group(Group::new("Flatmates")).await.unwrap();

        let mut stream = store
            .observe_bills(g1, BillOrder::default())
            .await
            .unwrap();
        assert!(next_snapshot(&mut stream).await.is_empty());

        store.upsert_bill(bill(g2, "Rent", 90000)).await.unwrap();
        let no_emission = timeout(Duration::from_millis(50), stream.next()).await;
        assert!(no_emission.is_err());
    }

    #[tokio::test]
    async fn observe_groups_applies_order() {
        let store = InMemoryStore::new();
        store.upsert_group(Group::new("Trip")).await.unwrap();
        store.upsert_group(Group::new("Flatmates")).await.unwrap();

        let mut stream = store
            .observe_groups(GroupOrder::Name(OrderType::Descending))
            .await
            .unwrap();
        let snapshot = next_snapshot(&mut stream).await;
        assert_eq!(snapshot[0].name, "Trip");
        assert_eq!(snapshot[1].name, "Flatmates");
    }

    #[tokio::test]
    async fn moving_a_bill_between_groups_notifies_both_scopes() {
        let store = InMemoryStore::new();
        let g1 = seeded_group(&store).await;
        let g2 = store.upsert_group(Group::new("Flatmates")).await.unwrap();
        let id = store.upsert_bill(bill(g1, "Dinner", 4250)).await.unwrap();

        let mut old_scope = store.observe_bills(g1, BillOrder::default()).await.unwrap();
        let mut new_scope = store.observe_bills(g2, BillOrder::default()).await.unwrap();
        assert_eq!(next_snapshot(&mut old_scope).await.len(), 1);
        assert!(next_snapshot(&mut new_scope).await.is_empty());

        let mut moved = bill(g2, "Dinner", 4250);
        moved.id = Some(id);
        store.upsert_bill(moved).await.unwrap();

        // The bill leaves the old scope and arrives in the new one.
        assert!(next_snapshot(&mut old_scope).await.is_empty());
        let snapshot = next_snapshot(&mut new_scope).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, Some(id));
    }

    #[tokio::test]
    async fn moving_a_member_between_groups_notifies_the_old_scope() {
        let store = InMemoryStore::new();
        let g1 = seeded_group(&store).await;
        let g2 = store.upsert_group(Group::new("Flatmates")).await.unwrap();
        let id = store.upsert_member(Member::new(g1, "Alice")).await.unwrap();

        let mut old_scope = store
            .observe_members(g1, MemberOrder::default())
            .await
            .unwrap();
        assert_eq!(next_snapshot(&mut old_scope).await.len(), 1);

        let mut moved = Member::new(g2, "Alice");
        moved.id = Some(id);
        store.upsert_member(moved).await.unwrap();

        assert!(next_snapshot(&mut old_scope).await.is_empty());
    }

    #[tokio::test]
    async fn group_delete_drains_dependent_observers() {
        let store = InMemoryStore::new();
        let group_id = seeded_group(&store).await;
        store.upsert_bill(bill(group_id, "Dinner", 4250)).await.unwrap();

        let mut stream = store
            .observe_bills(group_id, BillOrder::default())
            .await
            .unwrap();
        assert_eq!(next_snapshot(&mut stream).await.len(), 1);

        store.delete_group(group_id).await.unwrap();
        assert!(next_snapshot(&mut stream).await.is_empty());
    }
}
