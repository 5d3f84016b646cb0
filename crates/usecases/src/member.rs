//! Member use cases.

use std::sync::Arc;

use common::EntityId;
use domain::{Member, MemberOrder};
use entity_store::{EntityStore, ListStream};

use crate::Result;

/// Use cases for managing group members.
#[derive(Clone)]
pub struct MemberUseCases {
    store: Arc<dyn EntityStore>,
}

impl MemberUseCases {
    /// Creates the use cases over the given store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Live ordered sequence of one group's members.
    pub async fn get_members(
        &self,
        group_id: EntityId,
        order: MemberOrder,
    ) -> Result<ListStream<Member>> {
        Ok(self.store.observe_members(group_id, order).await?)
    }

    /// Single-shot read of one member.
    pub async fn get_member_by_id(&self, id: EntityId) -> Result<Option<Member>> {
        Ok(self.store.member_by_id(id).await?)
    }

    /// Validates the candidate member and writes it.
    #[tracing::instrument(skip(self))]
    pub async fn upsert_member(&self, member: Member) -> Result<EntityId> {
        member.validate()?;
        Ok(self.store.upsert_member(member).await?)
    }

    /// Deletes a member.
    #[tracing::instrument(skip(self))]
    pub async fn delete_member(&self, id: EntityId) -> Result<()> {
        Ok(self.store.delete_member(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UseCaseError;
    use domain::Group;
    use entity_store::{EntityStore, InMemoryStore};

    #[tokio::test]
    async fn invalid_member_never_reaches_the_store() {
        let store = Arc::new(InMemoryStore::new());
        let group_id = store.upsert_group(Group::new("Trip")).await.unwrap();
        let use_cases = MemberUseCases::new(store.clone());

        let result = use_cases.upsert_member(Member::new(group_id, "ab")).await;
        assert!(matches!(result, Err(UseCaseError::Invalid(_))));
        assert_eq!(store.member_count().await, 0);
    }

    #[tokio::test]
    async fn valid_member_is_persisted() {
        let store = Arc::new(InMemoryStore::new());
        let group_id = store.upsert_group(Group::new("Trip")).await.unwrap();
        let use_cases = MemberUseCases::new(store.clone());

        let id = use_cases
            .upsert_member(Member::new(group_id, "Alice"))
            .await
            .unwrap();
        assert!(use_cases.get_member_by_id(id).await.unwrap().is_some());
    }
}
