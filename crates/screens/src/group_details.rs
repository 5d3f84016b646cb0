//! Group details screen: one group's bills and members.

use common::EntityId;
use domain::{Bill, BillOrder, Group, Member, MemberOrder};
use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use usecases::{BillUseCases, GroupUseCases, MemberUseCases};

use crate::subscription::ListSubscription;

/// Snapshot of the group details screen.
#[derive(Debug, Clone, Default)]
pub struct GroupDetailsState {
    pub group: Option<Group>,
    pub bills: Vec<Bill>,
    pub bill_order: BillOrder,
    pub members: Vec<Member>,
    pub member_order: MemberOrder,
}

/// Intents the presentation layer can emit for the details screen.
#[derive(Debug, Clone, Copy)]
pub enum GroupDetailsEvent {
    OrderBills(BillOrder),
    OrderMembers(MemberOrder),
    DeleteGroup,
}

/// One-shot notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupDetailsNotice {
    /// The group was deleted; the screen should navigate away.
    GroupDeleted,
    /// A failed operation, downgraded to a message. State is unchanged.
    Error(String),
}

/// State synchronizer for the group details screen.
///
/// Maintains two independent live subscriptions (bills and members),
/// each with its own order and its own cancel-before-replace handle.
pub struct GroupDetailsModel {
    group_id: EntityId,
    group_use_cases: GroupUseCases,
    bill_use_cases: BillUseCases,
    member_use_cases: MemberUseCases,
    state: watch::Sender<GroupDetailsState>,
    notices: mpsc::UnboundedSender<GroupDetailsNotice>,
    bills_subscription: ListSubscription,
    members_subscription: ListSubscription,
}

impl GroupDetailsModel {
    /// Creates the model, loads the group, and subscribes both lists
    /// under their default orders.
    pub async fn new(
        group_id: EntityId,
        group_use_cases: GroupUseCases,
        bill_use_cases: BillUseCases,
        member_use_cases: MemberUseCases,
    ) -> (Self, mpsc::UnboundedReceiver<GroupDetailsNotice>) {
        let (notices, notices_rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(GroupDetailsState::default());
        let mut model = Self {
            group_id,
            group_use_cases,
            bill_use_cases,
            member_use_cases,
            state,
            notices,
            bills_subscription: ListSubscription::new(),
            members_subscription: ListSubscription::new(),
        };
        model.load_group().await;
        model.subscribe_bills(BillOrder::default()).await;
        model.subscribe_members(MemberOrder::default()).await;
        (model, notices_rx)
    }

    /// Read-only view of the screen state.
    pub fn state(&self) -> watch::Receiver<GroupDetailsState> {
        self.state.subscribe()
    }

    /// Dispatches a presentation intent.
    pub async fn handle(&mut self, event: GroupDetailsEvent) {
        match event {
            GroupDetailsEvent::OrderBills(order) => self.subscribe_bills(order).await,
            GroupDetailsEvent::OrderMembers(order) => self.subscribe_members(order).await,
            GroupDetailsEvent::DeleteGroup => self.delete_group().await,
        }
    }

    async fn load_group(&mut self) {
        match self.group_use_cases.get_group_by_id(self.group_id).await {
            Ok(group) => self.state.send_modify(|state| state.group = group),
            Err(error) => {
                tracing::warn!(%error, "failed to load group");
                let _ = self
                    .notices
                    .send(GroupDetailsNotice::Error(error.to_string()));
            }
        }
    }

    async fn subscribe_bills(&mut self, order: BillOrder) {
        let token = self.bills_subscription.replace();
        match self.bill_use_cases.get_bills(self.group_id, order).await {
            Ok(mut stream) => {
                self.state.send_modify(|state| state.bill_order = order);
                let state = self.state.clone();
                let handle = tokio::spawn(async move {
                    while let Some(bills) = stream.next().await {
                        if !token.is_current() {
                            break;
                        }
                        // Re-checked inside the write; send_modify serializes
                        // writers, closing the gap between check and write.
                        state.send_modify(|state| {
                            if token.is_current() {
                                state.bills = bills;
                            }
                        });
                    }
                });
                self.bills_subscription.attach(handle);
            }
            Err(error) => tracing::warn!(%error, "bills subscription failed"),
        }
    }

    async fn subscribe_members(&mut self, order: MemberOrder) {
        let token = self.members_subscription.replace();
        match self
            .member_use_cases
            .get_members(self.group_id, order)
            .await
        {
            Ok(mut stream) => {
                self.state.send_modify(|state| state.member_order = order);
                let state = self.state.clone();
                let handle = tokio::spawn(async move {
                    while let Some(members) = stream.next().await {
                        if !token.is_current() {
                            break;
                        }
                        state.send_modify(|state| {
                            if token.is_current() {
                                state.members = members;
                            }
                        });
                    }
                });
                self.members_subscription.attach(handle);
            }
            Err(error) => tracing::warn!(%error, "members subscription failed"),
        }
    }

    async fn delete_group(&mut self) {
        match self.group_use_cases.delete_group(self.group_id).await {
            Ok(()) => {
                tracing::info!(group_id = %self.group_id, "group deleted");
                let _ = self.notices.send(GroupDetailsNotice::GroupDeleted);
            }
            Err(error) => {
                let _ = self
                    .notices
                    .send(GroupDetailsNotice::Error(error.to_string()));
            }
        }
    }
}
