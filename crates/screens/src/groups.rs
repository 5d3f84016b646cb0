//! Groups list screen.

use domain::{Group, GroupOrder};
use futures_util::StreamExt;
use tokio::sync::watch;
use usecases::GroupUseCases;

use crate::subscription::ListSubscription;

/// Snapshot of the groups list screen.
#[derive(Debug, Clone, Default)]
pub struct GroupsState {
    pub groups: Vec<Group>,
    pub order: GroupOrder,
}

/// Intents the presentation layer can emit for the groups list.
#[derive(Debug, Clone, Copy)]
pub enum GroupsEvent {
    Order(GroupOrder),
}

/// State synchronizer for the groups list.
///
/// Holds exactly one live subscription; an order-change intent cancels it
/// before the replacement query is requested.
pub struct GroupsModel {
    use_cases: GroupUseCases,
    state: watch::Sender<GroupsState>,
    subscription: ListSubscription,
}

impl GroupsModel {
    /// Creates the model and subscribes under the default order.
    pub async fn new(use_cases: GroupUseCases) -> Self {
        let (state, _) = watch::channel(GroupsState::default());
        let mut model = Self {
            use_cases,
            state,
            subscription: ListSubscription::new(),
        };
        model.subscribe(GroupOrder::default()).await;
        model
    }

    /// Read-only view of the screen state.
    pub fn state(&self) -> watch::Receiver<GroupsState> {
        self.state.subscribe()
    }

    /// Dispatches a presentation intent.
    pub async fn handle(&mut self, event: GroupsEvent) {
        match event {
            GroupsEvent::Order(order) => self.subscribe(order).await,
        }
    }

    async fn subscribe(&mut self, order: GroupOrder) {
        // Cancel strictly before the replacement query is requested.
        let token = self.subscription.replace();
        match self.use_cases.get_groups(order).await {
            Ok(mut stream) => {
                self.state.send_modify(|state| state.order = order);
                let state = self.state.clone();
                let handle = tokio::spawn(async move {
                    while let Some(groups) = stream.next().await {
                        if !token.is_current() {
                            break;
                        }
                        // Re-checked inside the write: send_modify serializes
                        // writers, so a snapshot from a superseded generation
                        // cannot land after the replacement starts writing.
                        state.send_modify(|state| {
                            if token.is_current() {
                                state.groups = groups;
                            }
                        });
                    }
                });
                self.subscription.attach(handle);
            }
            Err(error) => {
                // Keep the last stable state; the screen must not crash.
                tracing::warn!(%error, "groups subscription failed");
            }
        }
    }
}
