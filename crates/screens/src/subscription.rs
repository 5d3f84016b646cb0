//! Cancellable live-query subscription handles.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::JoinHandle;

/// Owner of at most one live list subscription task.
///
/// Replacing the subscription cancels the previous task *before* the
/// caller requests the new query, and hands back a [`SubscriptionToken`]
/// stamped with the new generation. The consuming task must check its
/// token *inside* each state write closure (the state channel serializes
/// writers, so the check and the write are then atomic with respect to
/// other writers); a task whose token is stale performs no further writes.
/// Together with the abort this guarantees that a snapshot produced under
/// a superseded subscription can never overwrite newer state.
#[derive(Debug, Default)]
pub struct ListSubscription {
    handle: Option<JoinHandle<()>>,
    generation: Arc<AtomicU64>,
}

/// Generation stamp handed to a subscription task.
#[derive(Debug, Clone)]
pub struct SubscriptionToken {
    generation: Arc<AtomicU64>,
    value: u64,
}

impl SubscriptionToken {
    /// True while no newer subscription has been started.
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.value
    }
}

impl ListSubscription {
    /// Creates an idle handle with no active task.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the active task (if any) and starts a new generation.
    ///
    /// Call this before requesting the replacement query, then [`attach`]
    /// the new task. The returned token belongs to the new generation.
    ///
    /// [`attach`]: ListSubscription::attach
    pub fn replace(&mut self) -> SubscriptionToken {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        let value = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        SubscriptionToken {
            generation: Arc::clone(&self.generation),
            value,
        }
    }

    /// Adopts the task driving the current generation's stream.
    pub fn attach(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.handle.replace(handle) {
            previous.abort();
        }
    }

    /// Cancels the active task without starting a replacement.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for ListSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
