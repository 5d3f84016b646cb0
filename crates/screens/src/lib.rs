//! State synchronizers: one mutable state snapshot per screen.
//!
//! Each model owns its screen's state behind a `tokio::sync::watch`
//! channel (single writer, read-only snapshots for consumers), turns
//! presentation intents into use case calls, and keeps the state in sync
//! with the store's live ordered sequences:
//! - [`GroupsModel`]: the groups list
//! - [`GroupDetailsModel`]: one group's bills and members, independently
//!   ordered, plus group deletion
//! - [`AddEditBillModel`]: the add/edit bill form state machine
//!
//! Live list subscriptions follow a strict cancel-before-replace rule
//! (see [`subscription::ListSubscription`]): a snapshot produced under a
//! superseded order can never overwrite newer state. Store failures never
//! crash a screen; they are downgraded to notices and the last stable
//! state is kept.

pub mod add_edit_bill;
pub mod group_details;
pub mod groups;
pub mod input;
pub mod subscription;

pub use add_edit_bill::{
    AddEditBillEvent, AddEditBillModel, AddEditBillNotice, AddEditBillState, FormPhase,
};
pub use group_details::{
    GroupDetailsEvent, GroupDetailsModel, GroupDetailsNotice, GroupDetailsState,
};
pub use groups::{GroupsEvent, GroupsModel, GroupsState};
pub use input::{DateState, TextFieldState};
