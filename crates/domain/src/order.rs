//! Ordering policy: order selections and their comparators.
//!
//! An order selection is a field plus a direction. It yields a total order
//! over the entity type: the chosen field is the primary key with the
//! direction applied, and the entity id (ascending, regardless of
//! direction) breaks ties so repeated sorts are stable and deterministic
//! even when the primary field has duplicate values.
//!
//! The same comparator serves as the store-level sort instruction and as
//! an in-memory comparator for already-materialized lists.

use std::cmp::Ordering;

use crate::{Bill, Group, Member};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Ascending,
    Descending,
}

impl OrderType {
    /// Applies the direction to a primary-key comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            OrderType::Ascending => ordering,
            OrderType::Descending => ordering.reverse(),
        }
    }
}

/// Order selection for group lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    Name(OrderType),
}

impl GroupOrder {
    /// Compares two groups under this selection.
    pub fn compare(&self, a: &Group, b: &Group) -> Ordering {
        let primary = match self {
            GroupOrder::Name(direction) => direction.apply(a.name.cmp(&b.name)),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl Default for GroupOrder {
    fn default() -> Self {
        GroupOrder::Name(OrderType::Ascending)
    }
}

/// Order selection for bill lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillOrder {
    Name(OrderType),
    Date(OrderType),
    Amount(OrderType),
}

impl BillOrder {
    /// Compares two bills under this selection.
    ///
    /// Optional fields (`date`, `amount`) order absent values first.
    pub fn compare(&self, a: &Bill, b: &Bill) -> Ordering {
        let primary = match self {
            BillOrder::Name(direction) => direction.apply(a.name.cmp(&b.name)),
            BillOrder::Date(direction) => direction.apply(a.date.cmp(&b.date)),
            BillOrder::Amount(direction) => direction.apply(a.amount.cmp(&b.amount)),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl Default for BillOrder {
    fn default() -> Self {
        BillOrder::Date(OrderType::Descending)
    }
}

/// Order selection for member lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberOrder {
    Name(OrderType),
}

impl MemberOrder {
    /// Compares two members under this selection.
    pub fn compare(&self, a: &Member, b: &Member) -> Ordering {
        let primary = match self {
            MemberOrder::Name(direction) => direction.apply(a.name.cmp(&b.name)),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl Default for MemberOrder {
    fn default() -> Self {
        MemberOrder::Name(OrderType::Ascending)
    }
}
