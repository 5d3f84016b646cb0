//! Bill entity: a single expense within a group.

use chrono::{DateTime, Utc};
use common::EntityId;
use serde::{Deserialize, Serialize};

use crate::error::ValidationFailure;
use crate::money::Money;
use crate::validate;

/// A single expense belonging to a group.
///
/// `id` is `None` until the store persists the record. `group_id` is a
/// non-owning back-reference to the parent group and must reference an
/// existing group at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub id: Option<EntityId>,
    pub group_id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<DateTime<Utc>>,
}

impl Bill {
    pub const IS_NAME_REQUIRED: bool = true;
    pub const MIN_NAME_LEN: usize = 3;
    pub const MAX_NAME_LEN: usize = 50;

    pub const IS_DESC_REQUIRED: bool = false;
    pub const MIN_DESC_LEN: usize = 3;
    pub const MAX_DESC_LEN: usize = 500;

    pub const IS_AMOUNT_REQUIRED: bool = true;
    pub const MAX_AMOUNT: Money = Money::from_cents(100_000_000);

    pub const IS_DATE_REQUIRED: bool = false;

    /// Creates a new, not-yet-persisted bill in the given group.
    pub fn new(group_id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id: None,
            group_id,
            name: name.into(),
            description: None,
            amount: None,
            date: None,
        }
    }

    /// Validates every field, aggregating all failures.
    ///
    /// This is the authoritative pre-write gate: mutation use cases refuse
    /// to touch the store when it fails.
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        ValidationFailure::from_fields([
            (
                "name",
                validate::check_text(
                    &self.name,
                    Self::IS_NAME_REQUIRED,
                    Self::MIN_NAME_LEN,
                    Self::MAX_NAME_LEN,
                ),
            ),
            (
                "description",
                validate::check_text(
                    self.description.as_deref().unwrap_or(""),
                    Self::IS_DESC_REQUIRED,
                    Self::MIN_DESC_LEN,
                    Self::MAX_DESC_LEN,
                ),
            ),
            (
                "amount",
                validate::check_decimal(self.amount, Self::IS_AMOUNT_REQUIRED, Self::MAX_AMOUNT),
            ),
            (
                "date",
                validate::check_date(self.date, Self::IS_DATE_REQUIRED),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::InvalidInput;

    fn valid_bill() -> Bill {
        Bill {
            id: None,
            group_id: EntityId::new(),
            name: "Dinner".to_string(),
            description: Some("Friday dinner out".to_string()),
            amount: Some(Money::from_cents(4250)),
            date: Some(Utc::now()),
        }
    }

    #[test]
    fn valid_bill_passes() {
        assert!(valid_bill().validate().is_ok());
    }

    #[test]
    fn missing_amount_is_required() {
        let mut bill = valid_bill();
        bill.amount = None;
        let failure = bill.validate().unwrap_err();
        assert_eq!(failure.field("amount"), Some(InvalidInput::Required));
    }

    #[test]
    fn zero_amount_is_out_of_range() {
        let mut bill = valid_bill();
        bill.amount = Some(Money::zero());
        let failure = bill.validate().unwrap_err();
        assert_eq!(
            failure.field("amount"),
            Some(InvalidInput::OutOfRange {
                max: Bill::MAX_AMOUNT
            })
        );
    }

    #[test]
    fn absent_description_and_date_are_fine() {
        let mut bill = valid_bill();
        bill.description = None;
        bill.date = None;
        assert!(bill.validate().is_ok());
    }

    #[test]
    fn multiple_failures_are_aggregated() {
        let bill = Bill::new(EntityId::new(), "");
        let failure = bill.validate().unwrap_err();
        assert_eq!(failure.field("name"), Some(InvalidInput::Required));
        assert_eq!(failure.field("amount"), Some(InvalidInput::Required));
        assert_eq!(failure.errors.len(), 2);
    }

    #[test]
    fn serialization_roundtrip() {
        let bill = valid_bill();
        let json = serde_json::to_string(&bill).unwrap();
        let deserialized: Bill = serde_json::from_str(&json).unwrap();
        assert_eq!(bill, deserialized);
    }
}
