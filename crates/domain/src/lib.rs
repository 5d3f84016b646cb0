//! Domain layer for the bill-splitting core.
//!
//! This crate provides the pure, storage-agnostic pieces:
//! - Entities: [`Group`], [`Bill`], [`Member`] with per-field constraint
//!   constants and an aggregating [`Bill::validate`]-style pre-write gate
//! - The validation engine: [`validate::check_text`],
//!   [`validate::check_decimal`], [`validate::check_date`]
//! - The ordering policy: [`GroupOrder`], [`BillOrder`], [`MemberOrder`]
//!   comparators with a deterministic id tie-break
//! - The [`Money`] value object (cents-based, parseable from form input)

pub mod bill;
pub mod error;
pub mod group;
pub mod member;
pub mod money;
pub mod order;
pub mod validate;

pub use bill::Bill;
pub use error::{FieldError, ValidationFailure};
pub use group::Group;
pub use member::Member;
pub use money::Money;
pub use order::{BillOrder, GroupOrder, MemberOrder, OrderType};
pub use validate::InvalidInput;
