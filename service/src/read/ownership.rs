//! Property ownership read model definitions.

use derive_more::{Deref, Display, From, Into};
use rust_decimal::Decimal;

/// Lookup of the ownership shares of a property.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Of {
    /// ID of the property.
    pub property_id: i32,

    /// ID of the owner whose share is left out of the lookup, if any.
    pub excluding_owner_id: Option<i32>,
}

/// Sum of the ownership shares of a property, in percents.
#[derive(
    Clone, Copy, Debug, Default, Deref, Display, Eq, From, Hash, Into,
    PartialEq,
)]
pub struct Total(Decimal);
