//! [`Record`] read model definitions.

use derive_more::{Deref, Display, From, Into};

#[cfg(doc)]
use crate::domain::{Key, Record};
use crate::domain::{Entity, Value};

/// Lookup of the [`Record`] holding a unique [`Value`].
///
/// Resolves into the [`Key`] of such [`Record`], if any.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Unique {
    /// [`Entity`] to look the [`Value`] up in.
    pub entity: Entity,

    /// Column declared unique.
    pub column: &'static str,

    /// [`Value`] to look up.
    pub value: Value,
}

/// Lookup of [`Record`]s referencing the provided ID in their column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Referencing {
    /// Referencing [`Entity`].
    pub entity: Entity,

    /// Referencing column of the [`Entity`].
    pub column: &'static str,

    /// Referenced ID.
    pub id: i32,
}

/// Number of [`Record`]s.
#[derive(
    Clone, Copy, Debug, Default, Deref, Display, Eq, From, Hash, Into,
    PartialEq,
)]
pub struct Count(u64);
