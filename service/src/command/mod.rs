//! [`Command`] definition.

pub mod create_record;
pub mod delete_record;
mod integrity;
pub mod update_record;

use std::future::Future;

use derive_more::{Display, Error, From};
use rust_decimal::Decimal;

use crate::{
    domain::{Entity, Key, ValidationError, Value},
    infra::database,
};
#[cfg(doc)]
use crate::infra::Database;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_record::CreateRecord, delete_record::DeleteRecord,
    update_record::UpdateRecord,
};

/// Confirmation of a destructive [`Command`] by its initiator.
pub trait Confirm<T> {
    /// Asks whether the action described by the provided `subject` should be
    /// performed.
    fn confirm(&mut self, subject: &T) -> impl Future<Output = bool>;
}

impl<T> Confirm<T> for bool {
    async fn confirm(&mut self, _: &T) -> bool {
        *self
    }
}

/// Error of a record [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided input is invalid.
    #[display("{_0}")]
    #[from]
    Validation(ValidationError),

    /// Record with the provided [`Key`] does not exist.
    #[display("`{_0}` does not exist")]
    NotFound(#[error(not(source))] Key),

    /// Record would duplicate an existing one.
    #[display("{_0}")]
    #[from]
    DuplicateKey(Duplicate),

    /// Record would break a cross-record rule.
    #[display("{_0}")]
    #[from]
    Integrity(IntegrityError),

    /// Storage refused to delete the record with the provided [`Key`], as
    /// it's still referenced.
    #[display("`{_0}` is still referenced and cannot be deleted")]
    Constraint(#[error(not(source))] Key),
}

/// Duplication of an existing record.
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum Duplicate {
    /// Record with the same [`Key`] already exists.
    #[display("`{_0}` already exists")]
    Key(#[error(not(source))] Key),

    /// Record with the same value of a unique column already exists.
    #[display("`{entity}` with {column} `{value}` already exists")]
    Value {
        /// [`Entity`] of the existing record.
        entity: Entity,

        /// Unique column.
        column: &'static str,

        /// Duplicated value.
        value: Value,
    },
}

/// Violation of a cross-record rule.
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum IntegrityError {
    /// Referenced record does not exist.
    #[display("referenced `{_0}` does not exist")]
    MissingReference(#[error(not(source))] Key),

    /// Total ownership of a property would exceed 100%.
    #[display(
        "total ownership of `Property(property_id: {property_id})` would \
         exceed 100% ({total}%)"
    )]
    OwnershipExceeded {
        /// ID of the property.
        property_id: i32,

        /// Total ownership the write would result in.
        total: Decimal,
    },
}
