//! Cross-record checks shared by the record [`Command`]s.
//!
//! [`Command`]: super::Command

use common::operations::{By, Select};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{property_owner, Entity, Field, Key, Record, Value},
    infra::{database, Database},
    read::{self, ownership},
};

use super::{Duplicate, ExecutionError, IntegrityError};

/// Ensures every record referenced by the provided [`Field`]s exists.
pub(super) async fn references<'v, Db>(
    db: &Db,
    values: impl IntoIterator<Item = (&'static Field, &'v Value)>,
) -> Result<(), Traced<ExecutionError>>
where
    Db: Database<
        Select<By<Option<Record>, Key>>,
        Ok = Option<Record>,
        Err = Traced<database::Error>,
    >,
{
    use ExecutionError as E;

    for (field, value) in values {
        let (Some(entity), Some(id)) = (field.references, value.as_int())
        else {
            continue;
        };
        let key = Key::new(entity, [id]);
        if db
            .execute(Select(By::<Option<Record>, _>::new(key.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_none()
        {
            return Err(tracerr::new!(E::Integrity(
                IntegrityError::MissingReference(key)
            )));
        }
    }
    Ok(())
}

/// Ensures no record other than the `excluded` one holds any of the unique
/// `columns` values of the provided [`Record`].
pub(super) async fn unique<'c, Db>(
    db: &Db,
    record: &Record,
    columns: impl IntoIterator<Item = &'c str>,
    excluded: Option<&Key>,
) -> Result<(), Traced<ExecutionError>>
where
    Db: Database<
        Select<By<Option<Key>, read::Unique>>,
        Ok = Option<Key>,
        Err = Traced<database::Error>,
    >,
{
    use ExecutionError as E;

    let entity = record.entity();
    for column in columns {
        let Some(column) = record
            .schema()
            .unique
            .iter()
            .copied()
            .find(|c| *c == column)
        else {
            continue;
        };
        let Some(value) = record.get(column).filter(|v| !v.is_null()) else {
            continue;
        };
        let existing = db
            .execute(Select(By::<Option<Key>, _>::new(read::Unique {
                entity,
                column,
                value: value.clone(),
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some_and(|k| Some(&k) != excluded) {
            return Err(tracerr::new!(E::DuplicateKey(Duplicate::Value {
                entity,
                column,
                value: value.clone(),
            })));
        }
    }
    Ok(())
}

/// Ensures the ownership share held by the provided [`Entity::PropertyOwner`]
/// [`Record`] doesn't make the total ownership of its property exceed 100%.
///
/// The current share of the same owner is not counted, so the check holds
/// for updates too.
pub(super) async fn ownership<Db>(
    db: &Db,
    record: &Record,
) -> Result<(), Traced<ExecutionError>>
where
    Db: Database<
        Select<By<ownership::Total, ownership::Of>>,
        Ok = ownership::Total,
        Err = Traced<database::Error>,
    >,
{
    use ExecutionError as E;

    if record.entity() != Entity::PropertyOwner {
        return Ok(());
    }
    let id = |column: &str| record.get(column).and_then(Value::as_int);
    let (Some(property_id), Some(share)) = (
        id(property_owner::PROPERTY),
        record.get(property_owner::SHARE).and_then(Value::as_decimal),
    ) else {
        return Ok(());
    };

    let others = db
        .execute(Select(By::<ownership::Total, _>::new(ownership::Of {
            property_id,
            excluding_owner_id: id(property_owner::OWNER),
        })))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;
    let total = *others + share;
    if total > Decimal::ONE_HUNDRED {
        return Err(tracerr::new!(E::Integrity(
            IntegrityError::OwnershipExceeded { property_id, total }
        )));
    }
    Ok(())
}
