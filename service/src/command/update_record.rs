//! [`Command`] for updating some [`Field`]s of an existing [`Record`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use tracerr::Traced;

use crate::{
    domain::{rules, Changes, Field, Key, Record, Role, ValidationError},
    infra::{database, Database},
    read::{self, ownership},
    Service,
};

use super::{integrity, Command, Confirm};

/// Error of [`UpdateRecord`] [`Command`] execution.
pub type ExecutionError = super::ExecutionError;

/// [`Command`] for updating the selected [`Field`]s of an existing [`Record`].
///
/// Only the selected columns are written, and only once the [`Preview`] of
/// the changes is confirmed.
#[derive(Clone, Debug)]
pub struct UpdateRecord<C> {
    /// [`Key`] of the [`Record`] to update.
    pub key: Key,

    /// Selected [`Field`]s with their raw new values.
    pub changes: Vec<(&'static Field, String)>,

    /// [`Confirm`]ation of the [`Preview`].
    pub confirm: C,
}

/// Preview of an [`UpdateRecord`] [`Command`] to be confirmed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Preview {
    /// [`Record`] as it's stored now.
    pub before: Record,

    /// [`Record`] as it will be stored.
    pub after: Record,

    /// Selected [`Field`]s.
    pub fields: Vec<&'static Field>,
}

impl Preview {
    /// Returns labels of the selected [`Field`]s with their rendered old and
    /// new values.
    #[must_use]
    pub fn diff(&self) -> Vec<(&'static str, String, String)> {
        self.fields
            .iter()
            .map(|f| {
                let render = |r: &Record| {
                    r.get(f.column).map(|v| f.render(v)).unwrap_or_default()
                };
                (f.label, render(&self.before), render(&self.after))
            })
            .collect()
    }
}

/// Outcome of an [`UpdateRecord`] [`Command`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// [`Record`] has been updated to the contained one.
    Updated(Record),

    /// No [`Field`]s were selected, so nothing has been done.
    NothingSelected,

    /// [`Preview`] has been declined, so nothing has been written.
    Declined,
}

impl<Db, C> Command<UpdateRecord<C>> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Record>, Key>>,
            Ok = Option<Record>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Key>, read::Unique>>,
            Ok = Option<Key>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<ownership::Total, ownership::Of>>,
            Ok = ownership::Total,
            Err = Traced<database::Error>,
        > + Database<Update<Changes>, Ok = u64, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    C: Confirm<Preview>,
{
    type Ok = Outcome;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateRecord<C>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRecord {
            key,
            changes,
            mut confirm,
        } = cmd;
        if changes.is_empty() {
            return Ok(Outcome::NothingSelected);
        }

        let schema = key.entity().schema();
        let values = changes
            .into_iter()
            .map(|(field, raw)| {
                let updatable = field.role == Role::Attribute
                    && schema.field(field.column) == Some(field);
                if !updatable {
                    return Err(ValidationError::of(
                        field.label,
                        "is not updatable",
                    ));
                }
                Ok((field, field.parse(&raw)?))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let before = tx
            .execute(Select(By::<Option<Record>, _>::new(key.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::NotFound(key.clone()))
            .map_err(tracerr::wrap!())?;
        let mut after = before.clone();
        for (field, value) in &values {
            after.set(field.column, value.clone());
        }
        rules::check(&after).map_err(tracerr::from_and_wrap!(=> E))?;

        integrity::references(&tx, values.iter().map(|(f, v)| (*f, v)))
            .await
            .map_err(tracerr::wrap!())?;
        let columns = values.iter().map(|(f, _)| f.column);
        integrity::unique(&tx, &after, columns, Some(&key))
            .await
            .map_err(tracerr::wrap!())?;
        integrity::ownership(&tx, &after)
            .await
            .map_err(tracerr::wrap!())?;

        let preview = Preview {
            before,
            after,
            fields: values.iter().map(|(f, _)| *f).collect(),
        };
        if !confirm.confirm(&preview).await {
            return Ok(Outcome::Declined);
        }

        let updated = tx
            .execute(Update(Changes {
                key: key.clone(),
                values,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if updated == 0 {
            return Err(tracerr::new!(E::NotFound(key)));
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Outcome::Updated(preview.after))
    }
}
