//! [`Command`] for deleting an existing [`Record`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use tracerr::Traced;

use crate::{
    domain::{Dependent, Effect, Key, Record},
    infra::{database, Database},
    read::{self, Count},
    Service,
};

use super::{Command, Confirm};

/// Error of [`DeleteRecord`] [`Command`] execution.
pub type ExecutionError = super::ExecutionError;

/// [`Command`] for deleting an existing [`Record`] once its [`Impact`] is
/// confirmed.
#[derive(Clone, Debug)]
pub struct DeleteRecord<C> {
    /// [`Key`] of the [`Record`] to delete.
    pub key: Key,

    /// [`Confirm`]ation of the [`Impact`].
    pub confirm: C,
}

/// Impact of deleting a [`Record`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Impact {
    /// [`Record`] to be deleted.
    pub record: Record,

    /// Numbers of the [`Dependent`] rows referencing the [`Record`].
    pub dependents: Vec<(Dependent, Count)>,
}

impl Impact {
    /// Returns the [`Dependent`]s actually referencing the [`Record`] along
    /// with the [`Effect`] the deletion has on them.
    pub fn affected(
        &self,
    ) -> impl Iterator<Item = (Dependent, Count, Effect)> + '_ {
        self.dependents
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(dep, count)| (*dep, *count, dep.effect()))
    }
}

/// Outcome of a [`DeleteRecord`] [`Command`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// [`Record`] has been deleted with the contained [`Impact`].
    Deleted(Impact),

    /// [`Impact`] has been declined, so nothing has been deleted.
    Declined,
}

impl<Db, C> Command<DeleteRecord<C>> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Record>, Key>>,
            Ok = Option<Record>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Count, read::Referencing>>,
            Ok = Count,
            Err = Traced<database::Error>,
        > + Database<Delete<Key>, Ok = u64, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    C: Confirm<Impact>,
{
    type Ok = Outcome;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteRecord<C>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteRecord { key, mut confirm } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let record = tx
            .execute(Select(By::<Option<Record>, _>::new(key.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::NotFound(key.clone()))
            .map_err(tracerr::wrap!())?;

        let mut dependents = vec![];
        // Composite keys are never referenced.
        if let [id] = *key.parts() {
            for dep in key.entity().schema().dependents {
                let count = tx
                    .execute(Select(By::<Count, _>::new(read::Referencing {
                        entity: dep.entity,
                        column: dep.column,
                        id,
                    })))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
                dependents.push((*dep, count));
            }
        }

        let impact = Impact { record, dependents };
        if !confirm.confirm(&impact).await {
            return Ok(Outcome::Declined);
        }

        let deleted = tx.execute(Delete(key.clone())).await.or_else(|e| {
            if e.as_ref().is_foreign_key_violation() {
                Err(tracerr::new!(E::Constraint(key.clone())))
            } else {
                Err(e).map_err(tracerr::map_from_and_wrap!(=> E))
            }
        })?;
        if deleted != 1 {
            return Err(tracerr::new!(E::NotFound(key)));
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Outcome::Deleted(impact))
    }
}
