//! In-memory [`Database`] implementation for tests.
//!
//! Follows the storage rules of the Postgres schema: deleting a row deletes
//! the rows referencing it through a required column, and unassigns the ones
//! referencing it through an optional column.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

use common::operations::{By, Commit, Delete, Insert, Select, Transact, Update};
use derive_more::{Display, Error as StdError};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{
        property_owner, Changes, Effect, Entity, Key, Record, Role, Value,
    },
    infra::{database, Database},
    read::{self, ownership},
};

/// Rows of every [`Entity`] ordered by their [`Key`] parts.
pub type Tables = BTreeMap<Entity, BTreeMap<Vec<i32>, Record>>;

/// In-memory [`Database`].
///
/// A [`Transact`]ed [`Memory`] works on a copy of the [`Tables`], which
/// replaces the original ones on [`Commit`].
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Committed [`Tables`].
    committed: Rc<RefCell<Tables>>,

    /// [`Tables`] staged by a transaction, if any.
    staged: Option<Rc<RefCell<Tables>>>,

    /// Number of executed write operations.
    writes: Rc<Cell<usize>>,

    /// [`Error`]s every write into an [`Entity`] fails with, as if a storage
    /// rule rejected it.
    refusals: BTreeMap<Entity, Error>,
}

impl Memory {
    /// Creates a new [`Memory`] holding the provided [`Record`]s.
    ///
    /// # Panics
    ///
    /// If any of the [`Record`]s has no [`Key`].
    #[must_use]
    pub fn with(records: impl IntoIterator<Item = Record>) -> Self {
        let mut tables = Tables::new();
        for record in records {
            let key = record.key().expect("seeded `Record` has no `Key`");
            drop(
                tables
                    .entry(key.entity())
                    .or_default()
                    .insert(key.parts().to_vec(), record),
            );
        }
        Self {
            committed: Rc::new(RefCell::new(tables)),
            ..Self::default()
        }
    }

    /// Makes every following write into the provided [`Entity`] fail with the
    /// provided [`Error`].
    #[must_use]
    pub fn refusing(mut self, entity: Entity, error: Error) -> Self {
        drop(self.refusals.insert(entity, error));
        self
    }

    /// Returns a copy of the committed [`Tables`].
    #[must_use]
    pub fn snapshot(&self) -> Tables {
        self.committed.borrow().clone()
    }

    /// Returns the number of executed write operations, committed or not.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Returns the [`Tables`] this [`Memory`] works on.
    fn tables(&self) -> &RefCell<Tables> {
        self.staged.as_deref().unwrap_or(&self.committed)
    }

    /// Counts a write operation into the provided [`Entity`], failing if
    /// it's refused.
    fn write(&self, entity: Entity) -> Result<(), Traced<database::Error>> {
        self.writes.set(self.writes.get() + 1);
        match self.refusals.get(&entity) {
            Some(e) => Err(tracerr::new!(database::Error::from(*e))),
            None => Ok(()),
        }
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Row with the same key already exists.
    #[display("duplicate key")]
    UniqueViolation,

    /// Row is still referenced, or references a missing one.
    #[display("foreign key violation")]
    ForeignKeyViolation,
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        if self.staged.is_some() {
            return Ok(self.clone());
        }
        Ok(Self {
            staged: Some(Rc::new(RefCell::new(self.snapshot()))),
            ..self.clone()
        })
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        if let Some(staged) = &self.staged {
            *self.committed.borrow_mut() = staged.borrow().clone();
        }
        Ok(())
    }
}

impl Database<Select<By<Option<Record>, Key>>> for Memory {
    type Ok = Option<Record>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Record>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        Ok(self
            .tables()
            .borrow()
            .get(&key.entity())
            .and_then(|rows| rows.get(key.parts()))
            .cloned())
    }
}

impl Database<Select<By<Vec<Record>, Entity>>> for Memory {
    type Ok = Vec<Record>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Record>, Entity>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .tables()
            .borrow()
            .get(&by.into_inner())
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }
}

impl Database<Select<By<Option<Key>, read::Unique>>> for Memory {
    type Ok = Option<Key>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Key>, read::Unique>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::Unique {
            entity,
            column,
            value,
        } = by.into_inner();
        Ok(self.tables().borrow().get(&entity).and_then(|rows| {
            rows.values()
                .find(|r| r.get(column) == Some(&value))
                .and_then(Record::key)
        }))
    }
}

impl Database<Select<By<read::Count, read::Referencing>>> for Memory {
    type Ok = read::Count;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::Count, read::Referencing>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::Referencing { entity, column, id } = by.into_inner();
        let count = self.tables().borrow().get(&entity).map_or(0, |rows| {
            rows.values()
                .filter(|r| r.get(column) == Some(&Value::Int(id)))
                .count()
        });
        Ok(u64::try_from(count).unwrap_or_default().into())
    }
}

impl Database<Select<By<ownership::Total, ownership::Of>>> for Memory {
    type Ok = ownership::Total;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<ownership::Total, ownership::Of>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ownership::Of {
            property_id,
            excluding_owner_id,
        } = by.into_inner();
        let total = self
            .tables()
            .borrow()
            .get(&Entity::PropertyOwner)
            .map(|rows| {
                rows.values()
                    .filter(|r| {
                        r.get(property_owner::PROPERTY)
                            == Some(&Value::Int(property_id))
                    })
                    .filter(|r| {
                        excluding_owner_id.is_none_or(|id| {
                            r.get(property_owner::OWNER)
                                != Some(&Value::Int(id))
                        })
                    })
                    .filter_map(|r| r.get(property_owner::SHARE))
                    .filter_map(Value::as_decimal)
                    .sum::<Decimal>()
            })
            .unwrap_or_default();
        Ok(total.into())
    }
}

impl Database<Insert<Record>> for Memory {
    type Ok = Key;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut record): Insert<Record>,
    ) -> Result<Self::Ok, Self::Err> {
        let entity = record.entity();
        self.write(entity)?;
        let mut tables = self.tables().borrow_mut();
        let rows = tables.entry(entity).or_default();

        if let Some(field) = entity
            .schema()
            .fields
            .iter()
            .find(|f| f.role == Role::GeneratedKey)
        {
            let next = rows
                .keys()
                .filter_map(|k| k.first())
                .max()
                .map_or(1, |id| id + 1);
            record.set(field.column, Value::Int(next));
        }
        let Some(key) = record.key() else {
            return Err(tracerr::new!(database::Error::from(
                Error::UniqueViolation,
            )));
        };
        if rows.contains_key(key.parts()) {
            return Err(tracerr::new!(database::Error::from(
                Error::UniqueViolation,
            )));
        }
        drop(rows.insert(key.parts().to_vec(), record));
        Ok(key)
    }
}

impl Database<Update<Changes>> for Memory {
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(changes): Update<Changes>,
    ) -> Result<Self::Ok, Self::Err> {
        let Changes { key, values } = changes;
        self.write(key.entity())?;
        let mut tables = self.tables().borrow_mut();
        let Some(row) = tables
            .get_mut(&key.entity())
            .and_then(|rows| rows.get_mut(key.parts()))
        else {
            return Ok(0);
        };
        for (field, value) in values {
            row.set(field.column, value);
        }
        Ok(1)
    }
}

impl Database<Delete<Key>> for Memory {
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(key): Delete<Key>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(key.entity())?;
        Ok(remove(&mut self.tables().borrow_mut(), &key))
    }
}

/// Removes the row with the provided [`Key`] from the [`Tables`], applying
/// the deletion [`Effect`] to its dependents.
fn remove(tables: &mut Tables, key: &Key) -> u64 {
    let removed = tables
        .get_mut(&key.entity())
        .and_then(|rows| rows.remove(key.parts()));
    if removed.is_none() {
        return 0;
    }
    let [id] = key.parts() else {
        return 1;
    };

    for dependent in key.entity().schema().dependents {
        let referencing = tables
            .get(&dependent.entity)
            .map(|rows| {
                rows.values()
                    .filter(|r| {
                        r.get(dependent.column) == Some(&Value::Int(*id))
                    })
                    .filter_map(Record::key)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        for referencing in referencing {
            match dependent.effect() {
                Effect::Cascade => drop(remove(tables, &referencing)),
                Effect::Detach => {
                    if let Some(row) = tables
                        .get_mut(&dependent.entity)
                        .and_then(|rows| rows.get_mut(referencing.parts()))
                    {
                        row.set(dependent.column, Value::Null);
                    }
                }
            }
        }
    }
    1
}
