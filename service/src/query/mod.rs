//! [`Query`] definition.

pub mod records;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] reading stored data straight from a [`Database`], without any
/// checks on top.
///
/// Reads are never part of a transaction, so every execution observes the
/// latest committed state.
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct DatabaseQuery<S>(S);

impl<W, B> DatabaseQuery<By<W, B>> {
    /// Creates a new [`DatabaseQuery`] reading a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Db, W, B> Query<DatabaseQuery<By<W, B>>> for Service<Db>
where
    Db: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
{
    type Ok = W;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        query: DatabaseQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        let DatabaseQuery(selector) = query;
        self.database()
            .execute(Select(selector))
            .await
            .map_err(tracerr::wrap!())
    }
}
