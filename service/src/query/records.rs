//! [`Query`] collection related to [`Record`]s.

use std::vec;

use common::{
    operations::{By, Select},
    pagination::{Paginate as _, Pages},
};
use tracerr::Traced;

use crate::{
    domain::{Entity, Key, Record},
    infra::{database, Database},
    Service,
};

use super::{DatabaseQuery, Query};

/// Queries all the [`Record`]s of an [`Entity`] ordered by their [`Key`]s.
pub type List = DatabaseQuery<By<Vec<Record>, Entity>>;

/// Queries a [`Record`] by its [`Key`].
pub type ById = DatabaseQuery<By<Option<Record>, Key>>;

/// [`Query`] splitting all the [`Record`]s of an [`Entity`] into [`Pages`].
///
/// Every execution selects the [`Record`]s anew.
#[derive(Clone, Copy, Debug)]
pub struct Paged {
    /// [`Entity`] to list the [`Record`]s of.
    pub entity: Entity,

    /// Maximum number of [`Record`]s on a page.
    pub page_size: usize,
}

impl<Db> Query<Paged> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Record>, Entity>>,
        Ok = Vec<Record>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Pages<vec::IntoIter<Record>>;
    type Err = Traced<database::Error>;

    async fn execute(&self, query: Paged) -> Result<Self::Ok, Self::Err> {
        let Paged { entity, page_size } = query;
        self.execute(List::by(entity))
            .await
            .map(|records| records.paginate(page_size))
            .map_err(tracerr::wrap!())
    }
}
