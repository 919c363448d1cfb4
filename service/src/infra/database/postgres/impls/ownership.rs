//! Property ownership [`Database`] implementations.

use common::operations::{By, Select};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::ownership,
};

impl<C> Database<Select<By<ownership::Total, ownership::Of>>> for Postgres<C>
where
    C: Connection,
{
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

        const SQL: &str = "\
            SELECT COALESCE(SUM(ownership_percentage), 0)::NUMERIC AS total \
            FROM property_owners \
            WHERE property_id = $1::INT4 \
              AND ($2::INT4 IS NULL OR owner_id <> $2::INT4)";
        let row = self
            .query_opt(SQL, &[&property_id, &excluding_owner_id])
            .await
            .map_err(tracerr::wrap!())?;
        Ok(row
            .map(|row| row.get::<_, Decimal>("total"))
            .unwrap_or_default()
            .into())
    }
}
