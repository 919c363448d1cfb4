//! [`Record`]-related [`Database`] implementations.
//!
//! SQL identifiers are taken from the static [`Schema`]s only, while all the
//! values are passed as explicitly cast parameters.

use common::{
    operations::{By, Delete, Insert, Select, Update},
    Date,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        field::SqlType, Changes, Entity, Field, Key, Record, Role, Schema,
        Value,
    },
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
    read,
};

impl<C> Database<Select<By<Option<Record>, Key>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Record>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Record>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        let schema = key.entity().schema();

        let sql = format!(
            "SELECT {} FROM {} WHERE {}",
            columns(schema.fields.iter()),
            schema.table,
            key_filter(schema, 1),
        );
        let params = key.parts().iter().map(param).collect::<Vec<_>>();
        self.query_opt(sql.as_str(), &params)
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| decode(key.entity(), &row))
            .transpose()
    }
}

impl<C> Database<Select<By<Vec<Record>, Entity>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Record>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Record>, Entity>>,
    ) -> Result<Self::Ok, Self::Err> {
        let entity = by.into_inner();
        let schema = entity.schema();

        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            columns(schema.fields.iter()),
            schema.table,
            columns(schema.key_fields()),
        );
        self.query(sql.as_str(), &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| decode(entity, row))
            .collect()
    }
}

impl<C> Database<Select<By<Option<Key>, read::Unique>>> for Postgres<C>
where
    C: Connection,
{
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
        let schema = entity.schema();
        let Some(field) = schema.field(column) else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT {} FROM {} WHERE {} = {} LIMIT 1",
            columns(schema.key_fields()),
            schema.table,
            field.column,
            placeholder(1, field),
        );
        self.query_opt(sql.as_str(), &[&value])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| decode_key(entity, &row))
            .transpose()
    }
}

impl<C> Database<Select<By<read::Count, read::Referencing>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::Count;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::Count, read::Referencing>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::Referencing { entity, column, id } = by.into_inner();
        let schema = entity.schema();
        let Some(field) = schema.field(column) else {
            return Ok(read::Count::default());
        };

        let sql = format!(
            "SELECT COUNT(*) AS count FROM {} WHERE {} = $1::INT4",
            schema.table, field.column,
        );
        let row = self
            .query_opt(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?;
        let count = row.map_or(0, |row| row.get::<_, i64>("count"));
        Ok(u64::try_from(count).unwrap_or_default().into())
    }
}

impl<C> Database<Insert<Record>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Key;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(record): Insert<Record>,
    ) -> Result<Self::Ok, Self::Err> {
        let entity = record.entity();
        let schema = entity.schema();
        let (fields, values): (Vec<_>, Vec<_>) = record
            .fields()
            .filter(|(f, _)| f.role != Role::GeneratedKey)
            .unzip();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            schema.table,
            columns(fields.iter().copied()),
            fields
                .iter()
                .enumerate()
                .map(|(i, f)| placeholder(i + 1, f))
                .join(", "),
            columns(schema.key_fields()),
        );
        let params = values.into_iter().map(param).collect::<Vec<_>>();
        let row = self
            .query_one(sql.as_str(), &params)
            .await
            .map_err(tracerr::wrap!())?;
        decode_key(entity, &row)
    }
}

impl<C> Database<Update<Changes>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(changes): Update<Changes>,
    ) -> Result<Self::Ok, Self::Err> {
        let Changes { key, values } = changes;
        if values.is_empty() {
            return Ok(0);
        }
        let schema = key.entity().schema();

        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            schema.table,
            values
                .iter()
                .enumerate()
                .map(|(i, (f, _))| {
                    format!("{} = {}", f.column, placeholder(i + 1, f))
                })
                .join(", "),
            key_filter(schema, values.len() + 1),
        );
        let params = values
            .iter()
            .map(|(_, v)| param(v))
            .chain(key.parts().iter().map(param))
            .collect::<Vec<_>>();
        self.exec(sql.as_str(), &params)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Delete<Key>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(key): Delete<Key>,
    ) -> Result<Self::Ok, Self::Err> {
        let schema = key.entity().schema();

        let sql = format!(
            "DELETE FROM {} WHERE {}",
            schema.table,
            key_filter(schema, 1),
        );
        let params = key.parts().iter().map(param).collect::<Vec<_>>();
        self.exec(sql.as_str(), &params)
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Erases the type of the provided statement parameter.
fn param<T: ToSql + Sync>(value: &T) -> &(dyn ToSql + Sync) {
    value
}

/// Joins the columns of the provided [`Field`]s.
fn columns<'f>(fields: impl Iterator<Item = &'f Field>) -> String {
    fields.map(|f| f.column).join(", ")
}

/// Returns the explicitly cast `n`th parameter for the provided [`Field`].
fn placeholder(n: usize, field: &Field) -> String {
    format!("${n}::{}", field.format.sql_type().as_str())
}

/// Returns the condition matching the key [`Field`]s of the provided
/// [`Schema`] against parameters, starting from the `first` one.
fn key_filter(schema: &Schema, first: usize) -> String {
    schema
        .key_fields()
        .enumerate()
        .map(|(i, f)| {
            format!("{} = {}", f.column, placeholder(first + i, f))
        })
        .join(" AND ")
}

/// Decodes a [`Record`] of the provided [`Entity`] from a [`Row`] holding
/// all its columns.
fn decode(
    entity: Entity,
    row: &Row,
) -> Result<Record, Traced<database::Error>> {
    entity
        .schema()
        .fields
        .iter()
        .enumerate()
        .map(|(i, f)| {
            Ok(match f.format.sql_type() {
                SqlType::Int4 => {
                    row.try_get::<_, Option<i32>>(i)?.map(Value::Int)
                }
                SqlType::Varchar => {
                    row.try_get::<_, Option<String>>(i)?.map(Value::Text)
                }
                SqlType::Numeric => {
                    row.try_get::<_, Option<Decimal>>(i)?.map(Value::Decimal)
                }
                SqlType::Date => {
                    row.try_get::<_, Option<Date>>(i)?.map(Value::Date)
                }
            }
            .unwrap_or(Value::Null))
        })
        .collect::<Result<Vec<_>, postgres::connection::Error>>()
        .map(|values| Record::new(entity, values))
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}

/// Decodes a [`Key`] of the provided [`Entity`] from a [`Row`] holding its
/// key columns.
fn decode_key(
    entity: Entity,
    row: &Row,
) -> Result<Key, Traced<database::Error>> {
    (0..entity.schema().key_fields().count())
        .map(|i| row.try_get::<_, i32>(i))
        .collect::<Result<Vec<_>, _>>()
        .map(|parts| Key::new(entity, parts))
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}
