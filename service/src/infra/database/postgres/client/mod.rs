//! Postgres database clients.
//!
//! Both clients acquire their [`Connection`] lazily and delegate every
//! statement to it.
//!
//! [`Connection`]: super::Connection

pub mod non_tx;
pub mod tx;

pub use self::{non_tx::NonTx, tx::Tx};

/// Implements [`Connection`] for a client exposing an async `connection()`
/// method, which returns a guard dereferencing to a [`Connection`].
///
/// [`Connection`]: super::Connection
macro_rules! delegate_connection {
    ($client:ty) => {
        impl $crate::infra::database::postgres::Connection for $client {
            async fn query<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ::tokio_postgres::types::ToSql + Sync)],
            ) -> Result<
                Vec<::tokio_postgres::Row>,
                ::tracerr::Traced<$crate::infra::database::Error>,
            >
            where
                T: ::tokio_postgres::ToStatement + Send + Sync + ?Sized,
            {
                let conn =
                    self.connection().await.map_err(::tracerr::wrap!())?;
                $crate::infra::database::postgres::Connection::query(
                    &*conn, stmt, params,
                )
                .await
                .map_err(::tracerr::wrap!())
            }

            async fn query_one<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ::tokio_postgres::types::ToSql + Sync)],
            ) -> Result<
                ::tokio_postgres::Row,
                ::tracerr::Traced<$crate::infra::database::Error>,
            >
            where
                T: ::tokio_postgres::ToStatement + Send + Sync + ?Sized,
            {
                let conn =
                    self.connection().await.map_err(::tracerr::wrap!())?;
                $crate::infra::database::postgres::Connection::query_one(
                    &*conn, stmt, params,
                )
                .await
                .map_err(::tracerr::wrap!())
            }

            async fn query_opt<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ::tokio_postgres::types::ToSql + Sync)],
            ) -> Result<
                Option<::tokio_postgres::Row>,
                ::tracerr::Traced<$crate::infra::database::Error>,
            >
            where
                T: ::tokio_postgres::ToStatement + Send + Sync + ?Sized,
            {
                let conn =
                    self.connection().await.map_err(::tracerr::wrap!())?;
                $crate::infra::database::postgres::Connection::query_opt(
                    &*conn, stmt, params,
                )
                .await
                .map_err(::tracerr::wrap!())
            }

            async fn exec<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ::tokio_postgres::types::ToSql + Sync)],
            ) -> Result<u64, ::tracerr::Traced<$crate::infra::database::Error>>
            where
                T: ::tokio_postgres::ToStatement + Send + Sync + ?Sized,
            {
                let conn =
                    self.connection().await.map_err(::tracerr::wrap!())?;
                $crate::infra::database::postgres::Connection::exec(
                    &*conn, stmt, params,
                )
                .await
                .map_err(::tracerr::wrap!())
            }
        }
    };
}
use delegate_connection;
