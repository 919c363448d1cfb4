//! Postgres [`Database`] implementation.

pub mod client;
pub mod connection;
mod impls;

use std::{num::NonZeroU32, time::Duration};

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio::time;
use tokio_postgres::{error::SqlState, NoTls};
use tracerr::Traced;
use tracing as log;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
};

pub use deadpool_postgres::{Config, PoolConfig};

/// Postgres [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Creates a new [`Postgres`] client with the provided [`Config`].
    ///
    /// No connection is established until the client is used.
    ///
    /// # Errors
    ///
    /// If failed to create a new [`Postgres`] client.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(NonTx::from_pool(pool)))
    }

    /// Creates a new [`Postgres`] client with the provided [`Config`] and
    /// ensures it's able to establish a connection, making up to the
    /// [`Retry::attempts`].
    ///
    /// # Errors
    ///
    /// If failed to create a new [`Postgres`] client, or no connection could
    /// be established within the [`Retry::attempts`].
    pub async fn connect(
        conf: &Config,
        retry: Retry,
    ) -> Result<Self, Traced<database::Error>> {
        let this = Self::new(conf).map_err(tracerr::wrap!())?;

        let attempts = retry.attempts.get();
        let mut attempt = 1;
        loop {
            match this.0.pool.get().await {
                Ok(conn) => {
                    drop(conn);
                    log::info!(
                        "connected to database on attempt {attempt} of \
                         {attempts}",
                    );
                    return Ok(this);
                }
                Err(e) if attempt < attempts => {
                    log::warn!(
                        "connection attempt {attempt} of {attempts} failed: \
                         {e}, retrying in {:?}",
                        retry.delay,
                    );
                    time::sleep(retry.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    log::error!(
                        "failed to connect to database after {attempts} \
                         attempts: {e}",
                    );
                    return Err(tracerr::new!(Error::from(e)))
                        .map_err(tracerr::map_from);
                }
            }
        }
    }
}

/// Policy of establishing a [`Postgres`] connection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Retry {
    /// Maximum number of connection attempts.
    pub attempts: NonZeroU32,

    /// Delay between two consecutive attempts.
    pub delay: Duration,
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// [`Connection`] error.
    #[display("`Connection` error: {_0}")]
    Connection(connection::Error),

    /// Error of creating a new [`connection::Pool`] client.
    #[display("Failed to create a new `connection::Pool`: {_0}")]
    PoolCreationError(connection::PoolCreationError),

    /// [`connection::Pool`] error.
    #[display("`connection::Pool` error: {_0}")]
    PoolError(connection::PoolError),
}

impl Error {
    /// Checks if the error is a unique violation of the specified constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        self.is_violation(&SqlState::UNIQUE_VIOLATION, constraint)
    }

    /// Checks if the error is a foreign key violation of any constraint.
    #[must_use]
    pub fn is_foreign_key_violation(&self) -> bool {
        self.is_violation(&SqlState::FOREIGN_KEY_VIOLATION, None)
    }

    /// Checks if the error is a violation of the specified constraint with
    /// the provided [`SqlState`].
    fn is_violation(&self, state: &SqlState, constraint: Option<&str>) -> bool {
        match self {
            Self::Connection(e) => {
                e.code() == Some(state)
                    && constraint.map_or(true, |c| {
                        e.as_db_error().and_then(|e| e.constraint()) == Some(c)
                    })
            }
            Self::PoolError(..) | Self::PoolCreationError(..) => false,
        }
    }
}
