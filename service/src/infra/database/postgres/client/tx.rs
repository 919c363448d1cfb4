//! [`Tx`] client definitions.

use std::sync::Arc;

use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tracerr::Traced;
use tracing as log;

use crate::infra::database::{self, postgres::connection};

use super::{delegate_connection, non_tx, NonTx};

/// Transactional Postgres database client.
///
/// The transaction begins on the first statement, reusing the connection of
/// the [`NonTx`] client it was started from, if any. It's rolled back once
/// the last clone of this client is dropped without [`Tx::commit()`]ting.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`NonTx`] client this [`Tx`] was started from.
    origin: NonTx,

    /// Transaction begun in the [`Connection`], if any.
    ///
    /// [`Connection`]: super::super::Connection
    tx: Arc<Mutex<Option<connection::Tx>>>,
}

impl Tx {
    /// Creates a new [`Tx`] client from the provided [`NonTx`] client.
    #[must_use]
    pub fn from_non_tx(origin: NonTx) -> Self {
        Self {
            origin,
            tx: Arc::default(),
        }
    }

    /// Returns the [`connection::Tx`] of this client, beginning it first if
    /// necessary.
    async fn connection(
        &self,
    ) -> Result<MappedMutexGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        let mut tx = self.tx.lock().await;
        if tx.is_none() {
            let reused = self.origin.take().await.filter(|c| !c.is_closed());
            let conn = match reused {
                Some(conn) => conn,
                None => non_tx::acquire(&self.origin.pool)
                    .await
                    .map_err(tracerr::wrap!())?,
            };
            *tx = Some(
                connection::Tx::from_non_tx(conn)
                    .await
                    .map_err(tracerr::wrap!())?,
            );
            log::debug!("transaction begun");
        }
        Ok(MutexGuard::map(tx, |tx| tx.as_mut().expect("begun above")))
    }

    /// Commits this [`Tx`] client.
    ///
    /// Does nothing if no statement has been executed.
    ///
    /// # Errors
    ///
    /// If failed to commit transaction of this [`Tx`] client.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Some(tx) = self.tx.lock().await.take() else {
            return Ok(());
        };
        tx.commit().await.map_err(tracerr::wrap!())?;
        log::debug!("transaction committed");
        Ok(())
    }
}

delegate_connection!(Tx);
