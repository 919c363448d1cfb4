//! [`NonTx`] client definitions.

use std::sync::Arc;

use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tracerr::Traced;
use tracing as log;

use crate::infra::database::{
    self,
    postgres::{self, connection},
};

use super::delegate_connection;

/// Non-transactional Postgres database client.
///
/// Keeps the single pooled connection of an interactive session between
/// operations. A [`Tx`] started from this client borrows that connection and
/// returns it to the pool once finished.
///
/// [`Tx`]: super::Tx
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to acquire connections from.
    pub(crate) pool: connection::Pool,

    /// Connection kept for non-transactional operations, if acquired.
    slot: Arc<Mutex<Option<connection::NonTx>>>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client from the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            slot: Arc::default(),
        }
    }

    /// Returns the cached [`connection::NonTx`], acquiring it from the pool
    /// first if necessary.
    async fn connection(
        &self,
    ) -> Result<
        MappedMutexGuard<'_, connection::NonTx>,
        Traced<database::Error>,
    > {
        let mut slot = self.slot.lock().await;
        if evict_closed(&mut *slot, |conn| conn.is_closed()) {
            log::warn!("`Postgres` connection was closed, reconnecting");
        }
        if slot.is_none() {
            log::debug!("acquiring `Postgres` connection");
            let conn = acquire(&self.pool).await.map_err(tracerr::wrap!())?;
            *slot = Some(conn);
        }
        Ok(MutexGuard::map(slot, |conn| {
            conn.as_mut().expect("acquired above")
        }))
    }

    /// Takes the cached [`connection::NonTx`] out of this client, so the next
    /// operation acquires a new one.
    pub(crate) async fn take(&self) -> Option<connection::NonTx> {
        self.slot.lock().await.take()
    }
}

/// Acquires a new [`connection::NonTx`] from the provided
/// [`connection::Pool`].
pub(crate) async fn acquire(
    pool: &connection::Pool,
) -> Result<connection::NonTx, Traced<database::Error>> {
    pool.get()
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}

/// Drops the cached connection out of the `slot` if it's `closed`, so the
/// next operation acquires a new one instead of failing forever.
///
/// Returns whether the connection has been dropped.
fn evict_closed<C>(
    slot: &mut Option<C>,
    closed: impl FnOnce(&C) -> bool,
) -> bool {
    let evicted = slot.as_ref().is_some_and(closed);
    if evicted {
        *slot = None;
    }
    evicted
}

delegate_connection!(NonTx);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::evict_closed;

    #[test]
    fn evicts_only_closed_connection() {
        let mut closed = Some(true);
        assert!(evict_closed(&mut closed, |c| *c));
        assert_eq!(closed, None);

        let mut open = Some(false);
        assert!(!evict_closed(&mut open, |c| *c));
        assert_eq!(open, Some(false));

        let mut empty = None::<bool>;
        assert!(!evict_closed(&mut empty, |c| *c));
    }
}
