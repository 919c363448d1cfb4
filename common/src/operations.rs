//! Storage operations handled by a database.
//!
//! Every operation wraps its subject, so a single database type handles the
//! same operation for different subjects through separate implementations.

use std::marker::PhantomData;

use crate::Handler;

/// Stores a new `T`.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Overwrites a stored value with the provided `T`.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Removes the stored value identified by `T`.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Reads stored values, usually described by a [`By`] selector.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Begins a transaction.
///
/// Operations executed on the [`Transacted`] handler are only visible to it
/// until they're [`Commit`]ted, and are discarded if they never are.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// Handler of operations inside a [`Transact`]ion begun by `T`.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Makes the operations of a [`Transacted`] handler visible to everyone.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Selector of a `W`, such as a single row or a list of them, by a `B`, such
/// as a key.
///
/// The `W` only picks the implementation, so the same `B` may select
/// different results.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Result type the selector is for.
    what: PhantomData<W>,

    /// Criterion to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] selector out of the provided criterion.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            what: PhantomData,
            by,
        }
    }

    /// Returns the criterion of this [`By`] selector.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
