//! [`Handler`] abstraction.

use std::future::Future;

/// Asynchronous handler of `Args`.
///
/// The same trait describes every layer: commands and queries of a service
/// handle their requests, while a database handles operations like
/// [`Select`] or [`Insert`]. A type handles as many `Args` as it has
/// implementations, each with its own result.
///
/// [`Insert`]: crate::operations::Insert
/// [`Select`]: crate::operations::Select
pub trait Handler<Args = ()> {
    /// Result of a successful handling.
    type Ok;

    /// Error of a failed handling.
    type Err;

    /// Handles the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
