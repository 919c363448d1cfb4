//! [`Database`]-related implementations.

#[cfg(test)]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

#[cfg(test)]
pub use self::memory::Memory;
#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),

    #[cfg(test)]
    /// [`Memory`] error.
    Memory(memory::Error),
}

impl Error {
    /// Checks whether this [`Error`] is a rejection of a write referencing a
    /// missing row, or removing a still referenced one.
    #[must_use]
    pub fn is_foreign_key_violation(&self) -> bool {
        match *self {
            #[cfg(feature = "postgres")]
            Self::Postgres(ref e) => e.is_foreign_key_violation(),
            #[cfg(test)]
            Self::Memory(e) => e == memory::Error::ForeignKeyViolation,
        }
    }

    /// Checks whether this [`Error`] is a rejection of a write duplicating a
    /// unique value.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match *self {
            #[cfg(feature = "postgres")]
            Self::Postgres(ref e) => e.is_unique_violation(None),
            #[cfg(test)]
            Self::Memory(e) => e == memory::Error::UniqueViolation,
        }
    }
}
