//! [`Error`]-related definitions.

use std::{fmt, io};

use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::{command, infra::database};
use tracerr::{Trace, Traced};

/// [`Error`] reported to a user.
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an unexpected failure.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_ERROR",
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Returns the [`Error`] as it's shown to a user, without the backtrace.
    #[must_use]
    pub fn short(&self) -> String {
        format!("[{}]: {}", self.code, self.message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }
}

impl<E: AsError + fmt::Display> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().as_error();
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for command::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::ExecutionError as E;

        let code = match self {
            E::Db(e) => return e.try_as_error(),
            E::Validation(_) => "VALIDATION_ERROR",
            E::NotFound(_) => "NOT_FOUND",
            E::DuplicateKey(_) => "DUPLICATE_KEY",
            E::Integrity(_) => "INTEGRITY_ERROR",
            E::Constraint(_) => "CONSTRAINT_ERROR",
        };
        Some(Error {
            code,
            message: self.to_string(),
            backtrace: None,
        })
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error {
            code: "DATABASE_ERROR",
            message: self.to_string(),
            backtrace: None,
        })
    }
}

impl AsError for io::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use service::{
        command::ExecutionError,
        domain::{Entity, Key, ValidationError},
    };

    use super::AsError as _;

    #[test]
    fn classifies_command_errors() {
        let not_found = ExecutionError::NotFound(Key::new(Entity::Owner, [3]));
        let invalid = ExecutionError::Validation(ValidationError::of(
            "Zip Code",
            "must be 5 digits",
        ));

        assert_eq!(
            not_found.as_error().short(),
            "[NOT_FOUND]: `Owner(owner_id: 3)` does not exist",
        );
        assert_eq!(
            invalid.as_error().short(),
            "[VALIDATION_ERROR]: Zip Code must be 5 digits",
        );
    }

    #[test]
    fn keeps_trace_of_traced_errors() {
        let err = tracerr::new!(ExecutionError::NotFound(Key::new(
            Entity::Tenant,
            [1],
        )));

        let error = err.as_error();

        assert_eq!(error.code, "NOT_FOUND");
        assert!(error.backtrace.is_some());
        assert!(error.to_string().starts_with(&error.short()));
    }
}
