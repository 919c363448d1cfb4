//! Calendar date utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{format_description::FormatItem, macros::format_description};

/// Format of a [`Date`] in its textual `YYYY-MM-DD` representation.
const FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Calendar date without time and offset.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Returns the current [`Date`] in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self(time::OffsetDateTime::now_utc().date())
    }

    /// Creates a new [`Date`] out of the provided calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Checks whether the provided `input` has the `YYYY-MM-DD` shape.
    ///
    /// Only the shape is checked here, the calendar validity is checked by
    /// [`Date::from_str()`].
    #[must_use]
    pub fn has_shape(input: &str) -> bool {
        let bytes = input.as_bytes();
        bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            })
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.format(FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::has_shape(s) {
            return Err(ParseError::Format);
        }
        time::Date::parse(s, FORMAT)
            .map(Self)
            .map_err(|_| ParseError::Calendar)
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

/// Error of parsing a [`Date`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ParseError {
    /// Input doesn't match the `YYYY-MM-DD` pattern.
    #[display("must be in YYYY-MM-DD format")]
    Format,

    /// Input matches the pattern, but is not an existing calendar date.
    #[display("is not a valid calendar date")]
    Calendar,
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Date {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::Date::from_sql(ty, raw).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Date {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, w)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::{Date, ParseError};

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            Date::from_str("2025-06-01").unwrap(),
            Date::from_ymd(2025, 6, 1).unwrap(),
        );
        assert_eq!(
            Date::from_str("2024-02-29").unwrap(),
            Date::from_ymd(2024, 2, 29).unwrap(),
        );
    }

    #[test]
    fn rejects_malformed_input() {
        for input in [
            "2025-6-01",
            "2025/06/01",
            "25-06-01",
            "2025-06-01 ",
            "",
            "２０２５-06-01",
        ] {
            assert_eq!(
                Date::from_str(input),
                Err(ParseError::Format),
                "{input}",
            );
        }
    }

    /// The `YYYY-MM-DD` pattern alone would accept these, but they are not
    /// calendar dates and are rejected deliberately.
    #[test]
    fn rejects_out_of_range_calendar_components() {
        for input in ["2025-13-40", "2025-00-10", "2025-02-30", "2023-02-29"] {
            assert!(Date::has_shape(input), "{input}");
            assert_eq!(
                Date::from_str(input),
                Err(ParseError::Calendar),
                "{input}",
            );
        }
    }

    #[test]
    fn displays_as_iso() {
        let date = Date::from_ymd(2025, 1, 9).unwrap();

        assert_eq!(date.to_string(), "2025-01-09");
        assert!(date < Date::from_ymd(2025, 1, 10).unwrap());
    }
}
