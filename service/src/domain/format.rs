//! Single-value formats validated out of raw user input.
//!
//! Every type here is created from an already trimmed string and rejects it
//! with a human-readable reason.

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display, Into};
use regex::Regex;

/// Maximum number of characters in a [`Text`].
pub const MAX_TEXT_LEN: usize = 255;

/// Identifier of a stored record.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct Id(i32);

impl Id {
    /// Creates a new [`Id`] if the given `id` is positive.
    #[must_use]
    pub fn new(id: i32) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }
}

impl FromStr for Id {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i32>()
            .ok()
            .and_then(Self::new)
            .ok_or("must be a positive whole number")
    }
}

/// Free-form text, like a name or an address.
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
pub struct Text(String);

impl Text {
    /// Creates a new [`Text`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Text`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        text.trim() == text
            && !text.is_empty()
            && text.chars().count() <= MAX_TEXT_LEN
    }
}

impl FromStr for Text {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("must be non-empty and at most 255 characters long")
    }
}

/// US zip code, either 5-digit or ZIP+4.
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
pub struct ZipCode(String);

impl ZipCode {
    /// Creates a new [`ZipCode`] if the given `code` is valid.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        Self::check(&code).then_some(Self(code))
    }

    /// Checks whether the given `code` is a valid [`ZipCode`].
    fn check(code: impl AsRef<str>) -> bool {
        /// Regular expression checking [`ZipCode`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("valid regex")
        });

        REGEX.is_match(code.as_ref())
    }
}

impl FromStr for ZipCode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("must be 5 digits, optionally followed by -4 digits")
    }
}

/// Email address.
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(concat!(
                r"^[A-Za-z0-9._%+-]+@",
                r"[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$",
            ))
            .expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= MAX_TEXT_LEN && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("must look like name@example.com")
    }
}

/// US phone number of 10 digits.
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format:
        /// - optional parentheses around the area code;
        /// - optional `-`, `.` or space between the digit groups.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^(\([0-9]{3}\)|[0-9]{3})[-. ]?[0-9]{3}[-. ]?[0-9]{4}$")
                .expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("must be a 10-digit US number, like 555-123-4567")
    }
}

/// Calendar year, like the one a building was built in.
#[derive(Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd)]
pub struct Year(i32);

impl Year {
    /// Earliest accepted [`Year`].
    pub const MIN: i32 = 1600;

    /// Latest accepted [`Year`].
    pub const MAX: i32 = 9999;

    /// Creates a new [`Year`] if the given `year` is in the accepted range.
    #[must_use]
    pub fn new(year: i32) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&year).then_some(Self(year))
    }
}

impl FromStr for Year {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i32>()
            .ok()
            .filter(|_| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(Self::new)
            .ok_or("must be a 4-digit year from 1600")
    }
}

/// Area in square feet.
#[derive(Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd)]
pub struct Area(i32);

impl Area {
    /// Creates a new [`Area`] if the given `square_feet` is positive.
    #[must_use]
    pub fn new(square_feet: i32) -> Option<Self> {
        (square_feet > 0).then_some(Self(square_feet))
    }
}

impl FromStr for Area {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i32>()
            .ok()
            .and_then(Self::new)
            .ok_or("must be a positive whole number of square feet")
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use proptest::prelude::*;

    use super::{Area, Email, Id, Phone, Text, Year, ZipCode};

    #[test]
    fn zip_code() {
        for valid in ["62704", "62704-1234", "00000"] {
            assert_eq!(
                AsRef::<str>::as_ref(&ZipCode::from_str(valid).unwrap()),
                valid,
            );
        }
        for invalid in ["6270", "627045", "62704-123", "62704 1234", "ABCDE"] {
            assert!(ZipCode::from_str(invalid).is_err(), "{invalid}");
        }
    }

    #[test]
    fn email() {
        for valid in ["jane@example.com", "j.doe+rent@mail.example.co"] {
            assert!(Email::from_str(valid).is_ok(), "{valid}");
        }
        for invalid in
            ["jane", "jane@", "@example.com", "jane@example", "a b@c.de"]
        {
            assert!(Email::from_str(invalid).is_err(), "{invalid}");
        }
    }

    #[test]
    fn phone() {
        for valid in
            ["5551234567", "555-123-4567", "(555) 123-4567", "555.123.4567"]
        {
            assert!(Phone::from_str(valid).is_ok(), "{valid}");
        }
        for invalid in ["555-1234", "+1 555 123 4567", "555-123-45678", "phone"]
        {
            assert!(Phone::from_str(invalid).is_err(), "{invalid}");
        }
    }

    #[test]
    fn numbers() {
        assert_eq!(i32::from(Id::from_str("42").unwrap()), 42);
        assert!(Id::from_str("0").is_err());
        assert!(Id::from_str("-3").is_err());
        assert!(Id::from_str("4.2").is_err());

        assert_eq!(i32::from(Year::from_str("1987").unwrap()), 1987);
        assert!(Year::from_str("987").is_err());
        assert!(Year::from_str("1500").is_err());
        assert!(Year::from_str("+987").is_err());

        assert_eq!(i32::from(Area::from_str("1200").unwrap()), 1200);
        assert!(Area::from_str("0").is_err());
    }

    #[test]
    fn text() {
        assert!(Text::from_str("1 Main St").is_ok());
        assert!(Text::from_str("").is_err());
        assert!(Text::from_str(&"x".repeat(256)).is_err());
    }

    proptest! {
        #[test]
        fn accepts_every_zip_shaped_input(
            zip in "[0-9]{5}(-[0-9]{4})?",
        ) {
            let code = ZipCode::from_str(&zip).unwrap();
            prop_assert_eq!(AsRef::<str>::as_ref(&code), zip.as_str());
        }

        #[test]
        fn rejects_every_other_input(input in ".*") {
            let bytes = input.as_bytes();
            let digits = |r: std::ops::Range<usize>| {
                bytes[r].iter().all(u8::is_ascii_digit)
            };
            let zip_shaped = (bytes.len() == 5 && digits(0..5))
                || (bytes.len() == 10
                    && digits(0..5)
                    && bytes[5] == b'-'
                    && digits(6..10));

            prop_assert_eq!(ZipCode::from_str(&input).is_ok(), zip_shaped);
        }
    }
}
