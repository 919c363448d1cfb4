//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::{Display, Error};
use rust_decimal::Decimal;

/// Decimal percentage in the `[0, 100]` range.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Percent(Decimal);

impl Percent {
    /// Maximum number of fractional digits of a [`Percent`].
    pub const SCALE: u32 = 2;

    /// Creates a new [`Percent`] by checking the provided value is not less
    /// than `0`, not greater than `100` and has no more than
    /// [`Percent::SCALE`] fractional digits.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        let val = val.normalize();
        (val >= Decimal::ZERO
            && val <= Decimal::ONE_HUNDRED
            && val.scale() <= Self::SCALE)
            .then_some(Self(val))
    }

    /// Returns the value of this [`Percent`].
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Indicates whether adding this [`Percent`] to the provided `total`
    /// keeps the sum within `100`.
    #[must_use]
    pub fn fits_into(&self, total: Decimal) -> bool {
        total + self.0 <= Decimal::ONE_HUNDRED
    }
}

impl FromStr for Percent {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let val = Decimal::from_str(s.strip_suffix('%').unwrap_or(s))
            .map_err(|_| ParseError::NotANumber)?;
        if val < Decimal::ZERO || val > Decimal::ONE_HUNDRED {
            return Err(ParseError::OutOfRange);
        }
        Self::new(val).ok_or(ParseError::TooPrecise)
    }
}

impl From<Percent> for Decimal {
    fn from(percent: Percent) -> Self {
        percent.0
    }
}

/// Error of parsing a [`Percent`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ParseError {
    /// Input is not a decimal number.
    #[display("must be a number")]
    NotANumber,

    /// Input is outside the `[0, 100]` range.
    #[display("must be between 0 and 100")]
    OutOfRange,

    /// Input has more fractional digits than [`Percent::SCALE`].
    #[display("must have at most 2 decimal places")]
    TooPrecise,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{ParseError, Percent};

    #[test]
    fn from_str() {
        assert_eq!(Percent::from_str("60").unwrap().value(), Decimal::from(60));
        assert_eq!(Percent::from_str("0").unwrap().value(), Decimal::ZERO);
        assert_eq!(
            Percent::from_str("100").unwrap().value(),
            Decimal::ONE_HUNDRED,
        );
        assert_eq!(
            Percent::from_str("12.5%").unwrap().value(),
            "12.5".parse::<Decimal>().unwrap(),
        );

        assert_eq!(Percent::from_str("100.01"), Err(ParseError::OutOfRange));
        assert_eq!(Percent::from_str("-0.5"), Err(ParseError::OutOfRange));
        assert_eq!(Percent::from_str("half"), Err(ParseError::NotANumber));
        assert_eq!(
            Percent::from_str("33.3333"),
            Err(ParseError::TooPrecise),
        );
        assert_eq!(
            Percent::from_str("33.330").unwrap().value(),
            "33.33".parse::<Decimal>().unwrap(),
        );
    }

    #[test]
    fn fits_into() {
        let forty = Percent::from_str("40").unwrap();

        assert!(forty.fits_into(Decimal::from(60)));
        assert!(!forty.fits_into(Decimal::from(61)));
        assert!(forty.fits_into(Decimal::ZERO));
    }
}
