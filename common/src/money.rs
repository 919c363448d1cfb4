//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
use rust_decimal::Decimal;

/// Non-negative amount of money in US dollars with at most cent precision.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Money(Decimal);

impl Money {
    /// Maximum number of fractional digits of a [`Money`] amount.
    pub const SCALE: u32 = 2;

    /// Creates a new [`Money`] if the provided `amount` is non-negative and
    /// has no more than [`Money::SCALE`] fractional digits.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        let amount = amount.normalize();
        (amount >= Decimal::ZERO && amount.scale() <= Self::SCALE)
            .then_some(Self(amount))
    }

    /// Returns the amount of this [`Money`].
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Indicates whether this [`Money`] is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('$').unwrap_or(s);
        let amount =
            Decimal::from_str(digits).map_err(|_| ParseError::NotANumber)?;
        if amount < Decimal::ZERO {
            return Err(ParseError::Negative);
        }
        Self::new(amount).ok_or(ParseError::TooPrecise)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

/// Error of parsing [`Money`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ParseError {
    /// Input is not a decimal number.
    #[display("must be a number")]
    NotANumber,

    /// Input is a negative number.
    #[display("must not be negative")]
    Negative,

    /// Input has more fractional digits than cents.
    #[display("must have at most 2 decimal places")]
    TooPrecise,
}
