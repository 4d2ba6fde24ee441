use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Invalid amount: '{0}'")]
    Invalid(String),
}

/// A decimal amount that keeps the scale it was written with.
///
/// `"3.99"` stays `3.99` and `"2000.00"` stays `2000.00`. Literals that would need
/// rounding to fit a `Decimal` are rejected instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub fn parse(s: &str) -> Result<Self, MoneyError> {
        let s = s.trim();
        Decimal::from_str_exact(s)
            .map(Money)
            .map_err(|_| MoneyError::Invalid(s.to_string()))
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Number of fractional digits as written.
    pub fn scale(self) -> u32 {
        self.0.scale()
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.scale() <= 2 {
            write!(f, "${:.2}", self.0)
        } else {
            write!(f, "${}", self.0)
        }
    }
}
