use std::{
    fmt,
    ops::Sub,
    str::FromStr,
};

use serde::{Serialize, Serializer};

use crate::EngineError;

/// Money amount represented as **integer cents**.
///
/// Amounts entered by the user are never negative; a negative value can only
/// come out of a subtraction (a loss-making profit).
///
/// The database keeps amounts as `REAL` units, see [`Amount::to_units`] and
/// [`Amount::from_units`].
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// negatives and more than 2 decimals):
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Amount>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Amount>().is_err());
/// assert!("-1".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Largest amount users may enter: 999,999,999,999.99.
    ///
    /// Amounts are stored as `REAL` units; below this bound every cent
    /// survives the trip through `f64`, including profits of two such values.
    pub const MAX: Amount = Amount(99_999_999_999_999);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Value in currency units, as stored in the `REAL` columns.
    #[must_use]
    pub fn to_units(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Converts a stored `REAL` value back to cents, rounding to the nearest cent.
    #[must_use]
    pub fn from_units(units: f64) -> Self {
        Self((units * 100.0).round() as i64)
    }

    /// Parses optional user input: blank text is zero instead of an error.
    pub fn parse_or_zero(s: &str) -> Result<Self, EngineError> {
        if s.trim().is_empty() {
            return Ok(Self::ZERO);
        }
        s.parse()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.to_units())
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - an optional leading `+`, never a `-`
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(format!("\"{}\" is not a number", s.trim()));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }
        if trimmed.starts_with('-') {
            return Err(EngineError::InvalidAmount(
                "amount must not be negative".to_string(),
            ));
        }

        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed).replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => {
                        return Err(EngineError::InvalidAmount(
                            "too many decimals".to_string(),
                        ));
                    }
                }
            }
        };

        units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .filter(|&v| v <= Self::MAX.0)
            .map(Amount)
            .ok_or_else(overflow)
    }
}
