//! Money amounts in the smallest currency unit.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Number of minor units (paise) per major unit (rupee).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// An amount of money in minor units (paise).
///
/// Signed so that ledger adjustments (debits) can be expressed; amounts handed to
/// recipients are always non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("amount must not be negative")]
    Negative,
    #[error("amount must be a finite number")]
    NotFinite,
    #[error("amount is out of range")]
    OutOfRange,
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Convert a major-unit amount (e.g. `12.5` rupees) to minor units, rounding half away
    /// from zero. Rejects NaN, infinities and negative amounts.
    pub fn try_from_major(major: f64) -> Result<Self, MoneyError> {
        if !major.is_finite() {
            return Err(MoneyError::NotFinite);
        }
        if major < 0.0 {
            return Err(MoneyError::Negative);
        }
        let minor = (major * MINOR_UNITS_PER_MAJOR as f64).round();
        if minor > i64::MAX as f64 {
            return Err(MoneyError::OutOfRange);
        }
        Ok(Self(minor as i64))
    }

    pub fn minor(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `self * percent / 100`, rounded half-up. Only meaningful for non-negative amounts.
    pub fn percent_round_half_up(self, percent: i64) -> Self {
        let scaled = self.0 as i128 * percent as i128;
        Self(((scaled + 50) / 100) as i64)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = MINOR_UNITS_PER_MAJOR as u64;
        write!(f, "{sign}{}.{:02}", abs / per, abs % per)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}
