//! Amount Value Object
//!
//! Money in integer minor currency units (paise / cents). There are no
//! floating-point balances anywhere in the system; every arithmetic
//! operation is checked.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

/// Minor units per major unit
pub const MINOR_PER_MAJOR: u64 = 100;

/// Non-negative amount of money in minor units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    #[inline]
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Whole major units (e.g. `Amount::from_major(100)` is 100.00)
    #[inline]
    pub const fn from_major(major: u64) -> Self {
        Self(major.saturating_mul(MINOR_PER_MAJOR))
    }

    #[inline]
    pub const fn minor(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    #[inline]
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// `self - rhs`, or zero when `rhs` exceeds `self`
    #[inline]
    pub fn saturating_sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

/// Saturating sum for reporting (dashboards never fail on overflow)
impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| Amount(acc.0.saturating_add(a.0)))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0 / MINOR_PER_MAJOR,
            self.0 % MINOR_PER_MAJOR
        )
    }
}
