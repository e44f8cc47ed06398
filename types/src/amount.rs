//! ZETA amount types.
//!
//! Amounts are fixed-point integers (u128 raw units, 8 decimal places) to
//! avoid floating-point drift when balances are replayed from the chain.
//! 1 ZETA = 100_000_000 raw.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Raw units per whole ZETA.
pub const RAW_PER_ZETA: u128 = 100_000_000;

/// A non-negative ZETA amount in raw units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Construct from a whole number of ZETA.
    pub fn from_zeta(zeta: u64) -> Self {
        Self(zeta as u128 * RAW_PER_ZETA)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / RAW_PER_ZETA;
        let frac = self.0 % RAW_PER_ZETA;
        if frac == 0 {
            write!(f, "{} ZETA", whole)
        } else {
            let s = format!("{:08}", frac);
            write!(f, "{}.{} ZETA", whole, s.trim_end_matches('0'))
        }
    }
}

/// A derived account balance in raw units.
///
/// Balances are never stored; they are replayed from confirmed transactions.
/// The ledger performs no funds check at submission time, so a replayed
/// balance can legitimately be negative — the type is signed to say so.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Balance(i128);

impl Balance {
    pub const ZERO: Self = Self(0);

    pub fn raw(&self) -> i128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Add a received amount.
    pub fn credit(self, amount: Amount) -> Self {
        Self(self.0.saturating_add(amount.raw() as i128))
    }

    /// Subtract a sent amount (plus fee, accounted by the caller).
    pub fn debit(self, amount: Amount) -> Self {
        Self(self.0.saturating_sub(amount.raw() as i128))
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / RAW_PER_ZETA;
        let frac = abs % RAW_PER_ZETA;
        if frac == 0 {
            write!(f, "{}{} ZETA", sign, whole)
        } else {
            let s = format!("{:08}", frac);
            write!(f, "{}{}.{} ZETA", sign, whole, s.trim_end_matches('0'))
        }
    }
}
