use serde::{Deserialize, Serialize};

/// Fixed-point currency amount in minor units (cents). Ledger math never
/// touches binary floating point; drift across millions of entries is not
/// acceptable.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// `Money::from_major_minor(129, 99)` == 129.99
    pub fn from_major_minor(major: i64, minor: u8) -> Self {
        debug_assert!(minor < 100);
        Money(major * 100 + minor as i64)
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

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Commission share at `rate_bp` basis points, floored toward zero in
    /// minor units: 129.99 at 3000 bp is 38.99, never 39.00. Widens through
    /// i128 so gross * rate cannot overflow.
    pub fn basis_points(self, rate_bp: u32) -> Money {
        let scaled = (self.0 as i128) * (rate_bp as i128) / 10_000;
        Money(scaled as i64)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
