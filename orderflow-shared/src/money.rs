use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Basis points in a whole (100%).
pub const BPS_SCALE: i128 = 10_000;

/// A currency amount held as an integer count of minor units (cents).
///
/// All pricing arithmetic happens on the integer so totals never drift the
/// way binary floats do. Conversion to two-decimal text only happens in
/// `Display`. Arithmetic saturates at the `i64` bounds instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Build from a decimal major-unit value (e.g. `9.99`), rounded to the nearest cent.
    pub fn from_major(major: f64) -> Self {
        Self((major * 100.0).round() as i64)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiply by an item quantity.
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Apply a rate given in basis points (2300 = 23%), rounding half away from zero.
    pub fn apply_rate_bps(self, bps: u32) -> Self {
        let scaled = i128::from(self.0) * i128::from(bps);
        let half = BPS_SCALE / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / BPS_SCALE
        } else {
            (scaled - half) / BPS_SCALE
        };
        Self(rounded.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Money::from_minor(13530).to_string(), "135.30");
        assert_eq!(Money::from_minor(999).to_string(), "9.99");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-50).to_string(), "-0.50");
    }

    #[test]
    fn test_from_major_rounds_to_cent() {
        assert_eq!(Money::from_major(9.99).minor(), 999);
        assert_eq!(Money::from_major(0.1 + 0.2).minor(), 30);
        assert_eq!(Money::from_major(100.0).minor(), 10000);
    }

    #[test]
    fn test_rate_rounding() {
        // 23% of 110.00
        assert_eq!(Money::from_minor(11000).apply_rate_bps(2300).minor(), 2530);
        // 23% of 0.50 = 0.115 -> 0.12
        assert_eq!(Money::from_minor(50).apply_rate_bps(2300).minor(), 12);
        assert_eq!(Money::from_minor(-50).apply_rate_bps(2300).minor(), -12);
        assert_eq!(Money::ZERO.apply_rate_bps(2300), Money::ZERO);
    }

    #[test]
    fn test_sum_and_times() {
        let total: Money = vec![Money::from_minor(2500).times(2), Money::from_minor(6000)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_minor(11000));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_minor(i64::MAX / 2 + 1);
        assert_eq!(huge.times(2), Money::from_minor(i64::MAX));
        assert_eq!(huge + huge, Money::from_minor(i64::MAX));
        assert_eq!(Money::from_minor(i64::MIN) + Money::from_minor(-1), Money::from_minor(i64::MIN));

        let mut running = huge;
        running += huge;
        assert_eq!(running, Money::from_minor(i64::MAX));

        let total: Money = vec![huge, huge, huge].into_iter().sum();
        assert_eq!(total, Money::from_minor(i64::MAX));

        assert_eq!(Money::from_minor(i64::MAX).apply_rate_bps(20_000), Money::from_minor(i64::MAX));
        assert_eq!(Money::from_minor(i64::MIN).apply_rate_bps(20_000), Money::from_minor(i64::MIN));
    }

    #[test]
    fn test_serializes_as_minor_units() {
        let json = serde_json::to_string(&Money::from_minor(13530)).unwrap();
        assert_eq!(json, "13530");
        let back: Money = serde_json::from_str("999").unwrap();
        assert_eq!(back, Money::from_minor(999));
    }
}
