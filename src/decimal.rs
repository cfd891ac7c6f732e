//! Fixed-point money and discount rate types.
//!
//! Order values are rounded half-up to 2 decimal places when they enter the
//! system; limits are taken as given. Arithmetic after that is exact: a
//! 2-digit amount multiplied by a 2-digit rate has at most 4 fractional
//! digits, and `rust_decimal` carries them without loss, so sums of committed
//! payments never drift.

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// A monetary amount in the single currency of a run.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use payment_optimizer::Money;
///
/// let amount = Money::from_str("10.005").unwrap();
/// assert_eq!(amount.to_string(), "10.01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Money(Decimal);

impl Money {
    /// Number of fractional digits kept for input and output.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Wraps an exact decimal without rounding.
    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Builds an amount from an input value, rounding half-up to 2 places.
    pub fn from_input(value: Decimal) -> Self {
        Money(round_half_up(value, Self::SCALE))
    }

    /// Returns the underlying decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns `self × rate`, exactly.
    pub fn apply_rate(self, rate: DiscountRate) -> Self {
        Money(self.0 * rate.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Money::from_input(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", round_half_up(self.0, Self::SCALE))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// A discount rate as a fraction in `[0, 1]` with 2 fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct DiscountRate(Decimal);

impl DiscountRate {
    pub const ZERO: Self = DiscountRate(Decimal::ZERO);

    /// Flat discount granted for paying at least a tenth of an order with points.
    pub const TEN_PERCENT: Self = DiscountRate(Decimal::from_parts(10, 0, 0, false, 2));

    /// Largest share of an order the partial-points phase pays with points.
    pub const NINETY_PERCENT: Self = DiscountRate(Decimal::from_parts(90, 0, 0, false, 2));

    /// Converts a percentage (`10` means 10%) into a rate, rounding half-up to
    /// 2 places. Returns `None` outside `[0, 100]`.
    pub fn from_percent(percent: Decimal) -> Option<Self> {
        if (percent.is_sign_negative() && !percent.is_zero()) || percent > Decimal::ONE_HUNDRED {
            return None;
        }
        Some(DiscountRate(round_half_up(
            percent / Decimal::ONE_HUNDRED,
            Money::SCALE,
        )))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}
