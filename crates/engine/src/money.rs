use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy, prelude::FromPrimitive};
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed money amount in the account's base currency unit.
///
/// Backed by a [`Decimal`] so sums and scenario scaling keep the precision of
/// the inputs: nothing is rounded until the value is displayed or exported.
///
/// The value is signed:
/// - positive = inflow / increase
/// - negative = outflow / decrease
///
/// The `+`/`-` operators panic on overflow like [`Decimal`]'s; the projection
/// pipeline uses [`Money::checked_add`] and friends instead.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount: Money = "12.345".parse().unwrap();
/// assert_eq!(amount.to_string(), "12.35");
/// assert_eq!((amount + amount).to_string(), "24.69");
/// ```
///
/// Parsing from user input accepts `.` or `,` as decimal separator:
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10,5".parse::<Money>().unwrap(), "10.50".parse::<Money>().unwrap());
/// assert!("ten".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Wraps a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Converts a float coming from a loosely typed boundary.
    ///
    /// Rejects `NaN` and infinities.
    pub fn try_from_f64(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(format!(
                "amount must be finite, got {value}"
            )));
        }
        Decimal::from_f64(value)
            .map(Self)
            .ok_or_else(|| EngineError::InvalidAmount(format!("amount out of range: {value}")))
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    #[must_use]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Multiplies the amount by `factor` without rounding (returns `None` on
    /// overflow).
    #[must_use]
    pub fn checked_scale(self, factor: Decimal) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }

    /// Checked sum of `values` (returns `None` on overflow).
    pub fn checked_sum(values: impl IntoIterator<Item = Money>) -> Option<Money> {
        values
            .into_iter()
            .try_fold(Money::ZERO, |total, value| total.checked_add(value))
    }

    /// Rounds to two decimals, midpoints away from zero.
    #[must_use]
    pub fn round_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl fmt::Display for Money {
    /// Always two fractional digits, no thousands separators.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round_cents().0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
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

    fn sub(self, rhs: Money) -> Self::Output {
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

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// Fractional digits are kept as-is.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim().replace(',', ".");
        let mut parts = rest.split('.');
        let units = parts.next().unwrap_or_default();
        let fraction = parts.next();
        if parts.next().is_some()
            || units.is_empty()
            || !units.chars().all(|c| c.is_ascii_digit())
            || fraction.is_some_and(|frac| !frac.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(EngineError::InvalidAmount(format!("invalid amount: {s}")));
        }

        let value = Decimal::from_str(&rest)
            .map_err(|_| EngineError::InvalidAmount(format!("amount too large: {s}")))?;

        Ok(Money(if negative { -value } else { value }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_always_has_two_decimals() {
        assert_eq!(Money::from(0).to_string(), "0.00");
        assert_eq!(Money::new(Decimal::new(1, 2)).to_string(), "0.01");
        assert_eq!(Money::new(Decimal::new(105, 1)).to_string(), "10.50");
        assert_eq!(Money::new(Decimal::new(-105, 1)).to_string(), "-10.50");
        assert_eq!(Money::from(1_234_567).to_string(), "1234567.00");
    }

    #[test]
    fn display_rounds_midpoints_away_from_zero() {
        assert_eq!(Money::new(Decimal::new(1005, 3)).to_string(), "1.01");
        assert_eq!(Money::new(Decimal::new(-1005, 3)).to_string(), "-1.01");
        assert_eq!(Money::new(Decimal::new(1004, 3)).to_string(), "1.00");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap(), Money::from(10));
        assert_eq!(
            "10.5".parse::<Money>().unwrap(),
            Money::new(Decimal::new(105, 1))
        );
        assert_eq!(
            "10,50".parse::<Money>().unwrap(),
            Money::new(Decimal::new(1050, 2))
        );
        assert_eq!(
            "-0.01".parse::<Money>().unwrap(),
            Money::new(Decimal::new(-1, 2))
        );
        assert_eq!("+1.00".parse::<Money>().unwrap(), Money::from(1));
        assert_eq!(
            "  2.30 ".parse::<Money>().unwrap(),
            Money::new(Decimal::new(23, 1))
        );
    }

    #[test]
    fn parse_keeps_extra_precision() {
        let value = "12.345".parse::<Money>().unwrap();
        assert_eq!(value.amount(), Decimal::new(12345, 3));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("12a".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        assert!(Money::try_from_f64(f64::NAN).is_err());
        assert!(Money::try_from_f64(f64::INFINITY).is_err());
        assert_eq!(
            Money::try_from_f64(1500.0).unwrap().amount(),
            Decimal::from(1500)
        );
    }

    #[test]
    fn scale_does_not_round() {
        let value = Money::new(Decimal::new(333, 2))
            .checked_scale(Decimal::new(11, 1))
            .unwrap();
        assert_eq!(value.amount(), Decimal::new(36630, 4));
    }

    #[test]
    fn checked_operations_report_overflow() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.checked_add(Money::from(1)), None);
        assert_eq!((-max).checked_sub(Money::from(1)), None);
        assert_eq!(max.checked_scale(Decimal::TWO), None);
        assert_eq!(Money::checked_sum([max, max]), None);
        assert_eq!(
            Money::checked_sum([Money::from(2), Money::from(3)]),
            Some(Money::from(5))
        );
    }
}
