//! Exact sums of money amounts.
//!
//! Adding `f64` values gives different results depending on the order they
//! are added in. Amounts are converted to decimals with six places before
//! summing so that a total only depends on which amounts went in.

use std::{
    iter::Sum,
    ops::{AddAssign, Sub},
};

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};

const SUM_PLACES: u32 = 6;
const CENT_PLACES: u32 = 2;

/// A running total of amounts, kept as a decimal with six places.
///
/// Digits past the sixth decimal place are rounded away when an amount is
/// added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmountSum(Decimal);

impl AmountSum {
    /// The total as the nearest `f64`.
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// The total rounded to two decimal places, halves away from zero.
    pub fn to_cents(self) -> f64 {
        AmountSum(
            self.0
                .round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
        .to_f64()
    }
}

impl From<f64> for AmountSum {
    /// Non-finite amounts and amounts too large for a decimal count as zero.
    fn from(amount: f64) -> Self {
        let amount = Decimal::from_f64(amount).unwrap_or_default();

        Self(amount.round_dp_with_strategy(SUM_PLACES, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl AddAssign<f64> for AmountSum {
    fn add_assign(&mut self, amount: f64) {
        self.0 += AmountSum::from(amount).0;
    }
}

impl Sub for AmountSum {
    type Output = AmountSum;

    fn sub(self, other: AmountSum) -> AmountSum {
        AmountSum(self.0 - other.0)
    }
}

impl Sum<f64> for AmountSum {
    fn sum<I: Iterator<Item = f64>>(amounts: I) -> Self {
        amounts.fold(AmountSum::default(), |mut total, amount| {
            total += amount;
            total
        })
    }
}
