//! Monetary amounts in minor currency units.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// A non-negative amount of money in the smallest currency unit (e.g. cents).
///
/// All arithmetic is integer and checked, so order totals are exact and
/// deterministic regardless of how many line items are summed.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Price of `quantity` units at `self` per unit.
    pub fn checked_mul(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(u64::from(quantity)).map(Money)
    }
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn displays_as_major_and_minor_units() {
        assert_eq!(Money::from_cents(1597).to_string(), "15.97");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn line_price_is_exact() {
        let price = Money::from_cents(499);
        assert_eq!(price.checked_mul(2), Some(Money::from_cents(998)));
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        let big = Money::from_cents(u64::MAX);
        assert_eq!(big.checked_mul(2), None);
        assert_eq!(big.checked_add(Money::from_cents(1)), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: multiplication agrees with repeated addition.
        #[test]
        fn mul_matches_repeated_add(cents in 0u64..100_000, qty in 0u32..50) {
            let price = Money::from_cents(cents);
            let mut acc = Money::ZERO;
            for _ in 0..qty {
                acc = acc.checked_add(price).unwrap();
            }
            prop_assert_eq!(price.checked_mul(qty), Some(acc));
        }
    }
}
