//! Collateral ratio calculator.
//!
//! CR = (Σ collateral × price / Σ debt × price) / 100
//!
//! Totals are accumulated and divided as big integers; only the quotient is
//! converted to a decimal.

use num_bigint::BigInt;
use rust_decimal::Decimal;

use redbank_common::types::Coin;

use crate::oracle::{FixedPriceOracle, PriceOracle};

/// Priced totals and the derived ratio for one account.
#[derive(Debug, Clone, PartialEq)]
pub struct CollateralRatio {
    pub total_debt: BigInt,
    pub total_collateral: BigInt,
    /// Zero when there is no debt.
    pub ratio: Decimal,
}

impl CollateralRatio {
    /// A ratio is only meaningful for accounts carrying debt.
    pub fn is_applicable(&self) -> bool {
        self.total_debt != BigInt::ZERO
    }
}

impl std::fmt::Display for CollateralRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_applicable() {
            write!(f, "{}", self.ratio)
        } else {
            write!(f, "N/A (zero debt)")
        }
    }
}

pub struct CrCalculator {
    oracle: Box<dyn PriceOracle>,
}

impl CrCalculator {
    pub fn new(oracle: Box<dyn PriceOracle>) -> Self {
        Self { oracle }
    }

    pub fn oracle_name(&self) -> &'static str {
        self.oracle.name()
    }

    /// Sum of `amount × price` over `coins`.
    pub fn total_value(&self, coins: &[Coin]) -> BigInt {
        coins
            .iter()
            .map(|coin| &coin.amount * self.oracle.price(&coin.denom))
            .sum()
    }

    pub fn calculate(&self, debts: &[Coin], collaterals: &[Coin]) -> CollateralRatio {
        let total_debt = self.total_value(debts);
        let total_collateral = self.total_value(collaterals);

        let ratio = if total_debt == BigInt::ZERO {
            Decimal::ZERO
        } else {
            ratio_of(&total_collateral, &total_debt)
        };

        CollateralRatio {
            total_debt,
            total_collateral,
            ratio,
        }
    }
}

impl Default for CrCalculator {
    fn default() -> Self {
        Self::new(Box::new(FixedPriceOracle::default()))
    }
}

/// Fractional digits carried into the division before fitting a `Decimal`.
const MAX_SCALE: u32 = 28;

/// `(collateral / debt) / 100`. `debt` must be non-zero.
fn ratio_of(collateral: &BigInt, debt: &BigInt) -> Decimal {
    // Divide in big integers at full scale, then drop fractional digits until
    // the quotient fits a Decimal mantissa. Only the integer part can overflow.
    let limit = BigInt::from(Decimal::MAX.mantissa());
    let mut scale = MAX_SCALE;
    let mut quotient = collateral * BigInt::from(10u32).pow(scale) / (debt * 100u32);

    while quotient.magnitude() > limit.magnitude() {
        if scale == 0 {
            tracing::warn!(
                %collateral,
                %debt,
                "Collateral ratio out of decimal range, saturating"
            );
            return Decimal::MAX;
        }
        quotient /= 10u32;
        scale -= 1;
    }

    i128::try_from(&quotient)
        .ok()
        .and_then(|mantissa| Decimal::try_from_i128_with_scale(mantissa, scale).ok())
        .map(|ratio| ratio.normalize())
        .unwrap_or(Decimal::ZERO)
}
