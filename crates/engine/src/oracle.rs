//! Price lookup used to value debt and collateral coins.
//!
//! There is no oracle integration yet: every denom is priced at a fixed value
//! unless a per-denom table is configured.

use std::collections::HashMap;

use num_bigint::BigInt;

use redbank_common::error::AppError;

/// Trait implemented by price sources the ratio calculator can use.
pub trait PriceOracle: Send + Sync {
    /// Price of one unit of `denom`.
    fn price(&self, denom: &str) -> BigInt;

    /// Human-readable name for this oracle.
    fn name(&self) -> &'static str;
}

/// Prices every denom at the same value.
#[derive(Debug, Clone)]
pub struct FixedPriceOracle {
    price: BigInt,
}

impl FixedPriceOracle {
    pub fn new(price: impl Into<BigInt>) -> Self {
        Self {
            price: price.into(),
        }
    }
}

impl Default for FixedPriceOracle {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PriceOracle for FixedPriceOracle {
    fn price(&self, _denom: &str) -> BigInt {
        self.price.clone()
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Per-denom price table with a fixed fallback for unlisted denoms.
#[derive(Debug, Clone, Default)]
pub struct TablePriceOracle {
    prices: HashMap<String, BigInt>,
    fallback: FixedPriceOracle,
}

impl TablePriceOracle {
    pub fn new(prices: HashMap<String, BigInt>, fallback: FixedPriceOracle) -> Self {
        Self { prices, fallback }
    }

    /// Parse a `denom=price,denom=price` table.
    pub fn parse(table: &str) -> Result<Self, AppError> {
        let mut prices = HashMap::new();

        for entry in table.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (denom, price) = entry
                .split_once('=')
                .ok_or_else(|| AppError::Config(format!("price entry '{entry}' is not denom=price")))?;
            let price: BigInt = price
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("invalid price for {denom}: '{price}'")))?;
            if price < BigInt::ZERO {
                return Err(AppError::Config(format!("negative price for {denom}: {price}")));
            }
            prices.insert(denom.trim().to_string(), price);
        }

        Ok(Self::new(prices, FixedPriceOracle::default()))
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl PriceOracle for TablePriceOracle {
    fn price(&self, denom: &str) -> BigInt {
        match self.prices.get(denom) {
            Some(price) => price.clone(),
            None => self.fallback.price(denom),
        }
    }

    fn name(&self) -> &'static str {
        "table"
    }
}
