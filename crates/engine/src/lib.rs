pub mod cr_calculator;
pub mod oracle;

pub use cr_calculator::{CollateralRatio, CrCalculator};
pub use oracle::{FixedPriceOracle, PriceOracle, TablePriceOracle};
