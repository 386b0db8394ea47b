//! Console report for scanned accounts.

use std::fmt;

use redbank_common::types::Coin;
use redbank_engine::CollateralRatio;

use crate::fetcher::AccountPosition;
use crate::scanner::ScanReport;

const RULE: &str = "───────────────────────────────────────────────────";

fn coin_list(coins: &[Coin]) -> String {
    let items: Vec<String> = coins.iter().map(Coin::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Per-account report block.
pub struct AccountReport<'a> {
    pub position: &'a AccountPosition,
    pub ratio: &'a CollateralRatio,
}

impl<'a> AccountReport<'a> {
    pub fn new(position: &'a AccountPosition, ratio: &'a CollateralRatio) -> Self {
        Self { position, ratio }
    }
}

impl fmt::Display for AccountReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let position = self.position;

        writeln!(f, "  User Address:        {}", position.address)?;
        writeln!(f, "  Debt Coins:          {}", coin_list(&position.debts))?;
        writeln!(f, "  Collateral Coins:    {}", coin_list(&position.collaterals))?;

        if let Some(health) = &position.health {
            writeln!(f, "  Health Status:       {}", health.health_status)?;
            writeln!(f, "  Collateralized Debt: {}", health.total_collateralized_debt)?;
            writeln!(f, "  Enabled Collateral:  {}", health.total_enabled_collateral)?;
        }

        for failure in &position.failures {
            writeln!(f, "  Failed Query:        {} ({})", failure.query, failure.error)?;
        }

        if self.ratio.is_applicable() {
            writeln!(f, "  Collateral Ratio:    {}", self.ratio.ratio)?;
        } else {
            writeln!(f, "  Collateral Ratio:    N/A as zero debt")?;
        }
        write!(f, "{RULE}")
    }
}

/// Header printed once the state scan is done.
pub struct ScanSummary<'a> {
    pub contract: &'a str,
    pub scan: &'a ScanReport,
}

impl fmt::Display for ScanSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "  Red Bank Accounts")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "  Contract:            {}", self.contract)?;
        writeln!(f, "  Entries Scanned:     {}", self.scan.scanned)?;
        writeln!(f, "  Keys Skipped:        {}", self.scan.skipped)?;
        writeln!(f, "  Accounts Found:      {}", self.scan.addresses.len())?;
        if self.scan.truncated {
            writeln!(f, "  Warning:             state dump incomplete")?;
        }
        write!(f, "{RULE}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use redbank_common::error::AppError;
    use redbank_common::types::{HealthSummary, QueryKind};
    use redbank_engine::CrCalculator;

    use crate::fetcher::FetchFailure;

    fn position() -> AccountPosition {
        AccountPosition {
            address: "osmo1user".to_string(),
            debts: vec![Coin::new(100, "uusdc")],
            collaterals: vec![Coin::new(500, "uosmo"), Coin::new(7, "uatom")],
            ..Default::default()
        }
    }

    #[test]
    fn test_report_lists_coins_and_ratio() {
        let position = position();
        let ratio = CrCalculator::default().calculate(&position.debts, &position.collaterals);

        let text = AccountReport::new(&position, &ratio).to_string();
        assert!(text.contains("osmo1user"));
        assert!(text.contains("[100uusdc]"));
        assert!(text.contains("[500uosmo, 7uatom]"));
        assert!(text.contains("0.0507"));
    }

    #[test]
    fn test_report_zero_debt_is_na() {
        let mut position = position();
        position.debts.clear();
        let ratio = CrCalculator::default().calculate(&position.debts, &position.collaterals);

        let text = AccountReport::new(&position, &ratio).to_string();
        assert!(text.contains("N/A as zero debt"));
    }

    #[test]
    fn test_report_includes_health_and_failures() {
        let mut position = position();
        position.health = Some(HealthSummary {
            health_status: serde_json::json!("not_borrowing"),
            total_collateralized_debt: "0".to_string(),
            total_enabled_collateral: "507".to_string(),
        });
        position.failures.push(FetchFailure {
            query: QueryKind::UserDebts,
            error: AppError::Rpc("connection reset".to_string()),
        });
        let ratio = CollateralRatio {
            total_debt: BigInt::ZERO,
            total_collateral: BigInt::from(507),
            ratio: Default::default(),
        };

        let text = AccountReport::new(&position, &ratio).to_string();
        assert!(text.contains("\"not_borrowing\""));
        assert!(text.contains("507"));
        assert!(text.contains("user_debts (RPC error: connection reset)"));
    }

    #[test]
    fn test_scan_summary_flags_truncation() {
        let scan = ScanReport {
            addresses: vec!["osmo1a".into(), "osmo1b".into()],
            scanned: 40,
            skipped: 3,
            truncated: true,
            ..Default::default()
        };
        let text = ScanSummary {
            contract: "osmo1redbank",
            scan: &scan,
        }
        .to_string();
        assert!(text.contains("Entries Scanned:     40"));
        assert!(text.contains("Accounts Found:      2"));
        assert!(text.contains("state dump incomplete"));
    }
}
