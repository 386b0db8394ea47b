use redbank_common::error::AppError;
use redbank_decoders::KeyDecoder;
use redbank_engine::{CollateralRatio, CrCalculator};

use crate::fetcher::{AccountPosition, PositionFetcher, SmartQuery};
use crate::rpc::ContractStateSource;
use crate::scanner::{ScanReport, StateScanner};

/// Totals for one monitoring pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub scan: ScanReport,
    pub accounts_processed: usize,
    /// Accounts where at least one smart query failed.
    pub accounts_incomplete: usize,
    /// Accounts without debt, reported as N/A.
    pub accounts_without_debt: usize,
}

/// One monitoring pass: discover accounts, then fetch and price each of them.
pub struct Monitor<S, D, Q> {
    contract: String,
    scanner: StateScanner<S, D>,
    fetcher: PositionFetcher<Q>,
    calculator: CrCalculator,
}

impl<S, D, Q> Monitor<S, D, Q>
where
    S: ContractStateSource,
    D: KeyDecoder,
    Q: SmartQuery,
{
    pub fn new(
        contract: String,
        scanner: StateScanner<S, D>,
        fetcher: PositionFetcher<Q>,
        calculator: CrCalculator,
    ) -> Self {
        Self {
            contract,
            scanner,
            fetcher,
            calculator,
        }
    }

    /// Run a single pass.
    ///
    /// A failed scan aborts the pass. Accounts are processed one at a time and
    /// handed to `on_scan` / `on_account` as soon as they are available.
    pub async fn run<F, G>(
        &self,
        mut on_scan: F,
        mut on_account: G,
    ) -> Result<RunSummary, AppError>
    where
        F: FnMut(&ScanReport),
        G: FnMut(&AccountPosition, &CollateralRatio),
    {
        tracing::info!(
            contract = %self.contract,
            oracle = self.calculator.oracle_name(),
            "Monitoring pass started"
        );

        let scan = self.scanner.scan(&self.contract).await?;
        on_scan(&scan);

        let mut summary = RunSummary::default();

        for address in &scan.addresses {
            let position = self.fetcher.fetch(address).await;
            let ratio = self
                .calculator
                .calculate(&position.debts, &position.collaterals);

            tracing::debug!(
                address = %address,
                debts = position.debts.len(),
                collaterals = position.collaterals.len(),
                ratio = %ratio,
                "Account processed"
            );

            summary.accounts_processed += 1;
            if !position.is_complete() {
                summary.accounts_incomplete += 1;
            }
            if !ratio.is_applicable() {
                summary.accounts_without_debt += 1;
            }

            on_account(&position, &ratio);
        }

        tracing::info!(
            accounts = summary.accounts_processed,
            incomplete = summary.accounts_incomplete,
            without_debt = summary.accounts_without_debt,
            "Monitoring pass complete"
        );

        summary.scan = scan;
        Ok(summary)
    }
}
