//! Borrower discovery from the Red Bank contract state dump.
//!
//! Every map entry keyed by a user carries the user's identifier as the first
//! key part. Scanning all state and decoding each key recovers the set of
//! accounts holding debt or collateral.

use std::collections::BTreeMap;

use redbank_common::error::AppError;
use redbank_common::types::AccountIdentifier;
use redbank_decoders::proto::{Model, PageRequest, QueryAllContractStateRequest};
use redbank_decoders::{KeyDecodeError, KeyDecoder, MapKeyDecoder};

use crate::rpc::ContractStateSource;

/// One distinct identifier found in the dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub identifier: AccountIdentifier,
    /// Number of raw keys that decoded to this identifier.
    pub key_count: u64,
}

/// Outcome of a full state scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Distinct account addresses, sorted.
    pub addresses: Vec<String>,
    /// Raw entries returned by the node.
    pub scanned: u64,
    /// Entries whose key did not decode.
    pub skipped: u64,
    /// Distinct identifiers before address resolution.
    pub identifiers: usize,
    /// Raw keys seen per resolved address.
    pub key_counts: BTreeMap<String, u64>,
    /// Pages requested from the node.
    pub pages: u64,
    /// The node reported more entries than were fetched.
    pub truncated: bool,
}

/// Scans a contract's full state and resolves the embedded account addresses.
pub struct StateScanner<S, D = MapKeyDecoder> {
    source: S,
    decoder: D,
    /// `None` issues a single unpaginated query.
    page_limit: Option<u64>,
}

impl<S, D> StateScanner<S, D>
where
    S: ContractStateSource,
    D: KeyDecoder,
{
    pub fn new(source: S, decoder: D) -> Self {
        Self {
            source,
            decoder,
            page_limit: None,
        }
    }

    /// Follow `next_key` with pages of `limit` entries instead of a single query.
    pub fn with_page_limit(mut self, limit: Option<u64>) -> Self {
        if let Some(limit) = limit {
            tracing::info!(limit, "Paginated state scan enabled");
        }
        self.page_limit = limit;
        self
    }

    /// Scan all contract state for `contract`.
    ///
    /// Fails on any transport or protobuf error, and on the first identifier
    /// that does not parse as `{"addr": ...}`.
    pub async fn scan(&self, contract: &str) -> Result<ScanReport, AppError> {
        let mut accounts: BTreeMap<AccountIdentifier, WorkItem> = BTreeMap::new();
        let mut report = ScanReport::default();
        let mut next_key: Option<Vec<u8>> = None;

        loop {
            let request = QueryAllContractStateRequest {
                address: contract.to_string(),
                pagination: self
                    .page_limit
                    .map(|limit| PageRequest::page(next_key.clone().unwrap_or_default(), limit)),
            };

            let response = self.source.all_contract_state(&request).await?;
            report.pages += 1;

            let (scanned, skipped) = self.ingest(&response.models, &mut accounts);
            report.scanned += scanned;
            report.skipped += skipped;

            tracing::debug!(
                page = report.pages,
                entries = scanned,
                skipped,
                "Scanned contract state page"
            );

            let Some(key) = response.next_key() else {
                break;
            };

            if self.page_limit.is_none() {
                tracing::warn!(
                    scanned = report.scanned,
                    "Node returned a partial state dump; accounts past this page are not scanned"
                );
                report.truncated = true;
                break;
            }

            if next_key.as_deref() == Some(key) {
                tracing::warn!(page = report.pages, "Pagination key did not advance, stopping scan");
                report.truncated = true;
                break;
            }
            next_key = Some(key.to_vec());
        }

        report.identifiers = accounts.len();

        for item in accounts.values() {
            let address = item.identifier.address().map_err(|e| {
                tracing::error!(
                    identifier = %item.identifier,
                    error = %e,
                    "Account identifier is not valid JSON, aborting scan"
                );
                AppError::Json(e)
            })?;
            tracing::debug!(
                identifier = %item.identifier,
                keys = item.key_count,
                "Account identifier resolved"
            );
            *report.key_counts.entry(address).or_default() += item.key_count;
        }
        report.addresses = report.key_counts.keys().cloned().collect();

        tracing::info!(
            contract,
            scanned = report.scanned,
            skipped = report.skipped,
            identifiers = report.identifiers,
            addresses = report.addresses.len(),
            "Contract state scan complete"
        );

        Ok(report)
    }

    /// Decode every key of a page into `accounts`. Returns `(scanned, skipped)`.
    fn ingest(
        &self,
        models: &[Model],
        accounts: &mut BTreeMap<AccountIdentifier, WorkItem>,
    ) -> (u64, u64) {
        let mut skipped = 0;

        for model in models {
            match self.decoder.decode(&model.key) {
                Ok(identifier) => {
                    accounts
                        .entry(identifier.clone())
                        .or_insert_with(|| WorkItem {
                            identifier,
                            key_count: 0,
                        })
                        .key_count += 1;
                }
                Err(KeyDecodeError::TooShort { .. }) => {
                    // Items and other non-map storage.
                    skipped += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        decoder = self.decoder.name(),
                        key = %hex::encode(&model.key),
                        error = %e,
                        "Unable to decode contract state key"
                    );
                    skipped += 1;
                }
            }
        }

        (models.len() as u64, skipped)
    }
}
