//! Per-account position fetcher.
//!
//! Each account needs three smart queries: debts, collaterals and the
//! liquidation-pricing view. They are independent and run concurrently; each
//! returns its own result so one failing query never hides the other two.

use std::future::Future;

use num_bigint::BigInt;
use serde_json::{Value, json};

use redbank_common::error::AppError;
use redbank_common::types::{Coin, HealthSummary, QueryKind};

/// Client able to run a smart query against the monitored contract.
pub trait SmartQuery {
    fn smart_query(&self, query: &Value) -> impl Future<Output = Result<Value, AppError>> + Send;
}

/// A query that failed for one account.
#[derive(Debug)]
pub struct FetchFailure {
    pub query: QueryKind,
    pub error: AppError,
}

/// Everything fetched for one account.
#[derive(Debug, Default)]
pub struct AccountPosition {
    pub address: String,
    pub debts: Vec<Coin>,
    pub collaterals: Vec<Coin>,
    pub health: Option<HealthSummary>,
    pub failures: Vec<FetchFailure>,
}

impl AccountPosition {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, query: QueryKind, error: AppError) {
        tracing::error!(
            address = %self.address,
            query = %query,
            error = %error,
            "Smart query failed"
        );
        self.failures.push(FetchFailure { query, error });
    }
}

/// `{"<query_type>": {"user": "<address>"}}`
pub fn build_query(kind: QueryKind, user: &str) -> Value {
    json!({ (kind.as_str()): { "user": user } })
}

/// Extract `{amount, denom}` entries from a `data` array.
///
/// Entries with a missing or malformed field are skipped individually.
pub fn parse_coins(body: &Value) -> Vec<Coin> {
    let Some(entries) = body.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let amount = entry.get("amount").and_then(Value::as_str);
            let denom = entry.get("denom").and_then(Value::as_str);
            let (Some(amount), Some(denom)) = (amount, denom) else {
                tracing::debug!(%entry, "Skipping coin entry without amount/denom");
                return None;
            };

            match amount.parse::<BigInt>() {
                Ok(amount) if amount >= BigInt::ZERO => Some(Coin::new(amount, denom)),
                _ => {
                    tracing::debug!(amount, denom, "Skipping coin entry with invalid amount");
                    None
                }
            }
        })
        .collect()
}

/// Extract the health view. Any missing field means there is nothing to report.
pub fn parse_health(body: &Value) -> Option<HealthSummary> {
    let data = body.get("data")?.as_object()?;

    Some(HealthSummary {
        health_status: data.get("health_status")?.clone(),
        total_collateralized_debt: data.get("total_collateralized_debt")?.as_str()?.to_string(),
        total_enabled_collateral: data.get("total_enabled_collateral")?.as_str()?.to_string(),
    })
}

pub struct PositionFetcher<Q> {
    client: Q,
}

impl<Q: SmartQuery> PositionFetcher<Q> {
    pub fn new(client: Q) -> Self {
        Self { client }
    }

    /// Run the three position queries for `address` concurrently.
    pub async fn fetch(&self, address: &str) -> AccountPosition {
        let (debts, collaterals, health) = tokio::join!(
            self.fetch_coins(QueryKind::UserDebts, address),
            self.fetch_coins(QueryKind::UserCollaterals, address),
            self.fetch_health(address),
        );

        let mut position = AccountPosition {
            address: address.to_string(),
            ..Default::default()
        };

        match debts {
            Ok(coins) => position.debts = coins,
            Err(e) => position.record_failure(QueryKind::UserDebts, e),
        }
        match collaterals {
            Ok(coins) => position.collaterals = coins,
            Err(e) => position.record_failure(QueryKind::UserCollaterals, e),
        }
        match health {
            Ok(health) => position.health = health,
            Err(e) => position.record_failure(QueryKind::UserPositionLiquidationPricing, e),
        }

        position
    }

    async fn fetch_coins(&self, kind: QueryKind, address: &str) -> Result<Vec<Coin>, AppError> {
        let body = self.client.smart_query(&build_query(kind, address)).await?;
        Ok(parse_coins(&body))
    }

    async fn fetch_health(&self, address: &str) -> Result<Option<HealthSummary>, AppError> {
        let query = build_query(QueryKind::UserPositionLiquidationPricing, address);
        let body = self.client.smart_query(&query).await?;
        Ok(parse_health(&body))
    }
}
