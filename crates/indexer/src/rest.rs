//! REST gateway client for CosmWasm smart queries.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use reqwest::Client;
use serde_json::Value;

use redbank_common::error::AppError;

use crate::fetcher::SmartQuery;

/// Smart-query client bound to a single contract.
pub struct RestClient {
    base_url: String,
    contract: String,
    client: Client,
}

impl RestClient {
    /// No request timeout is set: smart queries wait as long as the gateway does.
    pub fn new(base_url: &str, contract: &str) -> Result<Self, AppError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            contract: contract.to_string(),
            client: Client::builder().build()?,
        })
    }

    /// `{rest}/cosmwasm/wasm/v1/contract/{contract}/smart/{base64(query)}`
    pub fn smart_query_url(&self, query: &Value) -> String {
        // URL-safe alphabet keeps the payload a single path segment; the
        // gateway accepts both alphabets for bytes parameters.
        let encoded = URL_SAFE.encode(query.to_string());
        format!(
            "{}/cosmwasm/wasm/v1/contract/{}/smart/{}",
            self.base_url, self.contract, encoded
        )
    }
}

impl SmartQuery for RestClient {
    async fn smart_query(&self, query: &Value) -> Result<Value, AppError> {
        let url = self.smart_query_url(query);
        tracing::debug!(%url, "Smart query");

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(body)
    }
}
