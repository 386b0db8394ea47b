//! Tendermint JSON-RPC client for ABCI queries.
//!
//! Only `abci_query` is needed: the contract state dump is a gRPC query routed
//! through ABCI with a protobuf request in `data`.

use std::future::Future;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use prost::Message;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use redbank_common::error::AppError;
use redbank_decoders::proto::{
    ALL_CONTRACT_STATE_PATH, QueryAllContractStateRequest, QueryAllContractStateResponse,
};

/// Source of raw contract state pages.
pub trait ContractStateSource {
    fn all_contract_state(
        &self,
        request: &QueryAllContractStateRequest,
    ) -> impl Future<Output = Result<QueryAllContractStateResponse, AppError>> + Send;
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<AbciQueryResult>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AbciQueryResult {
    response: AbciResponse,
}

#[derive(Debug, Deserialize)]
struct AbciResponse {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    log: String,
    /// Base64 result bytes; null when the query returned nothing.
    #[serde(default)]
    value: Option<String>,
}

/// HTTP client for a Tendermint RPC endpoint.
pub struct TendermintRpc {
    url: String,
    client: Client,
}

impl TendermintRpc {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Run an ABCI query and return the raw response value.
    pub async fn abci_query(&self, path: &str, data: &[u8]) -> Result<Vec<u8>, AppError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": "redbank-indexer",
            "method": "abci_query",
            "params": {
                "path": path,
                "data": hex::encode(data),
                "prove": false,
            },
        });

        let response: RpcResponse = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        extract_value(response)
    }
}

impl ContractStateSource for TendermintRpc {
    async fn all_contract_state(
        &self,
        request: &QueryAllContractStateRequest,
    ) -> Result<QueryAllContractStateResponse, AppError> {
        let value = self
            .abci_query(ALL_CONTRACT_STATE_PATH, &request.encode_to_vec())
            .await?;

        QueryAllContractStateResponse::decode(value.as_slice())
            .map_err(|e| AppError::Decode(format!("AllContractState response: {e}")))
    }
}

fn extract_value(response: RpcResponse) -> Result<Vec<u8>, AppError> {
    if let Some(error) = response.error {
        return Err(AppError::Rpc(format!(
            "RPC error {}: {}{}",
            error.code,
            error.message,
            error.data.map(|d| format!(" ({d})")).unwrap_or_default()
        )));
    }

    let result = response
        .result
        .ok_or_else(|| AppError::Rpc("no result in response".into()))?;

    if result.response.code != 0 {
        return Err(AppError::Rpc(format!(
            "ABCI query failed with code {}: {}",
            result.response.code, result.response.log
        )));
    }

    match result.response.value {
        Some(value) => STANDARD
            .decode(value)
            .map_err(|e| AppError::Decode(format!("ABCI value is not base64: {e}"))),
        None => Ok(Vec::new()),
    }
}
