//! Protobuf messages for `cosmwasm.wasm.v1.Query/AllContractState`.

/// ABCI path of the full contract-state query.
pub const ALL_CONTRACT_STATE_PATH: &str = "/cosmwasm.wasm.v1.Query/AllContractState";

#[derive(Clone, PartialEq, prost::Message)]
pub struct QueryAllContractStateRequest {
    /// Address of the contract
    #[prost(string, tag = "1")]
    pub address: String,
    #[prost(message, optional, tag = "2")]
    pub pagination: Option<PageRequest>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct QueryAllContractStateResponse {
    #[prost(message, repeated, tag = "1")]
    pub models: Vec<Model>,
    #[prost(message, optional, tag = "2")]
    pub pagination: Option<PageResponse>,
}

/// A single raw storage entry of the contract.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Model {
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PageRequest {
    /// `next_key` from the previous page. Only one of key or offset is set.
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub offset: u64,
    #[prost(uint64, tag = "3")]
    pub limit: u64,
    #[prost(bool, tag = "4")]
    pub count_total: bool,
    #[prost(bool, tag = "5")]
    pub reverse: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PageResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub next_key: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub total: u64,
}

impl QueryAllContractStateResponse {
    /// Key to continue from, if the node reported more entries.
    pub fn next_key(&self) -> Option<&[u8]> {
        self.pagination
            .as_ref()
            .map(|p| p.next_key.as_slice())
            .filter(|k| !k.is_empty())
    }
}

impl PageRequest {
    pub fn page(key: Vec<u8>, limit: u64) -> Self {
        Self {
            key,
            limit,
            ..Default::default()
        }
    }
}
