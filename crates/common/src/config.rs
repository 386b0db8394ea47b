use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the node's REST gateway used for smart queries
    pub rest_endpoint: String,

    /// Tendermint RPC URL used for the contract state dump
    pub rpc_endpoint: String,

    /// Red Bank contract address
    pub redbank_contract: String,

    /// RPC client timeout in seconds (default: 30)
    pub rpc_timeout_secs: u64,

    /// Width of the map-key length prefixes in bytes, 1 or 2 (default: 2)
    pub key_length_prefix: u8,

    /// Keys shorter than this are never map entries (default: 50)
    pub min_key_len: usize,

    /// Page size for the state dump. Unset means a single unpaginated query.
    pub state_page_limit: Option<u64>,

    /// Per-denom price table, `denom=price,...`
    pub price_table: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key_length_prefix: u8 = lookup("KEY_LENGTH_PREFIX")
            .unwrap_or_else(|| "2".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("KEY_LENGTH_PREFIX must be a valid u8"))?;
        if !matches!(key_length_prefix, 1 | 2) {
            anyhow::bail!("KEY_LENGTH_PREFIX must be 1 or 2, got {key_length_prefix}");
        }

        Ok(Self {
            rest_endpoint: lookup("REST_ENDPOINT")
                .map(|url| url.trim_end_matches('/').to_string())
                .ok_or_else(|| anyhow::anyhow!("REST_ENDPOINT environment variable is required"))?,
            rpc_endpoint: lookup("RPC_ENDPOINT")
                .ok_or_else(|| anyhow::anyhow!("RPC_ENDPOINT environment variable is required"))?,
            redbank_contract: lookup("REDBANK_CONTRACT").ok_or_else(|| {
                anyhow::anyhow!("REDBANK_CONTRACT environment variable is required")
            })?,
            rpc_timeout_secs: lookup("RPC_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RPC_TIMEOUT_SECS must be a valid u64"))?,
            key_length_prefix,
            min_key_len: lookup("MIN_KEY_LEN")
                .unwrap_or_else(|| "50".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MIN_KEY_LEN must be a valid usize"))?,
            state_page_limit: lookup("STATE_PAGE_LIMIT")
                .map(|v| {
                    v.parse()
                        .map_err(|_| anyhow::anyhow!("STATE_PAGE_LIMIT must be a valid u64"))
                })
                .transpose()?,
            price_table: lookup("PRICE_TABLE").filter(|v| !v.trim().is_empty()),
        })
    }
}
