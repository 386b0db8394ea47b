use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// A single-denomination balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub amount: BigInt,
    pub denom: String,
}

impl Coin {
    pub fn new(amount: impl Into<BigInt>, denom: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            denom: denom.into(),
        }
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Shape of an account identifier stored inside a map key.
#[derive(Debug, Deserialize)]
struct IdentifierPayload {
    addr: String,
}

/// String key recovered from contract storage, e.g. `{"addr":"osmo1..."}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountIdentifier(String);

impl AccountIdentifier {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the identifier as JSON and return the embedded address.
    pub fn address(&self) -> Result<String, serde_json::Error> {
        let payload: IdentifierPayload = serde_json::from_str(&self.0)?;
        Ok(payload.addr)
    }
}

impl std::fmt::Display for AccountIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Smart queries issued against the Red Bank contract for a single user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    UserDebts,
    UserCollaterals,
    UserPositionLiquidationPricing,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::UserDebts => "user_debts",
            QueryKind::UserCollaterals => "user_collaterals",
            QueryKind::UserPositionLiquidationPricing => "user_position_liquidation_pricing",
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate view returned by `user_position_liquidation_pricing`.
///
/// `health_status` is kept as raw JSON: the contract returns either a bare
/// string (`"not_borrowing"`) or an object carrying the health factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub health_status: serde_json::Value,
    pub total_collateralized_debt: String,
    pub total_enabled_collateral: String,
}
