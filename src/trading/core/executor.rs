//! Transaction executor seam
//!
//! Signing and broadcasting belong to the wallet; the SDK only hands the
//! executor a contract address, a JSON message and the attached funds.

use crate::constants::BUY_TOKEN_ENTRY_POINT;
use crate::utils::token::to_base_units;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sale contract execute messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdoExecuteMsg {
    BuyToken {},
}

impl IdoExecuteMsg {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            IdoExecuteMsg::BuyToken {} => {
                let mut msg = serde_json::Map::new();
                msg.insert(BUY_TOKEN_ENTRY_POINT.to_string(), serde_json::Value::Object(serde_json::Map::new()));
                serde_json::Value::Object(msg)
            },
        }
    }
}

/// Funds attached to an execute call, in display units of `denom`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funds {
    pub amount: f64,
    pub denom: String,
}

impl Funds {
    pub fn new(amount: f64, denom: impl Into<String>) -> Self {
        Self { amount, denom: denom.into() }
    }

    /// Amount as on-chain integer units
    pub fn base_units(&self, decimals: u8) -> u128 {
        to_base_units(self.amount, decimals)
    }

    /// Shortest decimal text that round-trips the amount
    pub fn amount_string(&self) -> String {
        format!("{}", self.amount)
    }
}

/// Result of a confirmed execute call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: String,
    #[serde(default)]
    pub height: Option<u64>,
    #[serde(default)]
    pub gas_used: Option<u64>,
}

impl Receipt {
    pub fn new(tx_hash: impl Into<String>) -> Self {
        Self { tx_hash: tx_hash.into(), height: None, gas_used: None }
    }
}

/// Signs and broadcasts a contract execution on behalf of the connected wallet
///
/// A rejected or failed transaction surfaces as `Err`.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    async fn execute(
        &self,
        contract: &str,
        msg: serde_json::Value,
        funds: &Funds,
    ) -> Result<Receipt>;
}
