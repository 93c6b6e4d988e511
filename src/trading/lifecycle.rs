//! Purchase lifecycle callback
//!
//! Lets the host page react to a confirmed purchase, e.g. refresh balances
//! or the sale status.

use crate::trading::core::executor::{Funds, Receipt};
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

/// Hook invoked once per confirmed purchase
///
/// An `Err` is logged and never turns the purchase into a failure.
pub trait PurchaseCallback: Send + Sync {
    fn on_purchase_confirmed(&self, context: PurchaseContext) -> futures::future::BoxFuture<'static, Result<()>>;
}

/// Everything known about a confirmed purchase
#[derive(Debug, Clone)]
pub struct PurchaseContext {
    pub sale_id: String,
    pub contract: String,
    pub funds: Funds,
    /// Sale-token amount shown to the buyer when submitting
    pub expected_target: f64,
    pub receipt: Receipt,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl PurchaseContext {
    pub fn new(
        sale_id: String,
        contract: String,
        funds: Funds,
        expected_target: f64,
        receipt: Receipt,
    ) -> Self {
        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_else(|e| {
                warn!("system clock before unix epoch: {}, using 0", e);
                std::time::Duration::from_secs(0)
            })
            .as_millis() as u64;

        Self { sale_id, contract, funds, expected_target, receipt, timestamp_ms }
    }

    /// JSON form for logs and audit sinks
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "sale_id": self.sale_id,
            "contract": self.contract,
            "denom": self.funds.denom,
            "amount": self.funds.amount,
            "expected_target": self.expected_target,
            "tx_hash": self.receipt.tx_hash,
            "height": self.receipt.height,
            "timestamp_ms": self.timestamp_ms,
        })
    }
}

/// Callback that does nothing
#[derive(Clone)]
pub struct NoopCallback;

impl PurchaseCallback for NoopCallback {
    fn on_purchase_confirmed(&self, _context: PurchaseContext) -> futures::future::BoxFuture<'static, Result<()>> {
        Box::pin(async { Ok(()) })
    }
}

pub type CallbackRef = Arc<dyn PurchaseCallback>;
