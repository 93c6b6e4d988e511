//! Submission gate
//!
//! Checks, in order: empty amount, sale not started, sale ended. Only then is
//! the executor called, at most once per attempt and never concurrently.

use super::executor::{Funds, IdoExecuteMsg, Receipt, TransactionExecutor};
use crate::common::{CallbackExecutionMode, SubmitError, SubmitResult, SwapConfig};
use crate::status::SalePhase;
use crate::swap::SwapAmount;
use crate::trading::common::guard::SubmissionGuard;
use crate::trading::lifecycle::{CallbackRef, PurchaseContext};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Snapshot of the widget state taken when the user presses buy
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    pub sale_id: String,
    pub contract: String,
    pub denom: String,
    /// Precision of `denom`, used for the on-chain amount in logs
    pub decimals: u8,
    pub amount: SwapAmount,
    pub phase: SalePhase,
}

pub struct SubmissionGate {
    executor: Arc<dyn TransactionExecutor>,
    on_purchase_confirmed: Option<CallbackRef>,
    callback_execution_mode: CallbackExecutionMode,
    submit_timeout: Option<Duration>,
    in_flight: AtomicBool,
}

impl SubmissionGate {
    pub fn new(executor: Arc<dyn TransactionExecutor>, config: &SwapConfig) -> Self {
        Self {
            executor,
            on_purchase_confirmed: None,
            callback_execution_mode: config.callback_execution_mode,
            submit_timeout: config.submit_timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn set_callback(&mut self, callback: Option<CallbackRef>) {
        self.on_purchase_confirmed = callback;
    }

    /// True while an executor call is outstanding; hosts disable the buy button
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Pre-submission checks, no side effects
    pub fn validate(amount: &SwapAmount, phase: SalePhase) -> SubmitResult<()> {
        if amount.is_empty() {
            return Err(SubmitError::EmptyAmount);
        }
        match phase {
            SalePhase::Before => Err(SubmitError::NotStarted),
            SalePhase::Ended => Err(SubmitError::SaleEnded),
            SalePhase::Active => Ok(()),
        }
    }

    /// Run one purchase attempt
    ///
    /// # Arguments
    /// * `request` - Snapshot of amounts, funding token and phase
    ///
    /// # Returns
    /// The receipt on confirmation. The completion callback runs after the
    /// in-flight flag is released; its failure is only logged.
    pub async fn submit(&self, request: PurchaseRequest) -> SubmitResult<Receipt> {
        if let Err(e) = Self::validate(&request.amount, request.phase) {
            info!(sale = %request.sale_id, reason = %e, "purchase rejected before submission");
            return Err(e);
        }
        let guard = SubmissionGuard::acquire(&self.in_flight).inspect_err(|_| {
            warn!(sale = %request.sale_id, "purchase already in flight, ignoring submit");
        })?;

        let funds = Funds::new(request.amount.origin, request.denom.clone());
        let msg = IdoExecuteMsg::BuyToken {}.to_json();
        info!(
            sale = %request.sale_id,
            contract = %request.contract,
            denom = %funds.denom,
            origin = %funds.amount_string(),
            base_units = %funds.base_units(request.decimals),
            target = request.amount.target,
            "submitting purchase"
        );

        let call = self.executor.execute(&request.contract, msg, &funds);
        let outcome = match self.submit_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    error!(sale = %request.sale_id, ?limit, "transaction executor timed out");
                    return Err(SubmitError::ExecutorTimeout(limit));
                },
            },
            None => call.await,
        };
        drop(guard);

        let receipt = match outcome {
            Ok(receipt) => receipt,
            Err(e) => {
                error!(sale = %request.sale_id, error = %format!("{e:#}"), "purchase failed");
                return Err(SubmitError::ExecutorFailure(format!("{e:#}")));
            },
        };
        info!(sale = %request.sale_id, tx_hash = %receipt.tx_hash, "purchase confirmed");

        if let Some(callback) = &self.on_purchase_confirmed {
            let context = PurchaseContext::new(
                request.sale_id,
                request.contract,
                funds,
                request.amount.target,
                receipt.clone(),
            );
            debug!(context = %context.to_json(), "running purchase callback");
            self.run_callback(callback.clone(), context).await;
        }
        Ok(receipt)
    }

    async fn run_callback(&self, callback: CallbackRef, context: PurchaseContext) {
        let spawn_handle = match self.callback_execution_mode {
            CallbackExecutionMode::Async => tokio::runtime::Handle::try_current().ok(),
            CallbackExecutionMode::Sync => None,
        };
        match spawn_handle {
            Some(handle) => {
                handle.spawn(async move {
                    if let Err(e) = callback.on_purchase_confirmed(context).await {
                        warn!("[Callback Error] on_purchase_confirmed failed (Async mode): {:?}", e);
                    }
                });
            },
            None => {
                if let Err(e) = callback.on_purchase_confirmed(context).await {
                    warn!("[Callback Error] on_purchase_confirmed failed (Sync mode): {:?}", e);
                }
            },
        }
    }
}

/// User-facing outcome message, the replacement for toast side effects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(&'static str),
    Error(&'static str),
}

impl Notification {
    pub fn from_outcome(outcome: &SubmitResult<Receipt>) -> Self {
        match outcome {
            Ok(_) => Notification::Success("Successfully Buy!"),
            Err(e) => Notification::Error(e.user_message()),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notification::Success(m) | Notification::Error(m) => m,
        }
    }
}
