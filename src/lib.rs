pub mod common;
pub mod constants;
pub mod status;
pub mod swap;
pub mod trading;
pub mod utils;

pub use crate::common::{
    CallbackExecutionMode, PrecisionPolicy, SALE_CONFIG_ENV, SaleConfig, SubmitError, SubmitResult,
    SwapConfig, SwapError, SwapResult,
};
use crate::constants::{DISPLAY_FRACTION_DIGITS, JUNO_DENOM};
pub use crate::status::{SalePhase, SaleSchedule, SaleStatus, SaleStatusFeed};
use crate::swap::ExchangeCalculator;
pub use crate::swap::{ExchangeRatio, QuickFill, SubscriptionId, SwapAmount, SwapSide};
pub use crate::trading::{
    CallbackRef, Funds, NoopCallback, Notification, PurchaseCallback, PurchaseContext, Receipt,
    TransactionExecutor,
};
use crate::trading::{PurchaseRequest, SubmissionGate};
use crate::utils::token::{BalanceBook, format_amount};
pub use crate::utils::token::{BalanceFeed, TokenCatalog, TokenInfo};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Mutable widget state, always updated under one lock
struct SwapState {
    selected: TokenInfo,
    status: SaleStatus,
    calculator: ExchangeCalculator,
}

/// Swap client for a single token sale
///
/// `IdoSwapClient` owns the linked swap amounts for one sale, tracks the
/// selected funding token with its balance and ratio, and gates purchase
/// submission on the sale phase. Wallet signing stays behind the
/// `TransactionExecutor` supplied by the host.
///
/// Listeners registered with `subscribe` run while the client state is
/// locked and must not call back into the client.
pub struct IdoSwapClient {
    sale: SaleConfig,
    config: SwapConfig,
    catalog: Arc<TokenCatalog>,
    balances: BalanceBook,
    state: Mutex<SwapState>,
    gate: SubmissionGate,
}

impl IdoSwapClient {
    /// Client with the known funding tokens, JUNO selected
    pub fn new(
        sale: SaleConfig,
        config: SwapConfig,
        executor: Arc<dyn TransactionExecutor>,
        status: SaleStatus,
    ) -> SwapResult<Self> {
        Self::with_catalog(
            sale,
            config,
            executor,
            status,
            Arc::new(TokenCatalog::with_known_tokens()),
            JUNO_DENOM,
        )
    }

    /// Creates a client for `sale` with an explicit token catalog
    ///
    /// # Arguments
    /// * `sale` - Catalog entry of the sale; validated here
    /// * `config` - Rounding, timeout and callback settings
    /// * `executor` - Wallet-side transaction executor
    /// * `status` - Initial sale status, must carry a ratio for `denom`
    /// * `catalog` - Funding tokens the selector offers
    /// * `denom` - Initially selected funding token
    pub fn with_catalog(
        sale: SaleConfig,
        config: SwapConfig,
        executor: Arc<dyn TransactionExecutor>,
        status: SaleStatus,
        catalog: Arc<TokenCatalog>,
        denom: &str,
    ) -> SwapResult<Self> {
        sale.validate()?;
        let selected = catalog.get(denom)?;
        let ratio = status.ratio_for(denom)?;

        let mut calculator = ExchangeCalculator::new(ratio);
        calculator.set_rounding(rounding_for(&config, &selected));
        let gate = SubmissionGate::new(executor, &config);

        info!(sale = %sale.id, denom, %ratio, "swap client ready");
        Ok(Self {
            sale,
            config,
            catalog,
            balances: BalanceBook::new(),
            state: Mutex::new(SwapState { selected, status, calculator }),
            gate,
        })
    }

    pub fn with_purchase_callback(mut self, callback: CallbackRef) -> Self {
        self.gate.set_callback(Some(callback));
        self
    }

    pub fn sale(&self) -> &SaleConfig {
        &self.sale
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TokenCatalog {
        &self.catalog
    }

    pub fn amounts(&self) -> SwapAmount {
        self.state.lock().calculator.amount()
    }

    pub fn ratio(&self) -> ExchangeRatio {
        self.state.lock().calculator.ratio()
    }

    pub fn selected_token(&self) -> TokenInfo {
        self.state.lock().selected.clone()
    }

    /// Balance of the selected token in display units
    pub fn available_balance(&self) -> f64 {
        self.state.lock().calculator.available_balance()
    }

    /// Phase the gate checks against: the feed's phase, moved forward by the
    /// sale schedule when one is configured
    pub fn phase(&self) -> SalePhase {
        let reported = self.state.lock().status.phase;
        self.effective_phase(reported)
    }

    fn effective_phase(&self, reported: SalePhase) -> SalePhase {
        match &self.sale.schedule {
            Some(schedule) => {
                let scheduled = schedule.current_phase();
                if reported.can_advance_to(scheduled) { scheduled } else { reported }
            },
            None => reported,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.gate.is_submitting()
    }

    /// Whether the buy button should be enabled
    pub fn can_purchase(&self) -> bool {
        self.phase().accepts_purchases() && !self.amounts().is_empty() && !self.is_submitting()
    }

    /// Switch the funding token
    ///
    /// # Arguments
    /// * `denom` - Funding token to select; must be in the catalog and carry
    ///   a ratio in the current sale status
    ///
    /// The new ratio re-derives `target` from the current `origin`. On error
    /// (`UnknownToken`, `MissingRatio`) the previous selection stays.
    pub fn select_token(&self, denom: &str) -> SwapResult<()> {
        let token = self.catalog.get(denom)?;
        let balance = self.balances.available(denom, token.decimals);
        let mut state = self.state.lock();
        let ratio = state.status.ratio_for(denom)?;

        debug!(denom, %ratio, balance, "funding token selected");
        state.calculator.set_rounding(rounding_for(&self.config, &token));
        state.calculator.set_available_balance(balance);
        state.selected = token;
        state.calculator.on_ratio_changed(ratio);
        Ok(())
    }

    /// Merge a sale-status snapshot and pick up the selected token's new ratio
    pub fn apply_status(&self, update: SaleStatus) -> SwapResult<()> {
        let mut state = self.state.lock();
        if state.status.apply(update) {
            info!(sale = %self.sale.id, phase = ?state.status.phase, "sale phase changed");
        }
        let denom = state.selected.denom.clone();
        let ratio = match state.status.ratio_for(&denom) {
            Ok(ratio) => ratio,
            Err(e) => {
                warn!(sale = %self.sale.id, denom = %denom, error = %e, "keeping previous ratio");
                return Err(e);
            },
        };
        if ratio != state.calculator.ratio() {
            state.calculator.on_ratio_changed(ratio);
        }
        Ok(())
    }

    /// Replace wallet balances with a fresh snapshot
    pub fn apply_balances(&self, balances: HashMap<String, u128>) {
        self.balances.replace_all(balances);
        let mut state = self.state.lock();
        let balance = self.balances.available(&state.selected.denom, state.selected.decimals);
        state.calculator.set_available_balance(balance);
    }

    /// Pull both feeds concurrently and apply them
    ///
    /// # Arguments
    /// * `status_feed` - Source of the sale phase and per-token ratios
    /// * `balance_feed` - Source of the wallet's raw balances
    ///
    /// Nothing is applied when either feed fails.
    pub async fn refresh(
        &self,
        status_feed: &dyn SaleStatusFeed,
        balance_feed: &dyn BalanceFeed,
    ) -> anyhow::Result<()> {
        let (status, balances) = futures::future::try_join(
            status_feed.fetch_status(&self.sale.id),
            balance_feed.fetch_balances(),
        )
        .await?;
        self.apply_balances(balances);
        self.apply_status(status)?;
        Ok(())
    }

    pub fn set_amount(&self, side: SwapSide, value: f64) -> bool {
        self.state.lock().calculator.set_amount(side, value)
    }

    pub fn set_amount_text(&self, side: SwapSide, text: &str) -> bool {
        self.state.lock().calculator.set_amount_text(side, text)
    }

    pub fn set_from_percent(&self, fraction: f64) -> SwapResult<()> {
        self.state.lock().calculator.set_from_percent(fraction)
    }

    pub fn quick_fill(&self, fill: QuickFill) {
        self.state.lock().calculator.quick_fill(fill)
    }

    pub fn subscribe(&self, listener: impl Fn(&SwapAmount) + Send + Sync + 'static) -> SubscriptionId {
        self.state.lock().calculator.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.lock().calculator.unsubscribe(id)
    }

    /// "1,234.57 JUNO"
    pub fn balance_label(&self) -> String {
        let state = self.state.lock();
        format!(
            "{} {}",
            format_amount(state.calculator.available_balance(), DISPLAY_FRACTION_DIGITS),
            state.selected.symbol
        )
    }

    /// "1 JUNO = 3 HOPERS"
    pub fn rate_label(&self) -> String {
        let state = self.state.lock();
        format!("1 {} = {} {}", state.selected.symbol, state.calculator.ratio(), self.sale.symbol)
    }

    /// Validate and submit a purchase of the current origin amount
    ///
    /// The amounts and funding token are snapshotted before the executor is
    /// awaited; edits made while the purchase is in flight do not change it.
    ///
    /// # Returns
    /// The executor's receipt, or the first failing check: `EmptyAmount`,
    /// `NotStarted`, `SaleEnded`, then `SubmissionInProgress`,
    /// `ExecutorTimeout` or `ExecutorFailure`. Nothing is retried.
    ///
    /// With `reset_after_purchase` both amounts are zeroed after a confirmed
    /// purchase, unless the user changed them or the token in the meantime.
    pub async fn submit(&self) -> SubmitResult<Receipt> {
        let request = {
            let state = self.state.lock();
            PurchaseRequest {
                sale_id: self.sale.id.clone(),
                contract: self.sale.contract.clone(),
                denom: state.selected.denom.clone(),
                decimals: state.selected.decimals,
                amount: state.calculator.amount(),
                phase: self.effective_phase(state.status.phase),
            }
        };
        if self.config.precision_policy == PrecisionPolicy::Unrounded {
            debug!(origin = request.amount.origin, "funds are not rounded to token precision");
        }
        let submitted = request.amount;
        let submitted_denom = request.denom.clone();

        let receipt = self.gate.submit(request).await?;
        if self.config.reset_after_purchase {
            let mut state = self.state.lock();
            if state.calculator.amount() == submitted && state.selected.denom == submitted_denom {
                state.calculator.reset();
            } else {
                debug!(sale = %self.sale.id, "amounts edited during submission, keeping them");
            }
        }
        Ok(receipt)
    }

    /// `submit()` plus the user-facing message for its outcome
    pub async fn submit_with_notification(&self) -> (SubmitResult<Receipt>, Notification) {
        let outcome = self.submit().await;
        let notification = Notification::from_outcome(&outcome);
        match &outcome {
            Err(e) if e.is_validation() => {
                debug!(sale = %self.sale.id, message = notification.message(), "purchase not submitted")
            },
            Err(_) => warn!(sale = %self.sale.id, message = notification.message(), "purchase failed"),
            Ok(_) => {},
        }
        (outcome, notification)
    }
}

fn rounding_for(config: &SwapConfig, token: &TokenInfo) -> Option<u8> {
    match config.precision_policy {
        PrecisionPolicy::Unrounded => None,
        PrecisionPolicy::RoundToDisplay => Some(token.decimals),
    }
}

impl std::fmt::Debug for IdoSwapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdoSwapClient")
            .field("sale", &self.sale)
            .field("config", &self.config)
            .field("submitting", &self.gate.is_submitting())
            .finish()
    }
}
