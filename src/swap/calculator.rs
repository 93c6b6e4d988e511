//! Linked origin/target amounts
//!
//! One side is set by the user, the other is derived through the current
//! `ExchangeRatio`. Ratio changes always re-derive `target` from `origin`.
//! Listeners registered with `subscribe` see every state change.

use super::amount::{ExchangeRatio, QuickFill, SwapAmount, SwapSide};
use crate::common::{SwapError, SwapResult};
use crate::utils::token::round_to_decimals;
use tracing::trace;

pub type SwapListener = Box<dyn Fn(&SwapAmount) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct ExchangeCalculator {
    amount: SwapAmount,
    ratio: ExchangeRatio,
    available_balance: f64,
    /// Decimals the derived side is rounded to, `None` keeps full precision
    round_to: Option<u8>,
    listeners: Vec<(SubscriptionId, SwapListener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for ExchangeCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeCalculator")
            .field("amount", &self.amount)
            .field("ratio", &self.ratio)
            .field("available_balance", &self.available_balance)
            .field("round_to", &self.round_to)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ExchangeCalculator {
    pub fn new(ratio: ExchangeRatio) -> Self {
        Self {
            amount: SwapAmount::default(),
            ratio,
            available_balance: 0.0,
            round_to: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn amount(&self) -> SwapAmount {
        self.amount
    }

    pub fn ratio(&self) -> ExchangeRatio {
        self.ratio
    }

    pub fn available_balance(&self) -> f64 {
        self.available_balance
    }

    /// Balance used by percentage fills; negative or non-finite values count as zero
    pub fn set_available_balance(&mut self, balance: f64) {
        self.available_balance = if balance.is_finite() && balance > 0.0 { balance } else { 0.0 };
    }

    pub fn set_rounding(&mut self, decimals: Option<u8>) {
        self.round_to = decimals;
    }

    fn derive(&self, value: f64) -> f64 {
        match self.round_to {
            Some(decimals) => round_to_decimals(value, decimals),
            None => value,
        }
    }

    /// Set `side` to `value` and derive the other side. Negative or
    /// non-finite values are dropped without touching state. Returns whether
    /// the value was accepted.
    pub fn set_amount(&mut self, side: SwapSide, value: f64) -> bool {
        if !value.is_finite() || value < 0.0 {
            trace!(?side, value, "rejected amount");
            return false;
        }
        self.amount = match side {
            SwapSide::Origin => SwapAmount {
                origin: value,
                target: self.derive(self.ratio.forward(value)),
                authoritative: SwapSide::Origin,
            },
            SwapSide::Target => SwapAmount {
                origin: self.derive(self.ratio.inverse(value)),
                target: value,
                authoritative: SwapSide::Target,
            },
        };
        self.notify();
        true
    }

    /// Text entry point. Empty text counts as zero; anything that is not a
    /// plain non-negative decimal leaves both sides unchanged.
    pub fn set_amount_text(&mut self, side: SwapSide, text: &str) -> bool {
        match parse_amount(text) {
            Some(value) => self.set_amount(side, value),
            None => {
                trace!(?side, text, "ignored non-numeric input");
                false
            },
        }
    }

    /// Re-derive `target` from the current `origin`; `origin` is left as is
    pub fn on_ratio_changed(&mut self, ratio: ExchangeRatio) {
        self.ratio = ratio;
        let origin = self.amount.origin;
        self.amount = SwapAmount {
            origin,
            target: self.derive(ratio.forward(origin)),
            authoritative: SwapSide::Origin,
        };
        self.notify();
    }

    /// Fill `origin` with a share of the available balance
    ///
    /// # Arguments
    /// * `fraction` - Share of the balance, within `0.0..=1.0`
    ///
    /// # Errors
    /// `InvalidFraction` outside that range; both sides stay unchanged.
    pub fn set_from_percent(&mut self, fraction: f64) -> SwapResult<()> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(SwapError::InvalidFraction(fraction));
        }
        self.set_amount(SwapSide::Origin, self.available_balance * fraction);
        Ok(())
    }

    pub fn quick_fill(&mut self, fill: QuickFill) {
        // QuickFill fractions are always within 0..=1
        let _ = self.set_from_percent(fill.fraction());
    }

    pub fn reset(&mut self) {
        self.amount = SwapAmount::default();
        self.notify();
    }

    pub fn subscribe(&mut self, listener: impl Fn(&SwapAmount) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false when `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.amount);
        }
    }
}

/// Parse user-typed decimal text
pub fn parse_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    // f64::from_str also takes "inf"/"nan"; only digits, one dot and an exponent are input
    if !trimmed.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')) {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => None,
    }
}
