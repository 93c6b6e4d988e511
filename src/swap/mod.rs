pub mod amount;
pub mod calculator;

pub use amount::{ExchangeRatio, QuickFill, SwapAmount, SwapSide};
pub use calculator::{ExchangeCalculator, SubscriptionId, SwapListener, parse_amount};
