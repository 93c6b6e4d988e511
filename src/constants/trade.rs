/// Executor calls longer than this are reported as timed out
pub const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 60;

/// Fraction digits shown for balances and rates
pub const DISPLAY_FRACTION_DIGITS: usize = 2;

/// Tolerance used when comparing derived `f64` amounts
pub const AMOUNT_EPSILON: f64 = 1e-9;

/// Contract entry point invoked by a purchase
pub const BUY_TOKEN_ENTRY_POINT: &str = "buy_token";
