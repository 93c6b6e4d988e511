use crate::common::error::{SwapError, SwapResult};
use crate::status::SaleSchedule;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the path of the sale config file
pub const SALE_CONFIG_ENV: &str = "IDO_SALE_CONFIG";

/// Catalog entry for one token sale
///
/// Loaded from the marketplace's sale list; replaces the loosely typed
/// option object the widget used to receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleConfig {
    /// Sale identifier used by the status feed
    pub id: String,
    /// Address of the sale contract that receives `buy_token`
    pub contract: String,
    /// Symbol of the token being sold
    pub symbol: String,
    /// Optional start/end window; when absent the status feed alone drives the phase
    #[serde(default)]
    pub schedule: Option<SaleSchedule>,
}

impl SaleConfig {
    pub fn new(id: impl Into<String>, contract: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self { id: id.into(), contract: contract.into(), symbol: symbol.into(), schedule: None }
    }

    pub fn with_schedule(mut self, schedule: SaleSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Parse a single sale entry from JSON
    pub fn from_json_str(raw: &str) -> SwapResult<Self> {
        let config: SaleConfig =
            serde_json::from_str(raw).map_err(|e| SwapError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a sale entry from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> SwapResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SwapError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    /// Load the sale entry named by `IDO_SALE_CONFIG`
    pub fn from_env() -> SwapResult<Self> {
        let path = std::env::var(SALE_CONFIG_ENV)
            .map_err(|_| SwapError::Config(format!("{} is not set", SALE_CONFIG_ENV)))?;
        Self::from_file(path)
    }

    pub fn validate(&self) -> SwapResult<()> {
        if self.id.trim().is_empty() {
            return Err(SwapError::Config("sale id is empty".to_string()));
        }
        if self.contract.trim().is_empty() {
            return Err(SwapError::Config(format!("sale {} has no contract address", self.id)));
        }
        if let Some(schedule) = &self.schedule {
            if schedule.end <= schedule.start {
                return Err(SwapError::Config(format!(
                    "sale {} ends ({}) before it starts ({})",
                    self.id, schedule.end, schedule.start
                )));
            }
        }
        Ok(())
    }
}

/// How the completion callback runs after a confirmed purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackExecutionMode {
    /// Spawned on the tokio runtime, `submit()` returns without waiting (default)
    #[default]
    Async,
    /// Awaited before `submit()` returns
    Sync,
}

/// Whether derived amounts are rounded to the funding token's precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecisionPolicy {
    /// Keep the full `f64` result of the multiply/divide
    #[default]
    Unrounded,
    /// Round the derived side to the funding token's decimals
    RoundToDisplay,
}

#[derive(Debug, Clone)]
pub struct SwapConfig {
    pub precision_policy: PrecisionPolicy,
    /// Upper bound for a single executor call; `None` waits indefinitely
    pub submit_timeout: Option<Duration>,
    pub callback_execution_mode: CallbackExecutionMode,
    /// Zero both amounts after a confirmed purchase
    pub reset_after_purchase: bool,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SwapConfig {
    pub fn new() -> Self {
        Self {
            precision_policy: PrecisionPolicy::Unrounded,
            submit_timeout: Some(Duration::from_secs(crate::constants::DEFAULT_SUBMIT_TIMEOUT_SECS)),
            callback_execution_mode: CallbackExecutionMode::Async,
            reset_after_purchase: true,
        }
    }

    pub fn with_precision_policy(mut self, policy: PrecisionPolicy) -> Self {
        self.precision_policy = policy;
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn with_callback_execution_mode(mut self, mode: CallbackExecutionMode) -> Self {
        self.callback_execution_mode = mode;
        self
    }

    pub fn with_reset_after_purchase(mut self, reset: bool) -> Self {
        self.reset_after_purchase = reset;
        self
    }
}
