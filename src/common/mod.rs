pub mod error;
pub mod types;

pub use error::{SubmitError, SubmitResult, SwapError, SwapResult};
pub use types::{CallbackExecutionMode, PrecisionPolicy, SALE_CONFIG_ENV, SaleConfig, SwapConfig};

pub type AnyResult<T> = anyhow::Result<T>;
