pub mod common;
pub mod core;
pub mod lifecycle;

pub use core::executor::{Funds, IdoExecuteMsg, Receipt, TransactionExecutor};
pub use core::gate::{Notification, PurchaseRequest, SubmissionGate};
pub use lifecycle::{CallbackRef, NoopCallback, PurchaseCallback, PurchaseContext};
