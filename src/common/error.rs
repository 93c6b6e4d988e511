//! Error types for the swap flow
//!
//! `SubmitError` covers everything that can stop a purchase submission,
//! `SwapError` covers bad inputs handed to the client by the host page or feeds.

use std::time::Duration;

/// Submission failures, in the order the gate checks them
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error("swap amount is zero")]
    EmptyAmount,
    #[error("sale has not started")]
    NotStarted,
    #[error("sale has ended")]
    SaleEnded,
    #[error("a purchase is already being submitted")]
    SubmissionInProgress,
    #[error("transaction executor did not answer within {0:?}")]
    ExecutorTimeout(Duration),
    #[error("transaction executor failed: {0}")]
    ExecutorFailure(String),
}

impl SubmitError {
    /// Local validation failures never reach the executor and mutate no state
    pub fn is_validation(&self) -> bool {
        matches!(self, SubmitError::EmptyAmount | SubmitError::NotStarted | SubmitError::SaleEnded)
    }

    /// Text shown to the user for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitError::EmptyAmount => "Invalid amount!",
            SubmitError::NotStarted => "Presale is not started",
            SubmitError::SaleEnded => "Presale is ended",
            SubmitError::SubmissionInProgress => "Purchase is already in progress",
            SubmitError::ExecutorTimeout(_) | SubmitError::ExecutorFailure(_) => "Buying Failed!",
        }
    }
}

/// Invalid input reaching the swap client
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SwapError {
    #[error("exchange ratio must be positive and finite, got {0}")]
    InvalidRatio(f64),
    #[error("fill fraction must be within 0..=1, got {0}")]
    InvalidFraction(f64),
    #[error("unknown funding token: {0}")]
    UnknownToken(String),
    #[error("sale status has no ratio for funding token {0}")]
    MissingRatio(String),
    #[error("invalid sale config: {0}")]
    Config(String),
}

pub type SubmitResult<T> = Result<T, SubmitError>;
pub type SwapResult<T> = Result<T, SwapError>;
