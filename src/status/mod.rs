//! Sale phase and exchange ratios reported by the sale-status feed
//!
//! The phase only ever moves `Before -> Active -> Ended`. The feed drives it;
//! the submission gate only reads it.

use crate::common::{AnyResult, SwapError, SwapResult};
use crate::swap::ExchangeRatio;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalePhase {
    #[default]
    Before,
    Active,
    Ended,
}

impl SalePhase {
    fn rank(self) -> u8 {
        match self {
            SalePhase::Before => 0,
            SalePhase::Active => 1,
            SalePhase::Ended => 2,
        }
    }

    /// Forward moves (and staying put) are allowed, regressions are not
    pub fn can_advance_to(self, next: SalePhase) -> bool {
        next.rank() >= self.rank()
    }

    pub fn accepts_purchases(self) -> bool {
        self == SalePhase::Active
    }
}

/// Start/end window of a sale, both inclusive of the active phase start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleSchedule {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SaleSchedule {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn phase_at(&self, now: DateTime<Utc>) -> SalePhase {
        if now < self.start {
            SalePhase::Before
        } else if now < self.end {
            SalePhase::Active
        } else {
            SalePhase::Ended
        }
    }

    pub fn current_phase(&self) -> SalePhase {
        self.phase_at(Utc::now())
    }
}

/// Snapshot from the sale-status feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleStatus {
    /// Sale tokens bought by one unit of each funding token, keyed by denom
    #[serde(default)]
    pub costs: HashMap<String, f64>,
    #[serde(default)]
    pub phase: SalePhase,
}

impl SaleStatus {
    pub fn new(phase: SalePhase) -> Self {
        Self { costs: HashMap::new(), phase }
    }

    pub fn with_cost(mut self, denom: impl Into<String>, ratio: f64) -> Self {
        self.costs.insert(denom.into(), ratio);
        self
    }

    /// Validated ratio for `denom`
    pub fn ratio_for(&self, denom: &str) -> SwapResult<ExchangeRatio> {
        let raw = self
            .costs
            .get(denom)
            .copied()
            .ok_or_else(|| SwapError::MissingRatio(denom.to_string()))?;
        ExchangeRatio::new(raw)
    }

    /// Merge a newer snapshot
    ///
    /// # Arguments
    /// * `update` - Latest snapshot from the feed
    ///
    /// # Returns
    /// True when the phase changed. Ratios are replaced wholesale; a phase
    /// that would move backwards is ignored.
    pub fn apply(&mut self, update: SaleStatus) -> bool {
        self.costs = update.costs;
        if update.phase == self.phase {
            return false;
        }
        if !self.phase.can_advance_to(update.phase) {
            warn!(current = ?self.phase, reported = ?update.phase, "ignoring sale phase regression");
            return false;
        }
        debug!(from = ?self.phase, to = ?update.phase, "sale phase advanced");
        self.phase = update.phase;
        true
    }
}

/// Source of sale status snapshots (contract query, indexer, ...)
#[async_trait]
pub trait SaleStatusFeed: Send + Sync {
    async fn fetch_status(&self, sale_id: &str) -> AnyResult<SaleStatus>;
}
