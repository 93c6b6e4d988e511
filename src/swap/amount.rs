use crate::common::{SwapError, SwapResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two linked amount fields an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapSide {
    /// Funding token amount the buyer pays
    Origin,
    /// Sale token amount the buyer receives
    Target,
}

/// Linked pair of amounts; `authoritative` is the side the last edit set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwapAmount {
    pub origin: f64,
    pub target: f64,
    pub authoritative: SwapSide,
}

impl Default for SwapAmount {
    fn default() -> Self {
        Self { origin: 0.0, target: 0.0, authoritative: SwapSide::Origin }
    }
}

impl SwapAmount {
    pub fn is_empty(&self) -> bool {
        self.origin == 0.0
    }
}

/// Sale-token units bought by one funding-token unit. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ExchangeRatio(f64);

impl ExchangeRatio {
    pub fn new(value: f64) -> SwapResult<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(SwapError::InvalidRatio(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// origin -> target
    pub fn forward(self, origin: f64) -> f64 {
        origin * self.0
    }

    /// target -> origin
    pub fn inverse(self, target: f64) -> f64 {
        target / self.0
    }
}

impl TryFrom<f64> for ExchangeRatio {
    type Error = SwapError;

    fn try_from(value: f64) -> SwapResult<Self> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for ExchangeRatio {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        ExchangeRatio::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ExchangeRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Balance shortcuts offered next to the origin input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickFill {
    Quarter,
    Half,
    ThreeQuarters,
    Max,
}

impl QuickFill {
    pub const ALL: [QuickFill; 4] =
        [QuickFill::Quarter, QuickFill::Half, QuickFill::ThreeQuarters, QuickFill::Max];

    pub fn fraction(self) -> f64 {
        match self {
            QuickFill::Quarter => 0.25,
            QuickFill::Half => 0.5,
            QuickFill::ThreeQuarters => 0.75,
            QuickFill::Max => 1.0,
        }
    }
}
