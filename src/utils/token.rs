//! Token catalog, balances and amount formatting
//!
//! Balances arrive as raw integer amounts and are shown divided by
//! `10^decimals`; the catalog supplies those decimals.

use crate::constants::{DEFAULT_TOKEN_DECIMALS, KNOWN_FUNDING_TOKENS};
use crate::common::{AnyResult, SwapError, SwapResult};
use async_trait::async_trait;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Symbol and precision of a funding token
///
/// A missing or zero `decimals` resolves to `DEFAULT_TOKEN_DECIMALS` once the
/// token enters a `TokenCatalog`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub denom: String,
    pub symbol: String,
    #[serde(default)]
    pub decimals: u8,
}

impl TokenInfo {
    pub fn new(denom: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self { denom: denom.into(), symbol: symbol.into(), decimals }
    }
}

/// Known funding tokens, built once
static KNOWN_TOKENS: Lazy<DashMap<String, TokenInfo>> = Lazy::new(|| {
    let map = DashMap::with_capacity(KNOWN_FUNDING_TOKENS.len());
    for (denom, symbol, decimals) in KNOWN_FUNDING_TOKENS {
        map.insert(denom.to_string(), TokenInfo::new(denom, symbol, decimals));
    }
    map
});

/// Mapping from denom to `TokenInfo` for the tokens a sale accepts
#[derive(Debug, Default)]
pub struct TokenCatalog {
    tokens: DashMap<String, TokenInfo>,
}

impl TokenCatalog {
    pub fn new() -> Self {
        Self { tokens: DashMap::new() }
    }

    /// Catalog preloaded with every known funding token
    pub fn with_known_tokens() -> Self {
        let catalog = Self::new();
        for entry in KNOWN_TOKENS.iter() {
            catalog.insert(entry.value().clone());
        }
        catalog
    }

    /// Add or replace a token; zero decimals fall back to the default precision
    pub fn insert(&self, mut token: TokenInfo) {
        if token.decimals == 0 {
            debug!(denom = %token.denom, "token has no decimals, using default");
            token.decimals = DEFAULT_TOKEN_DECIMALS;
        }
        self.tokens.insert(token.denom.clone(), token);
    }

    /// Catalog from a JSON list of `TokenInfo`
    pub fn from_json_str(raw: &str) -> SwapResult<Self> {
        let tokens: Vec<TokenInfo> =
            serde_json::from_str(raw).map_err(|e| SwapError::Config(e.to_string()))?;
        let catalog = Self::new();
        for token in tokens {
            catalog.insert(token);
        }
        Ok(catalog)
    }

    pub fn get(&self, denom: &str) -> SwapResult<TokenInfo> {
        self.tokens
            .get(denom)
            .map(|t| t.clone())
            .ok_or_else(|| SwapError::UnknownToken(denom.to_string()))
    }

    pub fn contains(&self, denom: &str) -> bool {
        self.tokens.contains_key(denom)
    }

    /// Decimals for `denom`, falling back to the default precision
    pub fn decimals(&self, denom: &str) -> u8 {
        self.tokens.get(denom).map(|t| t.decimals).unwrap_or(DEFAULT_TOKEN_DECIMALS)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Raw integer balances keyed by denom
#[derive(Debug, Default)]
pub struct BalanceBook {
    raw: DashMap<String, u128>,
}

impl BalanceBook {
    pub fn new() -> Self {
        Self { raw: DashMap::new() }
    }

    pub fn set(&self, denom: impl Into<String>, raw_amount: u128) {
        self.raw.insert(denom.into(), raw_amount);
    }

    /// Replace every balance with a fresh snapshot from the feed
    pub fn replace_all(&self, balances: HashMap<String, u128>) {
        self.raw.clear();
        for (denom, amount) in balances {
            self.raw.insert(denom, amount);
        }
        debug!(tokens = self.raw.len(), "balance book refreshed");
    }

    /// Raw balance, zero when the feed has not reported the denom
    pub fn raw(&self, denom: &str) -> u128 {
        self.raw.get(denom).map(|v| *v).unwrap_or(0)
    }

    /// Balance in display units
    pub fn available(&self, denom: &str, decimals: u8) -> f64 {
        raw_to_display(self.raw(denom), decimals)
    }
}

/// Source of wallet balances (bank query, indexer, ...)
#[async_trait]
pub trait BalanceFeed: Send + Sync {
    /// Raw integer balance per denom
    async fn fetch_balances(&self) -> AnyResult<HashMap<String, u128>>;
}

pub fn raw_to_display(raw_amount: u128, decimals: u8) -> f64 {
    raw_amount as f64 / 10f64.powi(decimals as i32)
}

/// Convert display units to on-chain integer units, truncating dust
pub fn to_base_units(amount: f64, decimals: u8) -> u128 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    let scaled = amount * 10f64.powi(decimals as i32);
    let nearest = scaled.round();
    // 0.29 * 1e6 is 289999.99999999994 in f64
    let units = if (scaled - nearest).abs() < 1e-6 { nearest } else { scaled.floor() };
    units as u128
}

/// Round to `decimals` fraction digits; returns `value` as is when the
/// scaled value leaves the finite `f64` range
pub fn round_to_decimals(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// en-US number display with thousands separators and at most
/// `max_fraction_digits` fraction digits, trailing zeros dropped
pub fn format_amount(value: f64, max_fraction_digits: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = format!("{:.*}", max_fraction_digits, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
