//! Funding tokens accepted by the sale contracts
//!
//! Denoms are the on-chain bank denominations on Juno; IBC assets use their
//! hashed trace denom.

/// Native JUNO
pub const JUNO_DENOM: &str = "ujuno";

/// ATOM over IBC (channel-1 on Juno)
pub const ATOM_DENOM: &str =
    "ibc/C4CFF46FD6DE35CA4CF4CE031E643C8FDC9BA4B99AE598E9B0ED98FE3A2319F9";

/// Axelar USDC over IBC
pub const USDC_DENOM: &str =
    "ibc/EAC38D55372F38F1AFD68DF7FE9EF762DCF69F26520643CF3F9D292A738D8034";

/// (denom, symbol, decimals) for every token the swap widget offers
pub const KNOWN_FUNDING_TOKENS: [(&str, &str, u8); 3] =
    [(JUNO_DENOM, "JUNO", 6), (ATOM_DENOM, "ATOM", 6), (USDC_DENOM, "USDC", 6)];

/// Precision assumed for a token the catalog does not know
pub const DEFAULT_TOKEN_DECIMALS: u8 = 6;
