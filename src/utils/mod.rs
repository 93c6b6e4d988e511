pub mod token;

pub use token::{
    BalanceBook, BalanceFeed, TokenCatalog, TokenInfo, format_amount, raw_to_display,
    round_to_decimals, to_base_units,
};
