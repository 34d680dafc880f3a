//! Symbol pair value object (e.g. `BTC`/`USDT`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A base/quote asset pair traded on the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolPair {
    /// Base asset, e.g. `BTC`.
    pub base_asset: String,
    /// Quote asset, e.g. `USDT`.
    pub quote_asset: String,
}

impl SymbolPair {
    /// Build a pair from base and quote asset tickers.
    pub fn new(base_asset: impl Into<String>, quote_asset: impl Into<String>) -> Self {
        Self {
            base_asset: base_asset.into(),
            quote_asset: quote_asset.into(),
        }
    }
}

impl fmt::Display for SymbolPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base_asset, self.quote_asset)
    }
}
