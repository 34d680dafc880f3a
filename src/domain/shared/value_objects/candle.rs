//! Candlestick bar, the unit of market data the engine reacts to.
//!
//! Candle data sourcing (live feed, backtest file, DB replay) is an external
//! collaborator; this is just the shape the engine needs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::SymbolPair;

/// An OHLCV bar for one symbol pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candle {
    /// The pair this candle is for.
    pub symbol: SymbolPair,
    /// Closing price of the bar.
    pub close: Decimal,
    /// Timestamp the bar closed at.
    pub close_time: DateTime<Utc>,
}

impl Candle {
    /// Base asset of this candle's symbol pair.
    #[must_use]
    pub fn base_asset(&self) -> &str {
        &self.symbol.base_asset
    }

    /// Quote asset of this candle's symbol pair.
    #[must_use]
    pub fn quote_asset(&self) -> &str {
        &self.symbol.quote_asset
    }
}
