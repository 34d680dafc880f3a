//! Order type.

/// The kind of order an exchange can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    /// Market order: executes immediately at the best available price.
    Market,
    /// Limit order: executes at `price` or better.
    Limit,
    /// Stop-loss order, executed as a market order once `stop_price` is hit.
    StopLossMarket,
    /// Stop-loss order, executed as a limit order once `stop_price` is hit.
    StopLossLimit,
    /// Take-profit order, executed as a market order once `stop_price` is hit.
    TakeProfitMarket,
    /// Take-profit order, executed as a limit order once `stop_price` is hit.
    TakeProfitLimit,
}

impl OrderType {
    /// Whether this order type carries a `stop_price` rather than (or in
    /// addition to, for the `*_LIMIT` variants) a plain `price`.
    #[must_use]
    pub const fn is_stop_style(self) -> bool {
        matches!(
            self,
            Self::StopLossMarket
                | Self::StopLossLimit
                | Self::TakeProfitMarket
                | Self::TakeProfitLimit
        )
    }

    /// Whether this order type adopts the candle close as its price rather
    /// than carrying a caller-supplied `price`.
    #[must_use]
    pub const fn is_market(self) -> bool {
        matches!(self, Self::Market)
    }
}
