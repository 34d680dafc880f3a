//! Trade state.

use std::fmt;

/// Lifecycle state of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeState {
    /// Created, entry orders not yet confirmed open.
    OpenPending,
    /// Entry confirmed open by the exchange.
    Opened,
    /// Closed per the close-strategy evaluator or cancellation of all legs. Terminal.
    Closed,
    /// Closing failed. Terminal.
    CloseFailed,
    /// Opening failed. Terminal.
    OpenFailed,
}

impl TradeState {
    /// Whether this state is terminal (the trade is evicted from the live cache).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::CloseFailed | Self::OpenFailed)
    }
}

impl fmt::Display for TradeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
