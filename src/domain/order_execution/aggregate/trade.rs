//! The Trade aggregate.

use chrono::{DateTime, Utc};

use crate::domain::order_execution::value_objects::{TradeState, TradeType};
use crate::domain::shared::TradeId;

/// A logical trade: one or more orders opened against a strategy signal and
/// closed together.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    /// Monotonic id, assigned on first persist.
    pub trade_id: Option<TradeId>,
    /// The strategy run that opened this trade.
    pub strategy_exec_id: String,
    /// Base asset of the traded symbol pair.
    pub base_asset: String,
    /// Quote asset of the traded symbol pair.
    pub quote_asset: String,
    /// Long (the only type actually supported at runtime).
    pub trade_type: TradeType,
    /// Current lifecycle state.
    pub trade_state: TradeState,
    /// When the trade was created.
    pub init_tmstmp: DateTime<Utc>,
    /// When the trade was first confirmed `OPENED`.
    pub open_tmstmp: Option<DateTime<Utc>>,
    /// When the trade was closed.
    pub close_tmstmp: Option<DateTime<Utc>>,
}

impl Trade {
    /// Build a new trade in `OPEN_PENDING`, not yet persisted.
    #[must_use]
    pub fn new_pending(
        strategy_exec_id: impl Into<String>,
        trade_type: TradeType,
        base_asset: impl Into<String>,
        quote_asset: impl Into<String>,
        init_tmstmp: DateTime<Utc>,
    ) -> Self {
        Self {
            trade_id: None,
            strategy_exec_id: strategy_exec_id.into(),
            base_asset: base_asset.into(),
            quote_asset: quote_asset.into(),
            trade_type,
            trade_state: TradeState::OpenPending,
            init_tmstmp,
            open_tmstmp: None,
            close_tmstmp: None,
        }
    }

    /// Mark the trade `OPENED` at `at`.
    ///
    /// Idempotent: re-entry leaves `open_tmstmp` untouched.
    pub fn mark_opened(&mut self, at: DateTime<Utc>) {
        if self.trade_state == TradeState::OpenPending {
            self.trade_state = TradeState::Opened;
            self.open_tmstmp = Some(at);
        }
    }
}
