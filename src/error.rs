//! Crate-wide error type for the order and trade lifecycle engine.
//!
//! One variant per error kind named in the engine's error-handling design:
//! shaping/validation failures, immediate-execution risk, unexpected exchange
//! responses, transport failures, unsupported trade types, and programming
//! errors. `Persistence` and `NotFound` round out the set for the repository
//! contract, which is fallible but not otherwise given a bucket.

use thiserror::Error;

use crate::domain::order_execution::value_objects::{OrderState, TradeType};

/// Errors produced by the lifecycle engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Shaped order failed structural validation against market rules.
    #[error("rule violation: {0}")]
    RuleViolation(String),

    /// A limit-style order would cross immediately against the current candle close.
    #[error("immediate execution risk: {0}")]
    ImmediateExecutionRisk(String),

    /// The exchange responded with an order state the caller did not expect.
    #[error("unexpected exchange response: expected one of {expected:?}, got {actual:?}")]
    ExchangeRejection {
        /// States the caller would have accepted.
        expected: Vec<OrderState>,
        /// State actually reported.
        actual: OrderState,
    },

    /// The exchange client call itself failed (network, auth, timeout, ...).
    #[error("exchange transport failure: {0}")]
    ExchangeTransport(String),

    /// An update was received for a trade whose type the engine does not support.
    #[error("unsupported trade type: {0:?}")]
    UnsupportedTradeType(TradeType),

    /// An order sat in a state the submission pass is not defined for.
    #[error("programming error: order {order_id} in unexpected state {state:?} for submission")]
    Programming {
        /// The offending order's id.
        order_id: u64,
        /// The state the submission pass found it in.
        state: OrderState,
    },

    /// An exchange update reported a state the order's state machine does
    /// not allow from its current state.
    #[error("illegal order transition: order {order_id} {from:?} -> {to:?}")]
    IllegalTransition {
        /// The offending order's id.
        order_id: u64,
        /// The order's state before this update.
        from: OrderState,
        /// The state the update reported.
        to: OrderState,
    },

    /// The repository failed to persist or load a row.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A lookup against the repository found nothing.
    #[error("not found: {0}")]
    NotFound(String),
}
