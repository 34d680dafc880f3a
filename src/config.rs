//! Engine-level configuration.
//!
//! Loading this struct from a file, environment, or CLI flags is an external
//! collaborator's job (deliberately out of scope); the struct itself and its
//! defaults live here.

/// Feature toggles and stable identifiers the engine needs at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Quantise new order `qty`/`price`/`stop_price` to the exchange-legal grid.
    pub shape_new_orders: bool,
    /// Run structural validation (qty/price bounds, denomination, notional).
    pub validate_orders: bool,
    /// Reject limit-style orders that would cross immediately against the candle close.
    pub prevent_immediate_limit_order: bool,
    /// Prefix prepended to the decimal `order_id` to form `int_order_ref`.
    ///
    /// Must stay stable across restarts for a given deployment: it is the
    /// exchange-facing deduplication key.
    pub order_reference_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shape_new_orders: true,
            validate_orders: true,
            prevent_immediate_limit_order: true,
            order_reference_prefix: "ENG-".to_string(),
        }
    }
}
