//! Trade type.

/// Directional bias of a trade.
///
/// `Short` is accepted at the data-model level (trades can be tagged with it)
/// but rejected at runtime by `processOrderUpdate` — short-selling is a
/// Non-goal of this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeType {
    /// Long trade: enter by buying, exit by selling.
    Long,
    /// Short trade: unsupported, rejected at runtime.
    Short,
}
