//! Legal state transitions, represented as data rather than scattered
//! conditionals, so invariant tests and audit logs can walk the table.

use crate::domain::order_execution::value_objects::OrderState;

/// All legal `(from, to)` order-state edges.
///
/// OPEN_PENDING_INT -> OPEN_PENDING_EXT -> OPENED -> { PARTIALLY_FILLED ->
/// FILLED, FILLED } and the cancel side OPENED -> CANCEL_PENDING_INT ->
/// CANCEL_PENDING_EXT -> { CANCELED, REJECTED, EXPIRED }, plus the error
/// edges OPEN_PENDING_INT -> OPEN_FAILED and CANCEL_PENDING_INT ->
/// CANCEL_FAILED.
pub const ORDER_TRANSITIONS: &[(OrderState, OrderState)] = &[
    (OrderState::OpenPendingInt, OrderState::OpenPendingExt),
    (OrderState::OpenPendingInt, OrderState::OpenFailed),
    (OrderState::OpenPendingExt, OrderState::Opened),
    (OrderState::OpenPendingExt, OrderState::Filled),
    (OrderState::Opened, OrderState::PartiallyFilled),
    (OrderState::Opened, OrderState::Filled),
    (OrderState::Opened, OrderState::CancelPendingInt),
    (OrderState::Opened, OrderState::Rejected),
    (OrderState::Opened, OrderState::Expired),
    (OrderState::PartiallyFilled, OrderState::PartiallyFilled),
    (OrderState::PartiallyFilled, OrderState::Filled),
    (OrderState::PartiallyFilled, OrderState::CancelPendingInt),
    (OrderState::CancelPendingInt, OrderState::CancelPendingExt),
    (OrderState::CancelPendingInt, OrderState::CancelFailed),
    (OrderState::CancelPendingExt, OrderState::Canceled),
    (OrderState::CancelPendingExt, OrderState::Rejected),
    (OrderState::CancelPendingExt, OrderState::Expired),
];

/// Whether `from -> to` is a legal order transition per [`ORDER_TRANSITIONS`].
#[must_use]
pub fn is_valid_order_transition(from: OrderState, to: OrderState) -> bool {
    from == to && matches!(from, OrderState::PartiallyFilled)
        || ORDER_TRANSITIONS.contains(&(from, to))
}
