//! Order state and its persisted integer encoding.
//!
//! The integer codes (1..12) are carried over from the system this engine's
//! behaviour is modelled on and must not be renumbered: existing persisted
//! rows use them.

use std::fmt;

/// Lifecycle state of a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderState {
    /// Created, not yet submitted to the exchange.
    OpenPendingInt,
    /// Submitted to the exchange, awaiting acknowledgement.
    OpenPendingExt,
    /// Submission to the exchange failed. Terminal.
    OpenFailed,
    /// Acknowledged open by the exchange.
    Opened,
    /// Partially filled. Tracked, not accounted for quantity-wise (Non-goal).
    PartiallyFilled,
    /// Fully filled. Terminal.
    Filled,
    /// Cancellation requested, not yet submitted to the exchange.
    CancelPendingInt,
    /// Cancellation submitted to the exchange, awaiting acknowledgement.
    CancelPendingExt,
    /// Cancellation submission to the exchange failed. Terminal.
    CancelFailed,
    /// Canceled by the exchange. Terminal.
    Canceled,
    /// Rejected by the exchange. Terminal.
    Rejected,
    /// Expired at the exchange. Terminal.
    Expired,
}

impl OrderState {
    /// The persisted integer code for this state.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::OpenPendingInt => 1,
            Self::OpenPendingExt => 2,
            Self::OpenFailed => 3,
            Self::Opened => 4,
            Self::PartiallyFilled => 5,
            Self::Filled => 6,
            Self::CancelPendingInt => 7,
            Self::CancelPendingExt => 8,
            Self::CancelFailed => 9,
            Self::Canceled => 10,
            Self::Rejected => 11,
            Self::Expired => 12,
        }
    }

    /// Decode a persisted integer code back into an `OrderState`.
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(Self::OpenPendingInt),
            2 => Some(Self::OpenPendingExt),
            3 => Some(Self::OpenFailed),
            4 => Some(Self::Opened),
            5 => Some(Self::PartiallyFilled),
            6 => Some(Self::Filled),
            7 => Some(Self::CancelPendingInt),
            8 => Some(Self::CancelPendingExt),
            9 => Some(Self::CancelFailed),
            10 => Some(Self::Canceled),
            11 => Some(Self::Rejected),
            12 => Some(Self::Expired),
            _ => None,
        }
    }

    /// Whether an order in this state still counts against its trade's
    /// pending-orders predicate.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(
            self,
            Self::OpenPendingInt
                | Self::OpenPendingExt
                | Self::Opened
                | Self::CancelPendingInt
                | Self::CancelPendingExt
        )
    }

    /// Whether this state is terminal (no further transitions).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::OpenFailed
                | Self::Filled
                | Self::CancelFailed
                | Self::Canceled
                | Self::Rejected
                | Self::Expired
        )
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_roundtrip_covers_all_states() {
        let states = [
            OrderState::OpenPendingInt,
            OrderState::OpenPendingExt,
            OrderState::OpenFailed,
            OrderState::Opened,
            OrderState::PartiallyFilled,
            OrderState::Filled,
            OrderState::CancelPendingInt,
            OrderState::CancelPendingExt,
            OrderState::CancelFailed,
            OrderState::Canceled,
            OrderState::Rejected,
            OrderState::Expired,
        ];
        for state in states {
            assert_eq!(OrderState::from_code(state.code()), Some(state));
        }
        assert_eq!(OrderState::OpenPendingInt.code(), 1);
        assert_eq!(OrderState::Expired.code(), 12);
    }

    #[test]
    fn unknown_code_decodes_to_none() {
        assert_eq!(OrderState::from_code(0), None);
        assert_eq!(OrderState::from_code(13), None);
    }

    #[test]
    fn pending_set_matches_spec() {
        assert!(OrderState::OpenPendingInt.is_pending());
        assert!(OrderState::OpenPendingExt.is_pending());
        assert!(OrderState::Opened.is_pending());
        assert!(OrderState::CancelPendingInt.is_pending());
        assert!(OrderState::CancelPendingExt.is_pending());
        assert!(!OrderState::Filled.is_pending());
        assert!(!OrderState::PartiallyFilled.is_pending());
    }
}
