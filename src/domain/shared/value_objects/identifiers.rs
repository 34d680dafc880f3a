//! Monotonic identifiers for trades and orders.
//!
//! Both are assigned by the repository's `add`+`flush` and never reused.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_monotonic_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a repository-assigned id.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// The raw numeric id.
            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

define_monotonic_id!(TradeId, "Monotonic identifier for a trade.");
define_monotonic_id!(OrderId, "Monotonic identifier for an order.");
