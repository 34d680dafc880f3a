//! Port contracts: opaque interfaces the engine depends on but does not implement.

pub mod exchange_client_port;
pub mod repository_port;
pub mod strategy_port;

pub use exchange_client_port::{ExchangeClient, ExchangeResponse};
pub use repository_port::{OrderRepository, TradeRepository};
pub use strategy_port::{StrategyCallback, TradeCloseType};
