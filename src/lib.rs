//! Order and trade lifecycle engine for an algorithmic crypto-trading platform.
//!
//! Given signals produced by pluggable strategies over a stream of candlestick
//! market data, the engine opens logical [`domain::order_execution::aggregate::Trade`]s,
//! issues one or more exchange [`domain::order_execution::aggregate::Order`]s per trade,
//! tracks each order through a multi-phase lifecycle spanning internal persistence
//! and external exchange acknowledgement, and closes trades according to
//! configurable close strategies while computing realised profit/loss.
//!
//! Strategy evaluation, exchange transport, candle sourcing, database
//! connection management, and configuration loading are external
//! collaborators; see [`application::ports`] for their contracts.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use config::EngineConfig;
pub use error::EngineError;
