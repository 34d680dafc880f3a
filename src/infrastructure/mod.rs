//! Infrastructure layer: adapters for the engine's port contracts.
//!
//! The only adapter shipped here is an in-memory repository, useful for
//! tests and small deployments; a durable backend (Postgres, Turso, ...)
//! implements the same `OrderRepository`/`TradeRepository` traits.

pub mod persistence;
