//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator the governance engine consumes (clock, ownership
//! registry, asset market, payout) is abstracted behind a trait. This crate
//! provides in-memory implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (advance time, mint, fail the next call)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and simulations.

pub mod clock;
pub mod market;
pub mod payout;
pub mod registry;

pub use clock::NullClock;
pub use market::NullMarket;
pub use payout::NullPayout;
pub use registry::NullRegistry;
