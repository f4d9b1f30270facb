//! entguard engine library entry.
//!
//! This crate wires rule chains, per-entity policies, the built-in rule
//! library and a narrow store client into one privacy layer. It is consumed
//! by the `entguard-check` binary and by integration tests.

pub mod config;
pub mod obs;
pub mod privacy;
pub mod rules;
pub mod schema;
pub mod store;

pub use privacy::{Policy, PolicyRegistry};
pub use store::{Client, MemoryStorage};
