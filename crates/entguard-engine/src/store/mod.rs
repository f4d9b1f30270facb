//! Store collaborator: storage backends and the client that guards them.

pub mod client;
pub mod memory;
pub mod storage;

pub use client::{Client, EngineSettings};
pub use memory::MemoryStorage;
pub use storage::Storage;
