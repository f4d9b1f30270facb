//! Top-level facade crate for entguard.
//!
//! Re-exports the core primitives and the privacy engine so users can depend on a single crate.

pub mod core {
    pub use entguard_core::*;
}

pub mod engine {
    pub use entguard_engine::*;
}
