//! entguard core: decisions, errors, viewers and the request context.
//!
//! Everything a privacy rule reads or returns lives here. The crate has no
//! runtime or storage dependencies, so rules can be checked against plain
//! values.
//!
//! `panic`, `unwrap` and `expect` are denied by clippy in this crate. Every
//! `GuardError` converts into `Decision::Deny`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod context;
pub mod decision;
pub mod error;
pub mod viewer;

pub use context::RequestCtx;
pub use decision::Decision;
/// Shared result type.
pub use error::{GuardError, Result};
pub use viewer::{Role, TenantId, UserViewer, Viewer};
