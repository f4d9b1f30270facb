//! Built-in privacy rules.

pub mod catalog;
pub mod tenant;
pub mod viewer;

pub use tenant::{deny_mismatched_tenants, filter_tenant_rule, DenyMismatchedTenants};
pub use viewer::{allow_if_admin, deny_if_no_viewer};
