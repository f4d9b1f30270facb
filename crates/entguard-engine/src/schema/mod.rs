//! Entity types guarded by the privacy layer.
//!
//! Each entity exposes a filter, a query builder and a mutation descriptor.
//! Builders consult the entity's policy before they touch storage.

pub mod group;
pub mod tenant;
pub mod user;

pub use group::{Group, GroupFilter, GroupMutation};
pub use tenant::{Tenant, TenantFilter, TenantMutation};
pub use user::{User, UserFilter, UserMutation};

/// Entity types known to the schema.
pub const ENTITY_TYPES: [&str; 3] = [tenant::ENTITY, user::ENTITY, group::ENTITY];
