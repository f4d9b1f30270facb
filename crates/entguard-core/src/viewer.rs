//! Acting principal ("viewer") of a request.
//!
//! Viewers are produced by an authentication layer outside this crate and
//! are read-only to privacy rules.

use std::fmt::Debug;

/// Tenant identifier.
pub type TenantId = i64;

/// The authenticated principal attempting an operation.
pub trait Viewer: Debug + Send + Sync {
    /// Whether the viewer may bypass tenant rules.
    fn admin(&self) -> bool;
    /// Tenant the viewer belongs to, if any.
    fn tenant(&self) -> Option<TenantId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    View,
    Admin,
}

/// Viewer backed by an end user session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserViewer {
    pub role: Role,
    pub tenant: Option<TenantId>,
}

impl UserViewer {
    pub fn new_admin(tenant: Option<TenantId>) -> Self {
        Self { role: Role::Admin, tenant }
    }

    pub fn member(tenant: TenantId) -> Self {
        Self { role: Role::View, tenant: Some(tenant) }
    }
}

impl Viewer for UserViewer {
    fn admin(&self) -> bool {
        self.role == Role::Admin
    }

    fn tenant(&self) -> Option<TenantId> {
        self.tenant
    }
}
