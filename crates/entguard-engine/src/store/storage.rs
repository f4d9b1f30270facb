use async_trait::async_trait;

use entguard_core::error::Result;
use entguard_core::TenantId;

use crate::schema::{Group, GroupFilter, Tenant, TenantFilter, User, UserFilter};

/// Row storage behind the client. Implementations apply filters verbatim;
/// all privacy decisions are taken before a call reaches this trait.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn select_tenants(&self, filter: &TenantFilter) -> Result<Vec<Tenant>>;
    async fn select_users(&self, filter: &UserFilter) -> Result<Vec<User>>;
    async fn select_groups(&self, filter: &GroupFilter) -> Result<Vec<Group>>;

    async fn insert_tenant(&self, name: String) -> Result<Tenant>;
    async fn insert_user(&self, name: String, tenant_id: Option<TenantId>) -> Result<User>;
    async fn insert_group(
        &self,
        name: String,
        tenant_id: TenantId,
        user_ids: Vec<i64>,
    ) -> Result<Group>;

    async fn delete_groups(&self, filter: &GroupFilter) -> Result<usize>;
}
