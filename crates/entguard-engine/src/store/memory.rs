use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use entguard_core::error::Result;
use entguard_core::TenantId;

use super::Storage;
use crate::schema::{Group, GroupFilter, Tenant, TenantFilter, User, UserFilter};

/// In-process storage. Ids come from one shared sequence so they are unique
/// across entity types; results are returned ordered by id.
pub struct MemoryStorage {
    tenants: DashMap<i64, Tenant>,
    users: DashMap<i64, User>,
    groups: DashMap<i64, Group>,
    seq: AtomicI64,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            tenants: DashMap::new(),
            users: DashMap::new(),
            groups: DashMap::new(),
            seq: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> i64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }
}

fn sorted_by_id<T, F>(mut rows: Vec<T>, id: F) -> Vec<T>
where
    F: Fn(&T) -> i64,
{
    rows.sort_by_key(|r| id(r));
    rows
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn select_tenants(&self, filter: &TenantFilter) -> Result<Vec<Tenant>> {
        let rows = self
            .tenants
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        Ok(sorted_by_id(rows, |t: &Tenant| t.id))
    }

    async fn select_users(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let rows = self
            .users
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        Ok(sorted_by_id(rows, |u: &User| u.id))
    }

    async fn select_groups(&self, filter: &GroupFilter) -> Result<Vec<Group>> {
        let rows = self
            .groups
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        Ok(sorted_by_id(rows, |g: &Group| g.id))
    }

    async fn insert_tenant(&self, name: String) -> Result<Tenant> {
        let t = Tenant { id: self.next_id(), name };
        self.tenants.insert(t.id, t.clone());
        Ok(t)
    }

    async fn insert_user(&self, name: String, tenant_id: Option<TenantId>) -> Result<User> {
        let u = User { id: self.next_id(), name, tenant_id };
        self.users.insert(u.id, u.clone());
        Ok(u)
    }

    async fn insert_group(
        &self,
        name: String,
        tenant_id: TenantId,
        user_ids: Vec<i64>,
    ) -> Result<Group> {
        let g = Group {
            id: self.next_id(),
            name,
            tenant_id,
            user_ids,
        };
        self.groups.insert(g.id, g.clone());
        Ok(g)
    }

    async fn delete_groups(&self, filter: &GroupFilter) -> Result<usize> {
        let victims: Vec<i64> = self
            .groups
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| *r.key())
            .collect();
        Ok(victims
            .iter()
            .filter(|id| self.groups.remove(id).is_some())
            .count())
    }
}
