//! `User` entity: belongs to at most one tenant.

use std::any::Any;

use entguard_core::error::Result;
use entguard_core::{RequestCtx, TenantId};

use crate::privacy::filter::{all_match, Filter, IntPredicate, TenantScoped};
use crate::privacy::op::{Mutation, MutationOp, Query};
use crate::store::Client;

pub const ENTITY: &str = "User";

const DEFAULT_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub tenant_id: Option<TenantId>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    ids: Vec<IntPredicate>,
    tenant_ids: Vec<IntPredicate>,
}

impl UserFilter {
    pub fn where_id(&mut self, p: IntPredicate) {
        self.ids.push(p);
    }

    /// Rows without a tenant never match a tenant predicate.
    pub fn matches(&self, u: &User) -> bool {
        if !all_match(&self.ids, u.id) {
            return false;
        }
        match u.tenant_id {
            Some(tid) => all_match(&self.tenant_ids, tid),
            None => self.tenant_ids.is_empty(),
        }
    }
}

impl TenantScoped for UserFilter {
    fn where_tenant_id(&mut self, p: IntPredicate) {
        self.tenant_ids.push(p);
    }
}

impl Filter for UserFilter {
    fn entity_type(&self) -> &'static str {
        ENTITY
    }

    fn tenant_scoped(&mut self) -> Option<&mut dyn TenantScoped> {
        Some(self as &mut dyn TenantScoped)
    }
}

/// Entry point for `User` operations.
pub struct UserClient {
    client: Client,
}

impl UserClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn query(&self) -> UserQuery {
        UserQuery {
            client: self.client.clone(),
            filter: UserFilter::default(),
        }
    }

    pub fn create(&self) -> UserCreate {
        UserCreate {
            mutation: UserMutation {
                op: MutationOp::Create,
                client: self.client.clone(),
                name: None,
                tenant_id: None,
                filter: UserFilter::default(),
            },
        }
    }
}

pub struct UserQuery {
    client: Client,
    filter: UserFilter,
}

impl UserQuery {
    pub fn where_id_in(mut self, ids: Vec<i64>) -> Self {
        self.filter.where_id(IntPredicate::In(ids));
        self
    }

    pub fn where_tenant_id(mut self, p: IntPredicate) -> Self {
        self.filter.where_tenant_id(p);
        self
    }

    /// Run the privacy policy, then load every matching user.
    pub async fn all(mut self, ctx: &RequestCtx) -> Result<Vec<User>> {
        let client = self.client.clone();
        client.policies().eval_query(ctx, &mut self).await?;
        client.storage().select_users(&self.filter).await
    }

    pub async fn ids(self, ctx: &RequestCtx) -> Result<Vec<i64>> {
        Ok(self.all(ctx).await?.into_iter().map(|u| u.id).collect())
    }

    /// Tenant-id projection; users without a tenant contribute nothing.
    pub async fn tenant_ids(self, ctx: &RequestCtx) -> Result<Vec<TenantId>> {
        Ok(self
            .all(ctx)
            .await?
            .into_iter()
            .filter_map(|u| u.tenant_id)
            .collect())
    }
}

impl Query for UserQuery {
    fn entity_type(&self) -> &'static str {
        ENTITY
    }

    fn filter(&mut self) -> &mut dyn Filter {
        &mut self.filter
    }
}

/// Staged `User` write.
pub struct UserMutation {
    op: MutationOp,
    client: Client,
    name: Option<String>,
    tenant_id: Option<TenantId>,
    filter: UserFilter,
}

impl UserMutation {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }
}

impl Mutation for UserMutation {
    fn entity_type(&self) -> &'static str {
        ENTITY
    }

    fn op(&self) -> MutationOp {
        self.op
    }

    fn filter(&mut self) -> &mut dyn Filter {
        &mut self.filter
    }

    fn client(&self) -> &Client {
        &self.client
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct UserCreate {
    mutation: UserMutation,
}

impl UserCreate {
    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.mutation.name = Some(name.into());
        self
    }

    pub fn set_tenant_id(mut self, tid: TenantId) -> Self {
        self.mutation.tenant_id = Some(tid);
        self
    }

    pub fn mutation(&mut self) -> &mut UserMutation {
        &mut self.mutation
    }

    pub async fn save(mut self, ctx: &RequestCtx) -> Result<User> {
        let client = self.mutation.client.clone();
        client.policies().eval_mutation(ctx, &mut self.mutation).await?;
        let name = self.mutation.name.take().unwrap_or_else(|| DEFAULT_NAME.into());
        client.storage().insert_user(name, self.mutation.tenant_id).await
    }
}
