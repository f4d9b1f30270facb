//! `Group` entity: owned by one tenant, attaches users.

use std::any::Any;

use entguard_core::error::{GuardError, Result};
use entguard_core::{RequestCtx, TenantId};

use crate::privacy::filter::{all_match, Filter, IntPredicate, TenantScoped};
use crate::privacy::op::{Mutation, MutationOp, Query};
use crate::store::Client;

pub const ENTITY: &str = "Group";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub tenant_id: TenantId,
    pub user_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    ids: Vec<IntPredicate>,
    tenant_ids: Vec<IntPredicate>,
}

impl GroupFilter {
    pub fn where_id(&mut self, p: IntPredicate) {
        self.ids.push(p);
    }

    pub fn matches(&self, g: &Group) -> bool {
        all_match(&self.ids, g.id) && all_match(&self.tenant_ids, g.tenant_id)
    }
}

impl TenantScoped for GroupFilter {
    fn where_tenant_id(&mut self, p: IntPredicate) {
        self.tenant_ids.push(p);
    }
}

impl Filter for GroupFilter {
    fn entity_type(&self) -> &'static str {
        ENTITY
    }

    fn tenant_scoped(&mut self) -> Option<&mut dyn TenantScoped> {
        Some(self as &mut dyn TenantScoped)
    }
}

/// Entry point for `Group` operations.
pub struct GroupClient {
    client: Client,
}

impl GroupClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn query(&self) -> GroupQuery {
        GroupQuery {
            client: self.client.clone(),
            filter: GroupFilter::default(),
        }
    }

    pub fn create(&self) -> GroupCreate {
        GroupCreate {
            mutation: GroupMutation::new(MutationOp::Create, self.client.clone()),
        }
    }

    pub fn delete(&self) -> GroupDelete {
        GroupDelete {
            mutation: GroupMutation::new(MutationOp::Delete, self.client.clone()),
        }
    }
}

pub struct GroupQuery {
    client: Client,
    filter: GroupFilter,
}

impl GroupQuery {
    pub fn where_id_in(mut self, ids: Vec<i64>) -> Self {
        self.filter.where_id(IntPredicate::In(ids));
        self
    }

    pub fn where_tenant_id(mut self, p: IntPredicate) -> Self {
        self.filter.where_tenant_id(p);
        self
    }

    pub async fn all(mut self, ctx: &RequestCtx) -> Result<Vec<Group>> {
        let client = self.client.clone();
        client.policies().eval_query(ctx, &mut self).await?;
        client.storage().select_groups(&self.filter).await
    }
}

impl Query for GroupQuery {
    fn entity_type(&self) -> &'static str {
        ENTITY
    }

    fn filter(&mut self) -> &mut dyn Filter {
        &mut self.filter
    }
}

/// Staged `Group` write.
pub struct GroupMutation {
    op: MutationOp,
    client: Client,
    name: Option<String>,
    tenant_id: Option<TenantId>,
    user_ids: Vec<i64>,
    filter: GroupFilter,
}

impl GroupMutation {
    fn new(op: MutationOp, client: Client) -> Self {
        Self {
            op,
            client,
            name: None,
            tenant_id: None,
            user_ids: Vec::new(),
            filter: GroupFilter::default(),
        }
    }

    /// Typed view of a mutation known to target `Group`.
    pub fn downcast(m: &dyn Mutation) -> Result<&GroupMutation> {
        m.as_any().downcast_ref::<GroupMutation>().ok_or_else(|| {
            GuardError::PolicyDenied(format!("unexpected mutation type {}", m.entity_type()))
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Staged tenant id, `None` when unset.
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    /// Staged ids of users to attach.
    pub fn user_ids(&self) -> &[i64] {
        &self.user_ids
    }

    pub fn set_tenant_id(&mut self, tid: TenantId) {
        self.tenant_id = Some(tid);
    }

    pub fn add_user_ids(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.user_ids.extend(ids);
    }
}

impl Mutation for GroupMutation {
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

pub struct GroupCreate {
    mutation: GroupMutation,
}

impl GroupCreate {
    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.mutation.name = Some(name.into());
        self
    }

    pub fn set_tenant_id(mut self, tid: TenantId) -> Self {
        self.mutation.set_tenant_id(tid);
        self
    }

    pub fn add_user_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.mutation.add_user_ids(ids);
        self
    }

    pub fn mutation(&mut self) -> &mut GroupMutation {
        &mut self.mutation
    }

    pub async fn save(mut self, ctx: &RequestCtx) -> Result<Group> {
        let client = self.mutation.client.clone();
        client.policies().eval_mutation(ctx, &mut self.mutation).await?;
        let m = self.mutation;
        let tenant_id = m
            .tenant_id
            .ok_or_else(|| GuardError::Internal("missing required field \"group.tenant_id\"".into()))?;
        let name = m.name.unwrap_or_default();
        client.storage().insert_group(name, tenant_id, m.user_ids).await
    }
}

pub struct GroupDelete {
    mutation: GroupMutation,
}

impl GroupDelete {
    pub fn where_id(mut self, id: i64) -> Self {
        self.mutation.filter.where_id(IntPredicate::Eq(id));
        self
    }

    /// Delete matching groups; returns how many were removed.
    pub async fn exec(mut self, ctx: &RequestCtx) -> Result<usize> {
        let client = self.mutation.client.clone();
        client.policies().eval_mutation(ctx, &mut self.mutation).await?;
        client.storage().delete_groups(&self.mutation.filter).await
    }
}
