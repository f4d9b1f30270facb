//! `Tenant` entity. Tenants are the partitioning key itself, so their filter
//! has no tenant-scoping capability.

use std::any::Any;

use entguard_core::error::{GuardError, Result};
use entguard_core::RequestCtx;

use crate::privacy::filter::{all_match, Filter, IntPredicate};
use crate::privacy::op::{Mutation, MutationOp, Query};
use crate::store::Client;

pub const ENTITY: &str = "Tenant";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct TenantFilter {
    ids: Vec<IntPredicate>,
}

impl TenantFilter {
    pub fn where_id(&mut self, p: IntPredicate) {
        self.ids.push(p);
    }

    pub fn matches(&self, t: &Tenant) -> bool {
        all_match(&self.ids, t.id)
    }
}

impl Filter for TenantFilter {
    fn entity_type(&self) -> &'static str {
        ENTITY
    }
}

pub struct TenantClient {
    client: Client,
}

impl TenantClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn query(&self) -> TenantQuery {
        TenantQuery {
            client: self.client.clone(),
            filter: TenantFilter::default(),
        }
    }

    pub fn create(&self) -> TenantCreate {
        TenantCreate {
            mutation: TenantMutation {
                op: MutationOp::Create,
                client: self.client.clone(),
                name: None,
                filter: TenantFilter::default(),
            },
        }
    }
}

pub struct TenantQuery {
    client: Client,
    filter: TenantFilter,
}

impl TenantQuery {
    pub fn where_id_in(mut self, ids: Vec<i64>) -> Self {
        self.filter.where_id(IntPredicate::In(ids));
        self
    }

    pub async fn all(mut self, ctx: &RequestCtx) -> Result<Vec<Tenant>> {
        let client = self.client.clone();
        client.policies().eval_query(ctx, &mut self).await?;
        client.storage().select_tenants(&self.filter).await
    }
}

impl Query for TenantQuery {
    fn entity_type(&self) -> &'static str {
        ENTITY
    }

    fn filter(&mut self) -> &mut dyn Filter {
        &mut self.filter
    }
}

pub struct TenantMutation {
    op: MutationOp,
    client: Client,
    name: Option<String>,
    filter: TenantFilter,
}

impl TenantMutation {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Mutation for TenantMutation {
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

pub struct TenantCreate {
    mutation: TenantMutation,
}

impl TenantCreate {
    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.mutation.name = Some(name.into());
        self
    }

    pub async fn save(mut self, ctx: &RequestCtx) -> Result<Tenant> {
        let client = self.mutation.client.clone();
        client.policies().eval_mutation(ctx, &mut self.mutation).await?;
        let name = self
            .mutation
            .name
            .take()
            .ok_or_else(|| GuardError::Internal("missing required field \"tenant.name\"".into()))?;
        client.storage().insert_tenant(name).await
    }
}
