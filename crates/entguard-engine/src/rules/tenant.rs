//! Tenant isolation rules.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use entguard_core::error::{GuardError, Result};
use entguard_core::{denyf, Decision, RequestCtx};

use crate::privacy::filter::IntPredicate;
use crate::privacy::op::{Mutation, MutationOp};
use crate::privacy::rule::{on_mutation_operation, FilterRule, MutationRule, OnMutationOps, QueryMutationRule};
use crate::schema::GroupMutation;
use crate::store::EngineSettings;

/// Scope every query and mutation to the viewer's tenant.
///
/// Narrows the operation filter with `tenant_id == viewer.tenant` and skips.
/// Entities whose filter cannot be tenant-scoped are denied.
pub fn filter_tenant_rule() -> impl QueryMutationRule {
    FilterRule::new("filter_tenant", |ctx, filter| {
        let Some(tid) = ctx.viewer().and_then(|v| v.tenant()) else {
            return Ok(Decision::deny("missing tenant information in viewer"));
        };
        let entity = filter.entity_type();
        let Some(scoped) = filter.tenant_scoped() else {
            return Ok(denyf!("unexpected filter type {}", entity));
        };
        scoped.where_tenant_id(IntPredicate::Eq(tid));
        Ok(Decision::Skip)
    })
}

/// Deny group creation that attaches users from another tenant.
/// Runs on create only; other mutation ops skip.
pub fn deny_mismatched_tenants() -> OnMutationOps {
    on_mutation_operation(Arc::new(DenyMismatchedTenants), [MutationOp::Create])
}

/// Cross-entity tenant check on `Group` mutations.
///
/// Looks up the tenant of every attached user with a privileged read
/// (decision pinned to `Allow`), so the user query chain, including the
/// tenant filter, is not re-entered.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyMismatchedTenants;

#[async_trait]
impl MutationRule for DenyMismatchedTenants {
    fn name(&self) -> &str {
        "deny_mismatched_tenants"
    }

    async fn eval_mutation(&self, ctx: &RequestCtx, m: &mut dyn Mutation) -> Result<Decision> {
        let (tid, users, client) = {
            let group = GroupMutation::downcast(&*m)?;
            let Some(tid) = group.tenant_id() else {
                return Ok(Decision::deny("missing tenant information in mutation"));
            };
            (tid, group.user_ids().to_vec(), group.client().clone())
        };
        if users.is_empty() {
            return Ok(Decision::Skip);
        }

        if ctx.deadline_exceeded() {
            return Ok(denyf!("querying the tenant-ids: {}", GuardError::DeadlineExceeded));
        }

        let privileged = ctx.with_decision(Decision::Allow);
        let budget = subsidiary_budget(ctx, client.settings());
        let lookup = client
            .user()
            .query()
            .where_id_in(users.clone())
            .tenant_ids(&privileged);

        let ids = match tokio::time::timeout(budget, lookup).await {
            Ok(Ok(ids)) => ids,
            Ok(Err(e)) => return Ok(denyf!("querying the tenant-ids: {}", e)),
            Err(_) => {
                return Ok(denyf!("querying the tenant-ids: {}", GuardError::DeadlineExceeded))
            }
        };

        if ids.len() != users.len() {
            return Ok(Decision::deny(
                "one of the attached users is not connected to a tenant",
            ));
        }
        if let Some(other) = ids.iter().find(|&&id| id != tid) {
            return Ok(denyf!("mismatch tenant-ids for group/users {} != {}", tid, other));
        }
        Ok(Decision::Skip)
    }
}

/// Time allowed for a rule's store lookup: the configured bound, cut short
/// by the request deadline.
fn subsidiary_budget(ctx: &RequestCtx, settings: &EngineSettings) -> Duration {
    match ctx.remaining() {
        Some(left) => left.min(settings.subsidiary_timeout),
        None => settings.subsidiary_timeout,
    }
}
