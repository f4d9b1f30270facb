//! Rule traits and the small library of rule adapters.
//!
//! A rule maps `(context, operation)` to a [`Decision`] or an error. Errors
//! are never fatal: the chain evaluator turns them into `Deny`.
//! Query-or-mutation rules implement [`QueryMutationRule`] once and are
//! usable in both chains through blanket impls.

use std::sync::Arc;

use async_trait::async_trait;

use entguard_core::error::Result;
use entguard_core::{Decision, RequestCtx};

use super::filter::Filter;
use super::op::{Mutation, MutationOp, Operation, Query};

/// Rule evaluated for read operations.
#[async_trait]
pub trait QueryRule: Send + Sync {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
    async fn eval_query(&self, ctx: &RequestCtx, query: &mut dyn Query) -> Result<Decision>;
}

/// Rule evaluated for write operations.
#[async_trait]
pub trait MutationRule: Send + Sync {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
    async fn eval_mutation(&self, ctx: &RequestCtx, m: &mut dyn Mutation) -> Result<Decision>;
}

/// Rule usable in both chains; tells the two apart via [`Operation::kind`].
#[async_trait]
pub trait QueryMutationRule: Send + Sync {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
    async fn eval_op(&self, ctx: &RequestCtx, op: Operation<'_>) -> Result<Decision>;
}

#[async_trait]
impl<R> QueryRule for R
where
    R: QueryMutationRule + ?Sized,
{
    fn name(&self) -> &str {
        QueryMutationRule::name(self)
    }

    async fn eval_query(&self, ctx: &RequestCtx, query: &mut dyn Query) -> Result<Decision> {
        self.eval_op(ctx, Operation::Query(query)).await
    }
}

#[async_trait]
impl<R> MutationRule for R
where
    R: QueryMutationRule + ?Sized,
{
    fn name(&self) -> &str {
        QueryMutationRule::name(self)
    }

    async fn eval_mutation(&self, ctx: &RequestCtx, m: &mut dyn Mutation) -> Result<Decision> {
        self.eval_op(ctx, Operation::Mutation(m)).await
    }
}

/// Terminal allow for any operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAllow;

#[async_trait]
impl QueryMutationRule for AlwaysAllow {
    fn name(&self) -> &str {
        "always_allow"
    }

    async fn eval_op(&self, _ctx: &RequestCtx, _op: Operation<'_>) -> Result<Decision> {
        Ok(Decision::Allow)
    }
}

/// Terminal deny for any operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDeny;

#[async_trait]
impl QueryMutationRule for AlwaysDeny {
    fn name(&self) -> &str {
        "always_deny"
    }

    async fn eval_op(&self, _ctx: &RequestCtx, op: Operation<'_>) -> Result<Decision> {
        Ok(entguard_core::denyf!(
            "{} {} denied by default",
            op.entity_type(),
            op.kind().as_str()
        ))
    }
}

pub fn always_allow() -> AlwaysAllow {
    AlwaysAllow
}

pub fn always_deny() -> AlwaysDeny {
    AlwaysDeny
}

/// Query rule from a plain closure.
pub struct QueryRuleFunc<F> {
    name: &'static str,
    f: F,
}

impl<F> QueryRuleFunc<F>
where
    F: Fn(&RequestCtx, &mut dyn Query) -> Result<Decision> + Send + Sync,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

#[async_trait]
impl<F> QueryRule for QueryRuleFunc<F>
where
    F: Fn(&RequestCtx, &mut dyn Query) -> Result<Decision> + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn eval_query(&self, ctx: &RequestCtx, query: &mut dyn Query) -> Result<Decision> {
        (self.f)(ctx, query)
    }
}

/// Mutation rule from a plain closure.
pub struct MutationRuleFunc<F> {
    name: &'static str,
    f: F,
}

impl<F> MutationRuleFunc<F>
where
    F: Fn(&RequestCtx, &mut dyn Mutation) -> Result<Decision> + Send + Sync,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

#[async_trait]
impl<F> MutationRule for MutationRuleFunc<F>
where
    F: Fn(&RequestCtx, &mut dyn Mutation) -> Result<Decision> + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn eval_mutation(&self, ctx: &RequestCtx, m: &mut dyn Mutation) -> Result<Decision> {
        (self.f)(ctx, m)
    }
}

/// Rule that only looks at the request context (viewer, etc).
pub struct ContextRule<F> {
    name: &'static str,
    f: F,
}

impl<F> ContextRule<F>
where
    F: Fn(&RequestCtx) -> Result<Decision> + Send + Sync,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

#[async_trait]
impl<F> QueryMutationRule for ContextRule<F>
where
    F: Fn(&RequestCtx) -> Result<Decision> + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn eval_op(&self, ctx: &RequestCtx, _op: Operation<'_>) -> Result<Decision> {
        (self.f)(ctx)
    }
}

/// Filter-injection rule: narrows the operation's filter and usually skips.
///
/// Must be placed ahead of any rule that can allow, otherwise an earlier
/// allow ends the chain before the filter is narrowed.
pub struct FilterRule<F> {
    name: &'static str,
    f: F,
}

impl<F> FilterRule<F>
where
    F: Fn(&RequestCtx, &mut dyn Filter) -> Result<Decision> + Send + Sync,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

#[async_trait]
impl<F> QueryMutationRule for FilterRule<F>
where
    F: Fn(&RequestCtx, &mut dyn Filter) -> Result<Decision> + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn eval_op(&self, ctx: &RequestCtx, mut op: Operation<'_>) -> Result<Decision> {
        (self.f)(ctx, op.filter())
    }
}

/// Runs the wrapped rule only for the listed mutation ops.
pub struct OnMutationOps {
    rule: Arc<dyn MutationRule>,
    ops: Vec<MutationOp>,
}

#[async_trait]
impl MutationRule for OnMutationOps {
    fn name(&self) -> &str {
        self.rule.name()
    }

    async fn eval_mutation(&self, ctx: &RequestCtx, m: &mut dyn Mutation) -> Result<Decision> {
        if !self.ops.contains(&m.op()) {
            return Ok(Decision::Skip);
        }
        self.rule.eval_mutation(ctx, m).await
    }
}

pub fn on_mutation_operation(
    rule: Arc<dyn MutationRule>,
    ops: impl Into<Vec<MutationOp>>,
) -> OnMutationOps {
    OnMutationOps { rule, ops: ops.into() }
}

/// Denies the listed mutation ops, skips the rest.
pub fn deny_mutation_operation(ops: impl Into<Vec<MutationOp>>) -> OnMutationOps {
    on_mutation_operation(Arc::new(AlwaysDeny), ops)
}
