//! Rule chains and their evaluation.
//!
//! Evaluation order for one chain:
//! 1. a pinned decision on the context wins outright;
//! 2. rules run strictly in declaration order, the first `Allow`/`Deny` wins;
//! 3. an elapsed deadline, a rule error, or a rule panic all yield `Deny`;
//! 4. a chain that only skips ends in `Deny(NO_RULE_MATCHED)`.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;

use entguard_core::decision::NO_RULE_MATCHED;
use entguard_core::error::Result;
use entguard_core::{denyf, Decision, RequestCtx};

use super::op::{Mutation, Query};
use super::rule::{MutationRule, QueryRule};

/// Deny reason once the request deadline has passed mid-chain.
pub const DEADLINE_EXCEEDED: &str = "context deadline exceeded";

/// Ordered query rules for one entity type.
#[derive(Clone, Default)]
pub struct QueryPolicy {
    rules: Vec<Arc<dyn QueryRule>>,
}

impl QueryPolicy {
    pub fn new(rules: Vec<Arc<dyn QueryRule>>) -> Self {
        Self { rules }
    }

    /// Append a rule (builder style).
    pub fn rule(mut self, rule: impl QueryRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn rules(&self) -> &[Arc<dyn QueryRule>] {
        &self.rules
    }

    /// Evaluate the chain. Never returns `Skip`.
    pub async fn eval(&self, ctx: &RequestCtx, query: &mut dyn Query) -> Decision {
        if let Some(pinned) = ctx.decision_override() {
            return pinned.clone();
        }
        for rule in &self.rules {
            if ctx.deadline_exceeded() {
                return Decision::deny(DEADLINE_EXCEEDED);
            }
            let outcome = AssertUnwindSafe(rule.eval_query(ctx, &mut *query))
                .catch_unwind()
                .await;
            let decision = settle(rule.name(), outcome);
            if decision.is_terminal() {
                return decision;
            }
        }
        Decision::deny(NO_RULE_MATCHED)
    }
}

/// Ordered mutation rules for one entity type.
#[derive(Clone, Default)]
pub struct MutationPolicy {
    rules: Vec<Arc<dyn MutationRule>>,
}

impl MutationPolicy {
    pub fn new(rules: Vec<Arc<dyn MutationRule>>) -> Self {
        Self { rules }
    }

    /// Append a rule (builder style).
    pub fn rule(mut self, rule: impl MutationRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn rules(&self) -> &[Arc<dyn MutationRule>] {
        &self.rules
    }

    /// Evaluate the chain. Never returns `Skip`.
    pub async fn eval(&self, ctx: &RequestCtx, m: &mut dyn Mutation) -> Decision {
        if let Some(pinned) = ctx.decision_override() {
            return pinned.clone();
        }
        for rule in &self.rules {
            if ctx.deadline_exceeded() {
                return Decision::deny(DEADLINE_EXCEEDED);
            }
            let outcome = AssertUnwindSafe(rule.eval_mutation(ctx, &mut *m))
                .catch_unwind()
                .await;
            let decision = settle(rule.name(), outcome);
            if decision.is_terminal() {
                return decision;
            }
        }
        Decision::deny(NO_RULE_MATCHED)
    }
}

/// Fold a rule's raw outcome into a decision.
fn settle(rule: &str, outcome: std::thread::Result<Result<Decision>>) -> Decision {
    match outcome {
        Ok(Ok(decision)) => {
            tracing::trace!(rule, %decision, "rule evaluated");
            decision
        }
        Ok(Err(e)) => {
            tracing::debug!(rule, error = %e, "rule failed; denying");
            Decision::from(e)
        }
        Err(_) => {
            tracing::error!(rule, "rule panicked; denying");
            denyf!("rule {} panicked", rule)
        }
    }
}

/// Privacy policy of one entity type: a query chain and a mutation chain.
///
/// Built once at registration time and shared read-only afterwards.
#[derive(Clone, Default)]
pub struct Policy {
    query: QueryPolicy,
    mutation: MutationPolicy,
}

impl Policy {
    pub fn new(query: QueryPolicy, mutation: MutationPolicy) -> Self {
        Self { query, mutation }
    }

    pub fn query(&self) -> &QueryPolicy {
        &self.query
    }

    pub fn mutation(&self) -> &MutationPolicy {
        &self.mutation
    }

    /// Evaluate the query chain; a deny becomes `GuardError::PolicyDenied`.
    pub async fn eval_query(&self, ctx: &RequestCtx, query: &mut dyn Query) -> Result<()> {
        self.query.eval(ctx, query).await.into_result()
    }

    /// Evaluate the mutation chain; a deny becomes `GuardError::PolicyDenied`.
    pub async fn eval_mutation(&self, ctx: &RequestCtx, m: &mut dyn Mutation) -> Result<()> {
        self.mutation.eval(ctx, m).await.into_result()
    }
}
