use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use entguard_core::error::{GuardError, Result};
use entguard_core::{Decision, RequestCtx};

use super::op::{Mutation, OpKind, Query};
use super::policy::{MutationPolicy, Policy, QueryPolicy};
use crate::config::PrivacyConfig;
use crate::obs::PolicyMetrics;
use crate::rules::catalog;
use crate::schema::ENTITY_TYPES;

/// Entity type -> policy map consulted before every store operation.
/// Built once, then read-only.
pub struct PolicyRegistry {
    policies: HashMap<String, Arc<Policy>>,
    metrics: Arc<PolicyMetrics>,
}

impl PolicyRegistry {
    pub fn builder() -> PolicyRegistryBuilder {
        PolicyRegistryBuilder::default()
    }

    /// Compile named rule chains from config.
    pub fn from_config(cfg: &PrivacyConfig) -> Result<Self> {
        let mut builder = Self::builder();
        for p in &cfg.policies {
            let query = catalog::compile_query_rules(&p.query).map_err(|e| {
                GuardError::InvalidConfig(format!("policy compile failed (entity={}): {e}", p.entity))
            })?;
            let mutation = catalog::compile_mutation_rules(&p.mutation).map_err(|e| {
                GuardError::InvalidConfig(format!("policy compile failed (entity={}): {e}", p.entity))
            })?;

            if !ENTITY_TYPES.contains(&p.entity.as_str()) {
                tracing::warn!(entity = %p.entity, "policy refers to an entity unknown to the schema");
            }

            builder = builder.register(
                p.entity.clone(),
                Policy::new(QueryPolicy::new(query), MutationPolicy::new(mutation)),
            );
        }
        Ok(builder.build())
    }

    pub fn policy(&self, entity: &str) -> Option<Arc<Policy>> {
        self.policies.get(entity).cloned()
    }

    /// Registered entity types, sorted.
    pub fn entities(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.policies.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    pub fn metrics(&self) -> Arc<PolicyMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Evaluate the query chain of `query`'s entity type.
    pub async fn eval_query(&self, ctx: &RequestCtx, query: &mut dyn Query) -> Result<()> {
        let entity = query.entity_type();
        let started = Instant::now();
        let decision = match self.policies.get(entity) {
            Some(policy) => policy.query().eval(ctx, query).await,
            None => {
                tracing::debug!(entity, "no policy registered; evaluating empty chain");
                QueryPolicy::default().eval(ctx, query).await
            }
        };
        self.finish(entity, OpKind::Query, decision, started)
    }

    /// Evaluate the mutation chain of `m`'s entity type.
    pub async fn eval_mutation(&self, ctx: &RequestCtx, m: &mut dyn Mutation) -> Result<()> {
        let entity = m.entity_type();
        let started = Instant::now();
        let decision = match self.policies.get(entity) {
            Some(policy) => policy.mutation().eval(ctx, m).await,
            None => {
                tracing::debug!(entity, "no policy registered; evaluating empty chain");
                MutationPolicy::default().eval(ctx, m).await
            }
        };
        self.finish(entity, OpKind::Mutation, decision, started)
    }

    fn finish(&self, entity: &str, kind: OpKind, decision: Decision, started: Instant) -> Result<()> {
        let op = kind.as_str();
        self.metrics
            .decisions
            .inc(&[("entity", entity), ("op", op), ("decision", decision.as_label())]);
        self.metrics
            .eval_duration
            .observe(&[("entity", entity), ("op", op)], started.elapsed());

        match &decision {
            Decision::Deny(reason) => tracing::info!(entity, op, reason = %reason, "privacy deny"),
            _ => tracing::debug!(entity, op, "privacy allow"),
        }
        decision.into_result()
    }
}

#[derive(Default)]
pub struct PolicyRegistryBuilder {
    policies: HashMap<String, Arc<Policy>>,
}

impl PolicyRegistryBuilder {
    /// Bind `policy` to `entity`, replacing any earlier binding.
    pub fn register(mut self, entity: impl Into<String>, policy: Policy) -> Self {
        self.policies.insert(entity.into(), Arc::new(policy));
        self
    }

    pub fn build(self) -> PolicyRegistry {
        PolicyRegistry {
            policies: self.policies,
            metrics: Arc::new(PolicyMetrics::default()),
        }
    }
}
