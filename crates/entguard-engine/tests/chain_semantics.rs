#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use entguard_core::decision::NO_RULE_MATCHED;
use entguard_core::error::{GuardError, Result};
use entguard_core::{Decision, RequestCtx, UserViewer};
use entguard_engine::privacy::{
    always_allow, always_deny, deny_mutation_operation, Filter, MutationOp, MutationPolicy,
    MutationRuleFunc, OpKind, Operation, Query, QueryMutationRule, QueryPolicy, QueryRuleFunc, DEADLINE_EXCEEDED,
};
use entguard_engine::schema::TenantFilter;
use entguard_engine::store::EngineSettings;
use entguard_engine::{Client, MemoryStorage, PolicyRegistry};

/// Minimal query over tenants.
#[derive(Default)]
struct Probe {
    filter: TenantFilter,
}

impl Query for Probe {
    fn entity_type(&self) -> &'static str {
        "Tenant"
    }

    fn filter(&mut self) -> &mut dyn Filter {
        &mut self.filter
    }
}

/// Returns a fixed decision and counts how often it ran.
struct Counted {
    hits: Arc<AtomicUsize>,
    decision: Decision,
}

fn counted(decision: Decision) -> (Counted, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    (
        Counted {
            hits: Arc::clone(&hits),
            decision,
        },
        hits,
    )
}

#[async_trait]
impl QueryMutationRule for Counted {
    fn name(&self) -> &str {
        "counted"
    }

    async fn eval_op(&self, _ctx: &RequestCtx, _op: Operation<'_>) -> Result<Decision> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(self.decision.clone())
    }
}

fn client() -> Client {
    Client::new(
        Arc::new(MemoryStorage::new()),
        PolicyRegistry::builder().build(),
        EngineSettings::default(),
    )
}

#[tokio::test]
async fn empty_chain_denies() {
    let d = QueryPolicy::default().eval(&RequestCtx::new(), &mut Probe::default()).await;
    assert_eq!(d, Decision::deny(NO_RULE_MATCHED));
}

#[tokio::test]
async fn all_skip_denies_after_running_every_rule() {
    let (a, a_hits) = counted(Decision::Skip);
    let (b, b_hits) = counted(Decision::Skip);
    let policy = QueryPolicy::default().rule(a).rule(b);

    let d = policy.eval(&RequestCtx::new(), &mut Probe::default()).await;
    assert_eq!(d, Decision::deny(NO_RULE_MATCHED));
    assert_eq!(a_hits.load(Ordering::SeqCst), 1);
    assert_eq!(b_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn first_terminal_decision_wins() {
    let (skip, _) = counted(Decision::Skip);
    let (deny, deny_hits) = counted(Decision::deny("first"));
    let (allow, allow_hits) = counted(Decision::Allow);
    let policy = QueryPolicy::default().rule(skip).rule(deny).rule(allow);

    let d = policy.eval(&RequestCtx::new(), &mut Probe::default()).await;
    assert_eq!(d, Decision::deny("first"));
    assert_eq!(deny_hits.load(Ordering::SeqCst), 1);
    assert_eq!(allow_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn allow_short_circuits() {
    let (trailing, hits) = counted(Decision::deny("unreachable"));
    let policy = QueryPolicy::default().rule(always_allow()).rule(trailing);

    let d = policy.eval(&RequestCtx::new(), &mut Probe::default()).await;
    assert_eq!(d, Decision::Allow);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn pinned_decision_bypasses_rules() {
    let (rule, hits) = counted(Decision::deny("never"));
    let policy = QueryPolicy::default().rule(rule);

    let allowed = RequestCtx::new().with_decision(Decision::Allow);
    assert_eq!(policy.eval(&allowed, &mut Probe::default()).await, Decision::Allow);

    let denied = RequestCtx::new().with_decision(Decision::deny("pinned"));
    let allow_all = QueryPolicy::default().rule(always_allow());
    assert_eq!(
        allow_all.eval(&denied, &mut Probe::default()).await,
        Decision::deny("pinned")
    );
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn pinned_skip_is_ignored() {
    let ctx = RequestCtx::new().with_decision(Decision::Skip);
    let policy = QueryPolicy::default().rule(always_deny());

    let d = policy.eval(&ctx, &mut Probe::default()).await;
    assert_eq!(d, Decision::deny("Tenant query denied by default"));
}

#[tokio::test]
async fn rule_error_becomes_deny_and_stops_chain() {
    let (trailing, hits) = counted(Decision::Allow);
    let policy = QueryPolicy::default()
        .rule(QueryRuleFunc::new("flaky", |_, _| {
            Err(GuardError::Upstream("boom".into()))
        }))
        .rule(trailing);

    let d = policy.eval(&RequestCtx::new(), &mut Probe::default()).await;
    assert_eq!(d, Decision::deny("upstream: boom"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rule_panic_becomes_deny() {
    let policy = QueryPolicy::default().rule(QueryRuleFunc::new(
        "exploding",
        |_, _| -> Result<Decision> { panic!("rule bug") },
    ));

    let d = policy.eval(&RequestCtx::new(), &mut Probe::default()).await;
    assert_eq!(d, Decision::deny("rule exploding panicked"));
}

#[tokio::test]
async fn elapsed_deadline_denies_before_next_rule() {
    let (rule, hits) = counted(Decision::Allow);
    let policy = QueryPolicy::default().rule(rule);
    let ctx = RequestCtx::new().with_timeout(Duration::ZERO);
    tokio::time::sleep(Duration::from_millis(2)).await;

    let d = policy.eval(&ctx, &mut Probe::default()).await;
    assert_eq!(d, Decision::deny(DEADLINE_EXCEEDED));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn query_mutation_rule_sees_operation_kind() {
    struct ReadOnly;

    #[async_trait]
    impl QueryMutationRule for ReadOnly {
        async fn eval_op(&self, _ctx: &RequestCtx, op: Operation<'_>) -> Result<Decision> {
            match op.kind() {
                OpKind::Query => Ok(Decision::Allow),
                OpKind::Mutation => Ok(Decision::deny("read only")),
            }
        }
    }

    let client = client();
    let ctx = RequestCtx::new();

    let q = QueryPolicy::default().rule(ReadOnly);
    assert_eq!(q.eval(&ctx, &mut Probe::default()).await, Decision::Allow);

    let m = MutationPolicy::default().rule(ReadOnly);
    let mut create = client.group().create().set_tenant_id(1);
    assert_eq!(m.eval(&ctx, create.mutation()).await, Decision::deny("read only"));
}

#[tokio::test]
async fn op_gated_rule_skips_other_ops() {
    let client = client();
    let ctx = RequestCtx::new().with_viewer(UserViewer::member(1));
    let policy = MutationPolicy::default()
        .rule(deny_mutation_operation([MutationOp::Delete]))
        .rule(MutationRuleFunc::new("describe", |_, m| {
            Ok(Decision::deny(format!("{} {}", m.entity_type(), m.op())))
        }));

    let mut create = client.group().create().set_tenant_id(1);
    assert_eq!(
        policy.eval(&ctx, create.mutation()).await,
        Decision::deny("Group create")
    );
}

#[tokio::test]
async fn policy_reports_deny_as_error() {
    let client = client();
    let mut create = client.user().create();
    let err = entguard_engine::Policy::default()
        .eval_mutation(&RequestCtx::new(), create.mutation())
        .await
        .unwrap_err();
    assert_eq!(err.code().as_str(), "POLICY_DENIED");
    assert_eq!(err.deny_reason(), Some(NO_RULE_MATCHED));
    assert_eq!(err.to_string(), "privacy: deny rule: no rule matched");
}
