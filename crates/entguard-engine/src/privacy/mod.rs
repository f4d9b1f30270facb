//! Privacy layer: rule traits, chain evaluation and per-entity policies.
//!
//! The store asks the [`PolicyRegistry`] for a verdict immediately before it
//! executes a query or mutation; any verdict other than `Allow` aborts the
//! operation with `GuardError::PolicyDenied`.

pub mod filter;
pub mod op;
pub mod policy;
pub mod registry;
pub mod rule;

pub use filter::{Filter, IntPredicate, TenantScoped};
pub use op::{Mutation, MutationOp, OpKind, Operation, Query};
pub use policy::{MutationPolicy, Policy, QueryPolicy, DEADLINE_EXCEEDED};
pub use registry::{PolicyRegistry, PolicyRegistryBuilder};
pub use rule::{
    always_allow, always_deny, deny_mutation_operation, on_mutation_operation, AlwaysAllow,
    AlwaysDeny, ContextRule, FilterRule, MutationRule, MutationRuleFunc, OnMutationOps,
    QueryMutationRule, QueryRule, QueryRuleFunc,
};
