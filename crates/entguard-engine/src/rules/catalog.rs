//! Rule name -> rule compilation for config-driven policies.
//!
//! Names:
//! - `always_allow`, `always_deny`
//! - `deny_if_no_viewer`, `allow_if_admin`
//! - `filter_tenant`
//! - `deny_mismatched_tenants` (mutation only)
//! - `deny_delete` (mutation only)

use std::sync::Arc;

use entguard_core::error::{GuardError, Result};

use super::{allow_if_admin, deny_if_no_viewer, deny_mismatched_tenants, filter_tenant_rule};
use crate::privacy::op::MutationOp;
use crate::privacy::rule::{always_allow, always_deny, deny_mutation_operation, MutationRule, QueryRule};

const MUTATION_ONLY: [&str; 2] = ["deny_mismatched_tenants", "deny_delete"];

pub fn compile_query_rules(raw: &[String]) -> Result<Vec<Arc<dyn QueryRule>>> {
    let mut out = Vec::with_capacity(raw.len());
    for name in raw {
        let rule: Arc<dyn QueryRule> = match name.as_str() {
            "always_allow" => Arc::new(always_allow()),
            "always_deny" => Arc::new(always_deny()),
            "deny_if_no_viewer" => Arc::new(deny_if_no_viewer()),
            "allow_if_admin" => Arc::new(allow_if_admin()),
            "filter_tenant" => Arc::new(filter_tenant_rule()),
            other if MUTATION_ONLY.contains(&other) => {
                return Err(GuardError::InvalidConfig(format!(
                    "rule {other} cannot be used in a query chain"
                )))
            }
            other => return Err(GuardError::InvalidConfig(format!("unknown rule: {other}"))),
        };
        out.push(rule);
    }
    Ok(out)
}

pub fn compile_mutation_rules(raw: &[String]) -> Result<Vec<Arc<dyn MutationRule>>> {
    let mut out = Vec::with_capacity(raw.len());
    for name in raw {
        let rule: Arc<dyn MutationRule> = match name.as_str() {
            "always_allow" => Arc::new(always_allow()),
            "always_deny" => Arc::new(always_deny()),
            "deny_if_no_viewer" => Arc::new(deny_if_no_viewer()),
            "allow_if_admin" => Arc::new(allow_if_admin()),
            "filter_tenant" => Arc::new(filter_tenant_rule()),
            "deny_mismatched_tenants" => Arc::new(deny_mismatched_tenants()),
            "deny_delete" => Arc::new(deny_mutation_operation([MutationOp::Delete])),
            other => return Err(GuardError::InvalidConfig(format!("unknown rule: {other}"))),
        };
        out.push(rule);
    }
    Ok(out)
}
