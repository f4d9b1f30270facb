//! Identity checks that only need the request context.

use entguard_core::Decision;

use crate::privacy::rule::{ContextRule, QueryMutationRule};

/// Deny when the request carries no viewer; skip otherwise.
pub fn deny_if_no_viewer() -> impl QueryMutationRule {
    ContextRule::new("deny_if_no_viewer", |ctx| {
        if ctx.viewer().is_none() {
            return Ok(Decision::deny("viewer-context is missing"));
        }
        Ok(Decision::Skip)
    })
}

/// Allow admin viewers; skip for everyone else, anonymous requests included.
pub fn allow_if_admin() -> impl QueryMutationRule {
    ContextRule::new("allow_if_admin", |ctx| {
        if ctx.viewer().is_some_and(|v| v.admin()) {
            return Ok(Decision::Allow);
        }
        Ok(Decision::Skip)
    })
}
