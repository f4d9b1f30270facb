//! Predicate filters that privacy rules may narrow.
//!
//! Each entity type ships its own filter. Narrowing capabilities are exposed
//! as separate traits and discovered at runtime through capability queries
//! on [`Filter`], so a rule can refuse an entity whose filter lacks the
//! capability instead of guessing.

/// Integer field predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntPredicate {
    Eq(i64),
    In(Vec<i64>),
}

impl IntPredicate {
    pub fn matches(&self, value: i64) -> bool {
        match self {
            IntPredicate::Eq(v) => *v == value,
            IntPredicate::In(vs) => vs.contains(&value),
        }
    }
}

/// Capability: restrict results to a tenant.
pub trait TenantScoped {
    fn where_tenant_id(&mut self, p: IntPredicate);
}

/// Operation-specific predicate builder.
pub trait Filter: Send {
    /// Entity type the filter applies to.
    fn entity_type(&self) -> &'static str;

    /// Tenant-scoping capability, `None` when the entity carries no tenant.
    fn tenant_scoped(&mut self) -> Option<&mut dyn TenantScoped> {
        None
    }
}

/// All predicates must hold (empty set matches everything).
pub(crate) fn all_match(preds: &[IntPredicate], value: i64) -> bool {
    preds.iter().all(|p| p.matches(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_match() {
        assert!(IntPredicate::Eq(5).matches(5));
        assert!(!IntPredicate::Eq(5).matches(9));
        assert!(IntPredicate::In(vec![1, 2]).matches(2));
        assert!(!IntPredicate::In(vec![]).matches(2));
    }

    #[test]
    fn empty_predicate_set_matches_everything() {
        assert!(all_match(&[], 42));
        assert!(!all_match(&[IntPredicate::Eq(1), IntPredicate::Eq(2)], 1));
    }
}
