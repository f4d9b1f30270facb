//! Operation descriptors handed to privacy rules.

use std::any::Any;
use std::fmt;

use super::filter::Filter;
use crate::store::Client;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Query,
    Mutation,
}

impl OpKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OpKind::Query => "query",
            OpKind::Mutation => "mutation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOp {
    Create,
    Delete,
}

impl MutationOp {
    pub fn as_str(self) -> &'static str {
        match self {
            MutationOp::Create => "create",
            MutationOp::Delete => "delete",
        }
    }
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A read in flight against one entity type.
pub trait Query: Send {
    fn entity_type(&self) -> &'static str;
    fn filter(&mut self) -> &mut dyn Filter;
}

/// A write in flight against one entity type.
///
/// Concrete mutations expose their staged fields through their own typed
/// getters; rules reach them with [`Mutation::as_any`].
pub trait Mutation: Send {
    fn entity_type(&self) -> &'static str;
    fn op(&self) -> MutationOp;
    /// Predicates selecting the rows an update/delete touches.
    fn filter(&mut self) -> &mut dyn Filter;
    /// Store handle for subsidiary queries.
    fn client(&self) -> &Client;
    fn as_any(&self) -> &dyn Any;
}

/// Kind-tagged descriptor passed to query-or-mutation rules.
pub enum Operation<'a> {
    Query(&'a mut dyn Query),
    Mutation(&'a mut dyn Mutation),
}

impl<'a> Operation<'a> {
    pub fn kind(&self) -> OpKind {
        match self {
            Operation::Query(_) => OpKind::Query,
            Operation::Mutation(_) => OpKind::Mutation,
        }
    }

    pub fn entity_type(&self) -> &'static str {
        match self {
            Operation::Query(q) => q.entity_type(),
            Operation::Mutation(m) => m.entity_type(),
        }
    }

    pub fn filter(&mut self) -> &mut dyn Filter {
        match self {
            Operation::Query(q) => q.filter(),
            Operation::Mutation(m) => m.filter(),
        }
    }
}
