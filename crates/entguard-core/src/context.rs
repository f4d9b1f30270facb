//! Request-scoped context threaded through every guarded call.
//!
//! The context is a plain immutable value: deriving a new one (for example a
//! decision override for a privileged lookup) never affects the original, so
//! concurrent operations holding different contexts cannot interfere.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::decision::Decision;
use crate::viewer::Viewer;

/// Immutable request scope: viewer, optional pinned decision, optional deadline.
#[derive(Debug, Clone, Default)]
pub struct RequestCtx {
    viewer: Option<Arc<dyn Viewer>>,
    decision: Option<Decision>,
    deadline: Option<Instant>,
}

impl RequestCtx {
    /// Anonymous context (no viewer, no deadline).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewer(mut self, viewer: impl Viewer + 'static) -> Self {
        self.viewer = Some(Arc::new(viewer));
        self
    }

    /// Acting viewer, `None` when the request is anonymous.
    pub fn viewer(&self) -> Option<&dyn Viewer> {
        self.viewer.as_deref()
    }

    /// Derive a context whose rule chains resolve straight to `decision`.
    ///
    /// Pinning `Skip` has no effect on evaluation.
    pub fn with_decision(&self, decision: Decision) -> Self {
        Self {
            decision: Some(decision),
            ..self.clone()
        }
    }

    /// Pinned terminal decision, if any.
    pub fn decision_override(&self) -> Option<&Decision> {
        self.decision.as_ref().filter(|d| d.is_terminal())
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now. A timeout past the clock's range leaves
    /// the context without a deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Time left before the deadline (zero once it has passed).
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn deadline_exceeded(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::UserViewer;

    #[test]
    fn derived_override_leaves_parent_untouched() {
        let parent = RequestCtx::new().with_viewer(UserViewer::member(5));
        let child = parent.with_decision(Decision::Allow);

        assert_eq!(child.decision_override(), Some(&Decision::Allow));
        assert!(parent.decision_override().is_none());
        assert_eq!(child.viewer().and_then(|v| v.tenant()), Some(5));
    }

    #[test]
    fn pinned_skip_is_ignored() {
        let ctx = RequestCtx::new().with_decision(Decision::Skip);
        assert!(ctx.decision_override().is_none());
    }

    #[test]
    fn elapsed_deadline_is_reported() {
        let ctx = RequestCtx::new().with_deadline(Instant::now());
        assert!(ctx.deadline_exceeded());
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));

        let ctx = RequestCtx::new().with_timeout(Duration::from_secs(60));
        assert!(!ctx.deadline_exceeded());
        assert!(RequestCtx::new().remaining().is_none());
    }

    #[test]
    fn unbounded_timeout_means_no_deadline() {
        let ctx = RequestCtx::new().with_timeout(Duration::MAX);
        assert!(!ctx.deadline_exceeded());
        assert!(ctx.remaining().is_none());
    }
}
