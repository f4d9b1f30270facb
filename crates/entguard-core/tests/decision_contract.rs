#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use entguard_core::decision::NO_RULE_MATCHED;
use entguard_core::{denyf, Decision, GuardError, RequestCtx, UserViewer, Viewer};

#[test]
fn denyf_formats_reason() {
    let d = denyf!("mismatch tenant-ids for group/users {} != {}", 5, 9);
    assert_eq!(d, Decision::Deny("mismatch tenant-ids for group/users 5 != 9".into()));
    assert!(d.is_terminal());
    assert!(!d.is_allow());
}

#[test]
fn skip_outcome_is_a_denial() {
    let err = Decision::Skip.into_result().unwrap_err();
    assert_eq!(err.deny_reason(), Some(NO_RULE_MATCHED));
    assert!(Decision::Allow.into_result().is_ok());
}

#[test]
fn errors_fold_into_denials() {
    assert_eq!(
        Decision::from(GuardError::PolicyDenied("nope".into())),
        Decision::deny("nope")
    );
    assert_eq!(
        Decision::from(GuardError::DeadlineExceeded),
        Decision::deny("context deadline exceeded")
    );
}

#[test]
fn context_carries_viewer_and_deadline() {
    let ctx = RequestCtx::new()
        .with_viewer(UserViewer::new_admin(Some(3)))
        .with_timeout(Duration::from_secs(30));

    let viewer = ctx.viewer().unwrap();
    assert!(viewer.admin());
    assert_eq!(viewer.tenant(), Some(3));
    assert!(!ctx.deadline_exceeded());
    assert!(ctx.remaining().unwrap() <= Duration::from_secs(30));

    let pinned = ctx.with_decision(Decision::deny("pinned"));
    assert_eq!(pinned.decision_override(), Some(&Decision::deny("pinned")));
    assert!(pinned.viewer().is_some());
}

#[test]
fn error_codes_are_stable() {
    let cases = [
        (GuardError::PolicyDenied("x".into()), "POLICY_DENIED"),
        (GuardError::Upstream("x".into()), "UPSTREAM"),
        (GuardError::DeadlineExceeded, "DEADLINE_EXCEEDED"),
        (GuardError::InvalidConfig("x".into()), "INVALID_CONFIG"),
        (GuardError::Internal("x".into()), "INTERNAL"),
    ];
    for (err, code) in cases {
        assert_eq!(err.code().as_str(), code, "{err}");
    }
}
