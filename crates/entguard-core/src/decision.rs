//! Three-valued rule outcome.
//!
//! `Allow` and `Deny` end a rule chain; `Skip` defers to the next rule. A
//! chain that never produces a terminal decision resolves to
//! `Deny(NO_RULE_MATCHED)`.

use std::fmt::{self, Write};

use crate::error::{GuardError, Result};

/// Reason attached to the fallback deny of an exhausted chain.
pub const NO_RULE_MATCHED: &str = "no rule matched";

/// Outcome of a single privacy rule (or of a whole chain).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Terminal: the operation may proceed.
    Allow,
    /// Terminal: the operation fails with the given reason.
    Deny(String),
    /// No opinion; continue with the next rule.
    Skip,
}

impl Decision {
    pub fn deny(reason: impl Into<String>) -> Self {
        Decision::Deny(reason.into())
    }

    /// Build a `Deny` from pre-captured format arguments.
    ///
    /// Falls back to `raw` when a `Display` impl inside `args` fails, so a
    /// misbehaving argument cannot abort the evaluation. Prefer the
    /// [`denyf!`](crate::denyf) macro, which supplies `raw` itself.
    pub fn denyf(args: fmt::Arguments<'_>, raw: &str) -> Self {
        let mut reason = String::new();
        match reason.write_fmt(args) {
            Ok(()) => Decision::Deny(reason),
            Err(_) => Decision::Deny(raw.to_owned()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Decision::Skip)
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Decision::Deny(reason) => Some(reason),
            _ => None,
        }
    }

    /// Metric label.
    pub fn as_label(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny(_) => "deny",
            Decision::Skip => "skip",
        }
    }

    /// Convert a chain outcome into the operation's result.
    /// A leftover `Skip` is treated as the default deny.
    pub fn into_result(self) -> Result<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(GuardError::PolicyDenied(reason)),
            Decision::Skip => Err(GuardError::PolicyDenied(NO_RULE_MATCHED.to_owned())),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => f.write_str("allow"),
            Decision::Deny(reason) => write!(f, "deny: {reason}"),
            Decision::Skip => f.write_str("skip"),
        }
    }
}

/// Any rule error degrades to a deny carrying the error's message.
impl From<GuardError> for Decision {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::PolicyDenied(reason) => Decision::Deny(reason),
            other => Decision::Deny(other.to_string()),
        }
    }
}

/// Build a [`Decision::Deny`] with a formatted reason.
///
/// ```
/// use entguard_core::{denyf, Decision};
/// let d = denyf!("mismatch tenant-ids for group/users {} != {}", 5, 9);
/// assert_eq!(d, Decision::deny("mismatch tenant-ids for group/users 5 != 9"));
/// ```
#[macro_export]
macro_rules! denyf {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::decision::Decision::denyf(::std::format_args!($fmt $(, $arg)*), $fmt)
    };
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use super::*;

    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn denyf_formats_arguments() {
        let tid = 5;
        let d = crate::denyf!("mismatch tenant-ids for group/users {tid} != {}", 9);
        assert_eq!(d.reason(), Some("mismatch tenant-ids for group/users 5 != 9"));
    }

    #[test]
    fn denyf_falls_back_to_raw_message() {
        let d = crate::denyf!("querying the tenant-ids {}", Broken);
        assert_eq!(d, Decision::deny("querying the tenant-ids {}"));
    }

    #[test]
    fn skip_is_not_terminal() {
        assert!(!Decision::Skip.is_terminal());
        assert!(Decision::Allow.is_terminal());
        assert!(Decision::deny("x").is_terminal());
    }

    #[test]
    fn leftover_skip_becomes_default_deny() {
        let err = Decision::Skip.into_result().unwrap_err();
        assert_eq!(err.deny_reason(), Some(NO_RULE_MATCHED));
    }

    #[test]
    fn errors_degrade_to_deny() {
        let d: Decision = GuardError::PolicyDenied("nope".into()).into();
        assert_eq!(d, Decision::deny("nope"));

        let d: Decision = GuardError::Upstream("db down".into()).into();
        assert_eq!(d, Decision::deny("upstream: db down"));
    }
}
