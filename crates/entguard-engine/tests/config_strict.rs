#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use entguard_engine::{config, Client, MemoryStorage, PolicyRegistry};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
engine:
  subsidiary_timeout_ms: 500
policies:
  - entity: "User"
    querry: [always_allow] # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
policies:
  - entity: "User"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.policies[0].entity, "User");
    assert!(cfg.policies[0].query.is_empty());
    assert_eq!(cfg.engine.subsidiary_timeout(), Duration::from_millis(2000));
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\npolicies:\n  - entity: User\n").expect_err("must fail");
    assert!(err.to_string().contains("unsupported config version: 2"));
}

#[test]
fn rejects_duplicate_entity() {
    let bad = r#"
version: 1
policies:
  - entity: "Group"
    query: [always_allow]
  - entity: "Group"
    query: [always_deny]
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("duplicate policy for entity: Group"));
}

#[test]
fn rejects_out_of_range_subsidiary_timeout() {
    let bad = r#"
version: 1
engine:
  subsidiary_timeout_ms: 5
policies:
  - entity: "User"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn unknown_rule_fails_compilation() {
    let cfg = config::load_from_str(
        r#"
version: 1
policies:
  - entity: "User"
    query: [deny_if_no_viewer, allow_everyone]
"#,
    )
    .unwrap();

    let err = PolicyRegistry::from_config(&cfg).err().expect("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
    assert!(err.to_string().contains("entity=User"));
    assert!(err.to_string().contains("unknown rule: allow_everyone"));
}

#[test]
fn client_from_config_carries_engine_settings() {
    let cfg = config::load_from_str(
        r#"
version: 1
engine:
  subsidiary_timeout_ms: 250
policies:
  - entity: "Tenant"
    query: [allow_if_admin, always_deny]
    mutation: [always_deny]
  - entity: "User"
    query: [always_allow]
"#,
    )
    .unwrap();

    let client = Client::from_config(&cfg, Arc::new(MemoryStorage::new())).unwrap();
    assert_eq!(client.settings().subsidiary_timeout, Duration::from_millis(250));
    assert_eq!(client.policies().entities(), ["Tenant", "User"]);

    let tenant = client.policies().policy("Tenant").unwrap();
    let names: Vec<&str> = tenant.query().rules().iter().map(|r| r.name()).collect();
    assert_eq!(names, ["allow_if_admin", "always_deny"]);
}
