//! entguard-check
//!
//! Loads a privacy policy file, compiles every rule chain and logs the
//! result. Exits non-zero when the file fails strict parsing or a chain
//! names an unknown rule.
//!
//! Usage: `entguard-check [path]` (default `entguard.yaml`).

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use entguard_engine::{config, PolicyRegistry};

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "entguard.yaml".to_string());

    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%path, error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };
    let registry = match PolicyRegistry::from_config(&cfg) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(%path, error = %e, "policy compile failed");
            return ExitCode::FAILURE;
        }
    };

    for entity in registry.entities() {
        let Some(policy) = registry.policy(entity) else { continue };
        let query: Vec<&str> = policy.query().rules().iter().map(|r| r.name()).collect();
        let mutation: Vec<&str> = policy.mutation().rules().iter().map(|r| r.name()).collect();
        tracing::info!(entity, ?query, ?mutation, "policy compiled");
    }
    tracing::info!(
        %path,
        entities = registry.entities().len(),
        subsidiary_timeout_ms = cfg.engine.subsidiary_timeout_ms,
        "policy file ok"
    );
    ExitCode::SUCCESS
}
