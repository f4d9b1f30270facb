//! Policy config loader (strict parsing).

pub mod schema;

use std::fs;

use entguard_core::error::{GuardError, Result};

pub use schema::{EngineSection, PolicyConfig, PrivacyConfig};

pub fn load_from_file(path: &str) -> Result<PrivacyConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GuardError::InvalidConfig(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<PrivacyConfig> {
    let cfg: PrivacyConfig = serde_yaml::from_str(s)
        .map_err(|e| GuardError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
