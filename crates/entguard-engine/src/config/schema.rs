use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use entguard_core::error::{GuardError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrivacyConfig {
    pub version: u32,

    #[serde(default)]
    pub engine: EngineSection,

    #[serde(default)]
    pub policies: Vec<PolicyConfig>,
}

impl PrivacyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GuardError::InvalidConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        if self.policies.is_empty() {
            return Err(GuardError::InvalidConfig("policies must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for p in &self.policies {
            if p.entity.trim().is_empty() {
                return Err(GuardError::InvalidConfig("policy entity must not be empty".into()));
            }
            if !seen.insert(p.entity.as_str()) {
                return Err(GuardError::InvalidConfig(format!(
                    "duplicate policy for entity: {}",
                    p.entity
                )));
            }
        }

        self.engine.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Upper bound for store lookups issued by rules.
    #[serde(default = "default_subsidiary_timeout_ms")]
    pub subsidiary_timeout_ms: u64,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            subsidiary_timeout_ms: default_subsidiary_timeout_ms(),
        }
    }
}

impl EngineSection {
    pub fn validate(&self) -> Result<()> {
        if !(10..=60000).contains(&self.subsidiary_timeout_ms) {
            return Err(GuardError::InvalidConfig(
                "engine.subsidiary_timeout_ms must be between 10 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn subsidiary_timeout(&self) -> Duration {
        Duration::from_millis(self.subsidiary_timeout_ms)
    }
}

fn default_subsidiary_timeout_ms() -> u64 {
    2000
}

/// Rule chains of one entity type, by rule name.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    pub entity: String,
    #[serde(default)]
    pub query: Vec<String>,
    #[serde(default)]
    pub mutation: Vec<String>,
}
