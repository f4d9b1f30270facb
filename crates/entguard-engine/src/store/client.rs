use std::sync::Arc;
use std::time::Duration;

use entguard_core::error::Result;

use super::Storage;
use crate::config::{EngineSection, PrivacyConfig};
use crate::privacy::PolicyRegistry;
use crate::schema::group::GroupClient;
use crate::schema::tenant::TenantClient;
use crate::schema::user::UserClient;

/// Engine knobs shared by every operation of a client.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Upper bound for store lookups issued from inside a rule.
    pub subsidiary_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings::from(&EngineSection::default())
    }
}

impl From<&EngineSection> for EngineSettings {
    fn from(section: &EngineSection) -> Self {
        Self {
            subsidiary_timeout: section.subsidiary_timeout(),
        }
    }
}

/// Store client: storage + compiled policies + settings.
/// Cheap to clone; every clone shares the same immutable policy registry.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    storage: Arc<dyn Storage>,
    policies: PolicyRegistry,
    settings: EngineSettings,
}

impl Client {
    pub fn new(storage: Arc<dyn Storage>, policies: PolicyRegistry, settings: EngineSettings) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                storage,
                policies,
                settings,
            }),
        }
    }

    /// Compile the configured policies and bind them to `storage`.
    pub fn from_config(cfg: &PrivacyConfig, storage: Arc<dyn Storage>) -> Result<Self> {
        let policies = PolicyRegistry::from_config(cfg)?;
        Ok(Self::new(storage, policies, EngineSettings::from(&cfg.engine)))
    }

    pub fn storage(&self) -> &dyn Storage {
        self.inner.storage.as_ref()
    }

    pub fn policies(&self) -> &PolicyRegistry {
        &self.inner.policies
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.inner.settings
    }

    pub fn tenant(&self) -> TenantClient {
        TenantClient::new(self.clone())
    }

    pub fn user(&self) -> UserClient {
        UserClient::new(self.clone())
    }

    pub fn group(&self) -> GroupClient {
        GroupClient::new(self.clone())
    }
}
