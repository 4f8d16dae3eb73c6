use crate::providers::ProviderConfig;
use std::collections::HashMap;

/// Per-loader enable flags and configuration payloads, keyed by provider name
#[derive(Debug, Clone, Default)]
pub struct ProviderConfigStore {
    enabled: HashMap<String, bool>,
    configs: HashMap<String, ProviderConfig>,
}

impl ProviderConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Providers are enabled unless explicitly turned off
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.get(name).copied().unwrap_or(true)
    }

    pub fn set_enabled(&mut self, name: impl Into<String>, enabled: bool) {
        self.enabled.insert(name.into(), enabled);
    }

    /// Stored payload; `None` when nothing was set, which differs from an empty map
    pub fn config(&self, name: &str) -> Option<&ProviderConfig> {
        self.configs.get(name)
    }

    pub fn set_config(&mut self, name: impl Into<String>, config: ProviderConfig) {
        let name = name.into();
        tracing::debug!(provider = %name, keys = config.len(), "Setting provider config");
        self.configs.insert(name, config);
    }
}
