//! Host-side provider settings.
//!
//! A settings document toggles providers and supplies their payloads:
//!
//! ```yaml
//! providers:
//!   database:
//!     priority: 10
//!     config:
//!       url: postgres://localhost/app
//!   metrics:
//!     enabled: false
//! ```

use crate::config::ConfigError;
use crate::providers::{ProviderConfig, ProviderLoader, PRIORITY_KEY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;

/// Comma-separated provider names forced off
pub const DISABLED_PROVIDERS_ENV: &str = "BOOTLINE_DISABLED_PROVIDERS";

/// Comma-separated provider names forced on
pub const ENABLED_PROVIDERS_ENV: &str = "BOOTLINE_ENABLED_PROVIDERS";

/// Settings for a single provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Overrides both the declared priority and any `priority` inside `config`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ProviderConfig>,
}

impl ProviderEntry {
    /// Payload to store for the provider, if the entry carries one
    pub fn payload(&self) -> Option<ProviderConfig> {
        if self.config.is_none() && self.priority.is_none() {
            return None;
        }

        let mut payload = self.config.clone().unwrap_or_default();
        if let Some(priority) = self.priority {
            payload.insert(PRIORITY_KEY.to_string(), priority.into());
        }
        Some(payload)
    }
}

/// Provider settings document, keyed by provider name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderEntry>,
}

impl ProviderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_yaml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a `.yaml`, `.yml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let source = std::fs::read_to_string(path)?;

        tracing::debug!(path = %path.display(), "Loading provider settings");
        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&source),
            "json" => Self::from_json_str(&source),
            _ => Err(ConfigError::invalid_value(
                "path",
                path.display().to_string(),
                "a .yaml, .yml or .json file",
            )),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in self.providers.keys() {
            if name.trim().is_empty() {
                return Err(ConfigError::validation_failed("provider names must not be empty"));
            }
        }
        Ok(())
    }

    /// Entry for `name`, created if missing
    pub fn entry(&mut self, name: impl Into<String>) -> &mut ProviderEntry {
        self.providers.entry(name.into()).or_default()
    }

    /// Force the listed providers on or off. `names` is comma-separated.
    pub fn override_enabled(&mut self, names: &str, enabled: bool) {
        for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            self.entry(name).enabled = Some(enabled);
        }
    }

    /// Apply [`DISABLED_PROVIDERS_ENV`] then [`ENABLED_PROVIDERS_ENV`]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(names) = env::var(DISABLED_PROVIDERS_ENV) {
            self.override_enabled(&names, false);
        }
        if let Ok(names) = env::var(ENABLED_PROVIDERS_ENV) {
            self.override_enabled(&names, true);
        }
        self
    }

    /// Copy enable flags and payloads into the loader
    ///
    /// Entries without a payload leave the loader's config untouched, so the
    /// provider is not configured.
    pub fn apply(&self, loader: &mut ProviderLoader) {
        for (name, entry) in &self.providers {
            if let Some(enabled) = entry.enabled {
                loader.set_provider_enabled(name.as_str(), enabled);
            }
            if let Some(payload) = entry.payload() {
                loader.set_provider_config(name.as_str(), payload);
            }
        }
    }

    /// Build a fresh loader from these settings
    pub fn to_loader(&self) -> ProviderLoader {
        let mut loader = ProviderLoader::new();
        self.apply(&mut loader);
        loader
    }
}
