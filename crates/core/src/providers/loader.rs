use crate::errors::LifecycleError;
use crate::providers::{
    global_registry, sort_by_priority, ProviderConfig, ProviderConfigStore, ProviderDescriptor,
    ProviderRegistry,
};
use chrono::{DateTime, Utc};
use std::any::Any;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Drives registered providers through configure, register and boot
///
/// Both phases run serially in priority order. Any configure or register
/// failure, and any boot failure of a non-optional provider, aborts the load.
/// Nothing already registered or booted is rolled back.
#[derive(Debug, Clone, Default)]
pub struct ProviderLoader {
    store: ProviderConfigStore,
}

impl ProviderLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: ProviderConfigStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ProviderConfigStore {
        &self.store
    }

    pub fn is_provider_enabled(&self, name: &str) -> bool {
        self.store.is_enabled(name)
    }

    pub fn set_provider_enabled(&mut self, name: impl Into<String>, enabled: bool) {
        self.store.set_enabled(name, enabled);
    }

    pub fn provider_config(&self, name: &str) -> Option<&ProviderConfig> {
        self.store.config(name)
    }

    pub fn set_provider_config(&mut self, name: impl Into<String>, config: ProviderConfig) {
        self.store.set_config(name, config);
    }

    pub fn with_provider_enabled(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.set_provider_enabled(name, enabled);
        self
    }

    pub fn with_provider_config(mut self, name: impl Into<String>, config: ProviderConfig) -> Self {
        self.set_provider_config(name, config);
        self
    }

    /// Names of the enabled providers of `registry` in the order they would load
    pub fn resolved_order(&self, registry: &ProviderRegistry) -> Vec<String> {
        let (enabled, _) = self.partition(registry);
        sort_by_priority(enabled, &self.store)
            .iter()
            .map(|d| d.name().to_string())
            .collect()
    }

    /// Load every provider in the process-wide registry into `app`
    pub fn load_providers(&self, app: &mut dyn Any) -> Result<LoadReport, LifecycleError> {
        let registry = global_registry();
        self.load_from(&registry, app)
    }

    /// Load the providers of `registry` into `app`
    pub fn load_from(
        &self,
        registry: &ProviderRegistry,
        app: &mut dyn Any,
    ) -> Result<LoadReport, LifecycleError> {
        let mut report = LoadReport::new();
        let span = tracing::info_span!("load_providers", load_id = %report.load_id);
        let _guard = span.enter();
        let start_time = Instant::now();

        let (enabled, disabled) = self.partition(registry);
        for descriptor in &disabled {
            tracing::debug!(provider = %descriptor.name(), "Skipping disabled provider");
            report.skipped.push(descriptor.name().to_string());
        }

        let sorted = sort_by_priority(enabled, &self.store);

        let reg_start = Instant::now();
        let mut registered = Vec::with_capacity(sorted.len());
        for descriptor in sorted {
            self.register_one(&descriptor, app).map_err(abort)?;
            registered.push(descriptor);
        }
        report.registration_time = reg_start.elapsed();

        let boot_start = Instant::now();
        for descriptor in &registered {
            let name = descriptor.name();
            tracing::info!(provider = %name, "Booting provider");

            if let Err(source) = descriptor.provider().boot(app) {
                if descriptor.metadata().is_optional {
                    tracing::warn!(provider = %name, error = %source, "Optional provider failed to boot");
                    report.optional_failures.push(OptionalFailure {
                        provider: name.to_string(),
                        message: source.to_string(),
                    });
                    continue;
                }
                return Err(abort(LifecycleError::Boot {
                    provider: name.to_string(),
                    source,
                }));
            }
        }
        report.boot_time = boot_start.elapsed();

        report.loaded = registered.iter().map(|d| d.name().to_string()).collect();
        report.total_time = start_time.elapsed();

        tracing::info!(
            "Successfully loaded {} providers in {:?}",
            report.provider_count(),
            report.total_time
        );

        Ok(report)
    }

    fn register_one(
        &self,
        descriptor: &ProviderDescriptor,
        app: &mut dyn Any,
    ) -> Result<(), LifecycleError> {
        let name = descriptor.name();

        if let (Some(configurable), Some(config)) =
            (descriptor.configurable(), self.store.config(name))
        {
            tracing::debug!(provider = %name, "Configuring provider");
            configurable
                .configure(config)
                .map_err(|source| LifecycleError::Configure {
                    provider: name.to_string(),
                    source,
                })?;
        }

        tracing::info!(provider = %name, "Registering provider");
        descriptor
            .provider()
            .register(app)
            .map_err(|source| LifecycleError::Register {
                provider: name.to_string(),
                source,
            })
    }

    fn partition(&self, registry: &ProviderRegistry) -> (Vec<ProviderDescriptor>, Vec<ProviderDescriptor>) {
        registry
            .descriptors()
            .into_iter()
            .partition(|d| self.store.is_enabled(d.name()))
    }
}

fn abort(error: LifecycleError) -> LifecycleError {
    tracing::error!(provider = %error.provider_name(), error = %error, "Provider loading aborted");
    error
}

/// A tolerated boot failure of an optional provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalFailure {
    pub provider: String,
    pub message: String,
}

/// Outcome of a successful load
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub load_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Providers that completed registration, in load order
    pub loaded: Vec<String>,
    /// Disabled providers, in registration order
    pub skipped: Vec<String>,
    pub optional_failures: Vec<OptionalFailure>,
    pub registration_time: Duration,
    pub boot_time: Duration,
    pub total_time: Duration,
}

impl LoadReport {
    fn new() -> Self {
        Self {
            load_id: Uuid::new_v4(),
            started_at: Utc::now(),
            loaded: Vec::new(),
            skipped: Vec::new(),
            optional_failures: Vec::new(),
            registration_time: Duration::ZERO,
            boot_time: Duration::ZERO,
            total_time: Duration::ZERO,
        }
    }

    /// Number of providers loaded, including optional ones that failed to boot
    pub fn provider_count(&self) -> usize {
        self.loaded.len()
    }

    /// Providers whose boot succeeded
    pub fn booted(&self) -> Vec<&str> {
        self.loaded
            .iter()
            .filter(|name| !self.optional_failures.iter().any(|f| &f.provider == *name))
            .map(|name| name.as_str())
            .collect()
    }
}
