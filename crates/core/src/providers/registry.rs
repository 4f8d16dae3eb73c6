use crate::errors::LifecycleError;
use crate::providers::{Configurable, ProviderMetadata, ServiceProvider};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// A registered provider together with the capabilities captured at registration
#[derive(Clone)]
pub struct ProviderDescriptor {
    provider: Arc<dyn ServiceProvider>,
    metadata: ProviderMetadata,
}

impl ProviderDescriptor {
    pub fn new(provider: Arc<dyn ServiceProvider>) -> Self {
        let metadata = ProviderMetadata::from_provider(provider.as_ref());
        Self { provider, metadata }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn provider(&self) -> &Arc<dyn ServiceProvider> {
        &self.provider
    }

    pub fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    /// Configuration capability, only if it was present at registration
    pub fn configurable(&self) -> Option<&dyn Configurable> {
        if self.metadata.configurable {
            self.provider.configurable()
        } else {
            None
        }
    }
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Ordered set of providers with unique names, in registration order
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    descriptors: Vec<ProviderDescriptor>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service provider
    pub fn register<P: ServiceProvider + 'static>(&mut self, provider: P) -> Result<(), LifecycleError> {
        self.register_shared(Arc::new(provider))
    }

    /// Register a provider that is also held elsewhere
    ///
    /// Fails without modifying the registry when the name is already taken.
    pub fn register_shared(&mut self, provider: Arc<dyn ServiceProvider>) -> Result<(), LifecycleError> {
        if self.contains(provider.name()) {
            return Err(LifecycleError::duplicate(provider.name()));
        }

        let descriptor = ProviderDescriptor::new(provider);
        tracing::debug!(provider = %descriptor.name(), "Provider added to registry");
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Copy of the registered providers in registration order
    pub fn providers(&self) -> Vec<Arc<dyn ServiceProvider>> {
        self.descriptors
            .iter()
            .map(|d| Arc::clone(d.provider()))
            .collect()
    }

    /// Copy of the registered descriptors in registration order
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        self.descriptors.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.iter().any(|d| d.name() == name)
    }

    /// Get provider metadata by name
    pub fn get_metadata(&self, name: &str) -> Option<&ProviderMetadata> {
        self.descriptors
            .iter()
            .find(|d| d.name() == name)
            .map(|d| d.metadata())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
    }
}

/// Process-wide registry. Providers add themselves during start-up,
/// before any loader runs.
static GLOBAL_PROVIDERS: Lazy<RwLock<ProviderRegistry>> =
    Lazy::new(|| RwLock::new(ProviderRegistry::new()));

/// Add a provider to the process-wide registry
///
/// A duplicate name is a wiring defect; the host is expected to abort start-up on `Err`.
pub fn register_global_provider<P: ServiceProvider + 'static>(provider: P) -> Result<(), LifecycleError> {
    register_global_shared(Arc::new(provider))
}

/// Add a shared provider to the process-wide registry
pub fn register_global_shared(provider: Arc<dyn ServiceProvider>) -> Result<(), LifecycleError> {
    GLOBAL_PROVIDERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_shared(provider)
}

/// Copy of the providers in the process-wide registry
pub fn registered_providers() -> Vec<Arc<dyn ServiceProvider>> {
    GLOBAL_PROVIDERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .providers()
}

/// Snapshot of the process-wide registry
pub fn global_registry() -> ProviderRegistry {
    GLOBAL_PROVIDERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Remove every provider from the process-wide registry
///
/// This is primarily useful for testing purposes
pub fn clear_global_providers() {
    GLOBAL_PROVIDERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}
