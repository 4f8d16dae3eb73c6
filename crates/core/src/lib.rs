//! Service-provider lifecycle engine.
//!
//! Providers register themselves in a process-wide registry at start-up. A
//! [`ProviderLoader`] then takes the enabled ones, orders them by priority
//! and drives them through two serial phases: every provider registers, then
//! every registered provider boots.

pub mod config;
pub mod errors;
pub mod logging;
pub mod providers;

pub use config::{ConfigError, ProviderEntry, ProviderSettings};
pub use errors::{LifecycleError, ProviderError};
pub use logging::{init_logging, LoggingConfig};
pub use providers::{
    clear_global_providers, register_global_provider, registered_providers, Configurable,
    LoadReport, ProviderConfig, ProviderLoader, ProviderRegistry, ServiceProvider,
    DEFAULT_PRIORITY,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
