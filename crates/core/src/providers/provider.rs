use crate::errors::ProviderError;
use std::any::Any;

/// Configuration payload handed to a provider: string keys, arbitrary values.
///
/// The loader only interprets the integer `priority` key; everything else
/// belongs to the provider.
pub type ProviderConfig = serde_json::Map<String, serde_json::Value>;

/// Capability for providers that accept a configuration payload before registration
pub trait Configurable: Send + Sync {
    /// Apply the payload stored for this provider
    fn configure(&self, config: &ProviderConfig) -> Result<(), ProviderError>;
}

/// Service provider trait: a module that wires itself into a host application
///
/// The host is passed as `&mut dyn Any`; use [`host_mut`] to recover the
/// concrete application type.
pub trait ServiceProvider: Send + Sync {
    /// Provider name, unique within a registry
    fn name(&self) -> &str;

    /// Wire services into the host. Peer providers may not be registered yet.
    fn register(&self, app: &mut dyn Any) -> Result<(), ProviderError>;

    /// Start the provider once every enabled provider has registered
    fn boot(&self, app: &mut dyn Any) -> Result<(), ProviderError>;

    /// Declared load priority, lower loads first
    fn priority(&self) -> Option<i64> {
        None
    }

    /// Whether a boot failure of this provider is tolerated
    fn is_optional(&self) -> bool {
        false
    }

    /// Configuration capability, if the provider accepts a payload
    fn configurable(&self) -> Option<&dyn Configurable> {
        None
    }

    /// Provider description
    fn description(&self) -> Option<&str> {
        None
    }
}

/// Capabilities of a provider, captured once when it is registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    pub name: String,
    pub description: Option<String>,
    pub priority: Option<i64>,
    pub is_optional: bool,
    pub configurable: bool,
}

impl ProviderMetadata {
    /// Create metadata from a provider
    pub fn from_provider<P: ServiceProvider + ?Sized>(provider: &P) -> Self {
        Self {
            name: provider.name().to_string(),
            description: provider.description().map(|d| d.to_string()),
            priority: provider.priority(),
            is_optional: provider.is_optional(),
            configurable: provider.configurable().is_some(),
        }
    }
}

/// Downcast the opaque host application to its concrete type
pub fn host_mut<T: Any>(app: &mut dyn Any) -> Result<&mut T, ProviderError> {
    app.downcast_mut::<T>()
        .ok_or(ProviderError::HostMismatch {
            expected: std::any::type_name::<T>(),
        })
}

/// Macro to simplify provider creation
///
/// ```
/// use bootline_core::provider;
/// use bootline_core::providers::host_mut;
///
/// let logging = provider! {
///     name: "logging",
///     priority: 10,
///     register: |app| {
///         host_mut::<Vec<String>>(app)?.push("logging".to_string());
///         Ok(())
///     },
///     boot: |_app| { Ok(()) }
/// };
/// ```
#[macro_export]
macro_rules! provider {
    (
        name: $name:expr,
        $(description: $description:expr,)?
        $(priority: $priority:expr,)?
        $(optional: $optional:expr,)?
        register: |$register_app:ident| $register:block,
        boot: |$boot_app:ident| $boot:block
    ) => {
        {
            struct CustomProvider;

            impl $crate::providers::ServiceProvider for CustomProvider {
                fn name(&self) -> &str {
                    $name
                }

                $(fn description(&self) -> Option<&str> {
                    Some($description)
                })?

                $(fn priority(&self) -> Option<i64> {
                    Some($priority)
                })?

                $(fn is_optional(&self) -> bool {
                    $optional
                })?

                fn register(&self, $register_app: &mut dyn ::std::any::Any)
                    -> Result<(), $crate::errors::ProviderError>
                {
                    $register
                }

                fn boot(&self, $boot_app: &mut dyn ::std::any::Any)
                    -> Result<(), $crate::errors::ProviderError>
                {
                    $boot
                }
            }

            CustomProvider
        }
    };
}
