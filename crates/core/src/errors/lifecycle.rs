use crate::errors::ProviderError;
use thiserror::Error;

/// Error raised by the provider registry or the loader
///
/// Every load failure names the provider it came from and keeps the
/// provider's own error as its `source()`.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("provider with name '{name}' already registered")]
    DuplicateProvider { name: String },

    #[error("failed to configure provider '{provider}': {source}")]
    Configure {
        provider: String,
        #[source]
        source: ProviderError,
    },

    #[error("failed to register provider '{provider}': {source}")]
    Register {
        provider: String,
        #[source]
        source: ProviderError,
    },

    #[error("failed to boot provider '{provider}': {source}")]
    Boot {
        provider: String,
        #[source]
        source: ProviderError,
    },
}

impl LifecycleError {
    /// Create a duplicate provider error
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateProvider { name: name.into() }
    }

    /// Name of the provider that caused the error
    pub fn provider_name(&self) -> &str {
        match self {
            Self::DuplicateProvider { name } => name,
            Self::Configure { provider, .. }
            | Self::Register { provider, .. }
            | Self::Boot { provider, .. } => provider,
        }
    }

    /// Check if the error is a duplicate registration
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateProvider { .. })
    }

    /// The provider's own error, if the failure happened during a load
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::DuplicateProvider { .. } => None,
            Self::Configure { source, .. }
            | Self::Register { source, .. }
            | Self::Boot { source, .. } => Some(source),
        }
    }
}
