use thiserror::Error;

/// Error raised by a provider from one of its lifecycle callbacks
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Registration failed: {message}")]
    Registration { message: String },

    #[error("Boot failed: {message}")]
    Boot { message: String },

    #[error("Host application is not a `{expected}`")]
    HostMismatch { expected: &'static str },

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new registration error
    pub fn registration(message: impl Into<String>) -> Self {
        Self::Registration {
            message: message.into(),
        }
    }

    /// Create a new boot error
    pub fn boot(message: impl Into<String>) -> Self {
        Self::Boot {
            message: message.into(),
        }
    }

    /// Wrap any error raised inside a provider callback
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other(Box::new(error))
    }

    /// Check if the error came from `Configurable::configure`
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Check if the host passed to the provider had an unexpected type
    pub fn is_host_mismatch(&self) -> bool {
        matches!(self, Self::HostMismatch { .. })
    }
}
