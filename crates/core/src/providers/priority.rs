//! Load-order resolution.
//!
//! Priority per provider: an integer `priority` in its stored payload, else
//! the provider's declared priority, else [`DEFAULT_PRIORITY`]. Lower values
//! load first and ties keep registration order.

use crate::providers::{ProviderConfig, ProviderConfigStore, ProviderDescriptor, ProviderMetadata};

/// Priority of providers that declare none
pub const DEFAULT_PRIORITY: i64 = 100;

/// Payload key recognised as a priority override
pub const PRIORITY_KEY: &str = "priority";

/// Integer priority override from a payload. Non-integer values are ignored.
pub fn config_priority(config: &ProviderConfig) -> Option<i64> {
    config.get(PRIORITY_KEY).and_then(|value| value.as_i64())
}

/// Resolve the priority of a single provider
pub fn resolve_priority(metadata: &ProviderMetadata, config: Option<&ProviderConfig>) -> i64 {
    config
        .and_then(config_priority)
        .or(metadata.priority)
        .unwrap_or(DEFAULT_PRIORITY)
}

/// Stable sort of `descriptors` by resolved priority
pub fn sort_by_priority(
    descriptors: Vec<ProviderDescriptor>,
    store: &ProviderConfigStore,
) -> Vec<ProviderDescriptor> {
    let mut prioritized: Vec<(i64, ProviderDescriptor)> = descriptors
        .into_iter()
        .map(|descriptor| {
            let priority = resolve_priority(descriptor.metadata(), store.config(descriptor.name()));
            (priority, descriptor)
        })
        .collect();

    // sort_by_key is stable
    prioritized.sort_by_key(|(priority, _)| *priority);

    prioritized
        .into_iter()
        .map(|(_, descriptor)| descriptor)
        .collect()
}
