//! Integration tests for the process-wide registry and the two-phase loader.
//!
//! Every test resets the global registry and runs serially.

use std::any::Any;
use std::sync::{Arc, Mutex};

use bootline_core::providers::{
    clear_global_providers, register_global_provider, register_global_shared,
    registered_providers, Configurable, ProviderConfig, ProviderLoader, ServiceProvider,
};
use bootline_core::{LifecycleError, ProviderError, ProviderSettings};
use serde_json::json;
use serial_test::serial;

type Events = Arc<Mutex<Vec<String>>>;

/// Call-tracking provider with every optional capability
struct MockProvider {
    name: String,
    priority: Option<i64>,
    optional: bool,
    configurable: bool,
    configure_err: bool,
    register_err: bool,
    boot_err: bool,
    received_config: Mutex<Option<ProviderConfig>>,
    events: Events,
}

impl MockProvider {
    fn new(name: &str, events: &Events) -> Self {
        Self {
            name: name.to_string(),
            priority: None,
            optional: false,
            configurable: false,
            configure_err: false,
            register_err: false,
            boot_err: false,
            received_config: Mutex::new(None),
            events: Arc::clone(events),
        }
    }

    fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn accepting_config(mut self) -> Self {
        self.configurable = true;
        self
    }

    fn failing_configure(mut self) -> Self {
        self.configurable = true;
        self.configure_err = true;
        self
    }

    fn failing_register(mut self) -> Self {
        self.register_err = true;
        self
    }

    fn failing_boot(mut self) -> Self {
        self.boot_err = true;
        self
    }

    fn record(&self, event: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{}.{}", self.name, event));
    }
}

impl Configurable for MockProvider {
    fn configure(&self, config: &ProviderConfig) -> Result<(), ProviderError> {
        self.record("configure");
        if self.configure_err {
            return Err(ProviderError::configuration("bad payload"));
        }
        *self.received_config.lock().unwrap() = Some(config.clone());
        Ok(())
    }
}

impl ServiceProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn register(&self, _app: &mut dyn Any) -> Result<(), ProviderError> {
        self.record("register");
        if self.register_err {
            return Err(ProviderError::registration("register error"));
        }
        Ok(())
    }

    fn boot(&self, _app: &mut dyn Any) -> Result<(), ProviderError> {
        self.record("boot");
        if self.boot_err {
            return Err(ProviderError::boot("boot error"));
        }
        Ok(())
    }

    fn priority(&self) -> Option<i64> {
        self.priority
    }

    fn is_optional(&self) -> bool {
        self.optional
    }

    fn configurable(&self) -> Option<&dyn Configurable> {
        if self.configurable {
            Some(self)
        } else {
            None
        }
    }
}

struct App;

fn events() -> Events {
    Arc::new(Mutex::new(Vec::new()))
}

fn recorded(events: &Events) -> Vec<String> {
    events.lock().unwrap().clone()
}

fn payload(value: serde_json::Value) -> ProviderConfig {
    value.as_object().cloned().unwrap()
}

#[test]
#[serial]
fn test_registry_count_and_copy_isolation() {
    clear_global_providers();
    let events = events();

    for i in 0..4 {
        register_global_provider(MockProvider::new(&format!("provider{}", i), &events)).unwrap();
    }

    let mut providers = registered_providers();
    assert_eq!(providers.len(), 4);
    providers.pop();
    providers.pop();
    assert_eq!(registered_providers().len(), 4);
}

#[test]
#[serial]
fn test_duplicate_name_fails_before_load() {
    clear_global_providers();
    let events = events();

    register_global_provider(MockProvider::new("duplicate", &events)).unwrap();
    let err = register_global_provider(MockProvider::new("duplicate", &events)).unwrap_err();

    assert!(matches!(err, LifecycleError::DuplicateProvider { ref name } if name == "duplicate"));
    assert_eq!(registered_providers().len(), 1);
    assert!(recorded(&events).is_empty());
}

#[test]
#[serial]
fn test_disabled_provider_is_never_called() {
    clear_global_providers();
    let events = events();

    register_global_provider(MockProvider::new("enabled", &events)).unwrap();
    register_global_provider(MockProvider::new("disabled", &events).accepting_config()).unwrap();

    let mut loader = ProviderLoader::new();
    loader.set_provider_enabled("disabled", false);
    loader.set_provider_config("disabled", payload(json!({ "key": "value" })));

    let report = loader.load_providers(&mut App).unwrap();

    assert_eq!(recorded(&events), vec!["enabled.register", "enabled.boot"]);
    assert_eq!(report.skipped, vec!["disabled"]);
    assert_eq!(report.provider_count(), 1);
    assert_eq!(registered_providers().len(), 2);
}

#[test]
#[serial]
fn test_priority_order_and_phase_separation() {
    clear_global_providers();
    let events = events();

    register_global_provider(MockProvider::new("ninety", &events).with_priority(90)).unwrap();
    register_global_provider(MockProvider::new("ten", &events).with_priority(10)).unwrap();
    register_global_provider(MockProvider::new("fifty", &events).with_priority(50)).unwrap();

    ProviderLoader::new().load_providers(&mut App).unwrap();

    assert_eq!(
        recorded(&events),
        vec![
            "ten.register",
            "fifty.register",
            "ninety.register",
            "ten.boot",
            "fifty.boot",
            "ninety.boot",
        ]
    );
}

#[test]
#[serial]
fn test_config_priority_overrides_declared() {
    clear_global_providers();
    let events = events();

    register_global_provider(MockProvider::new("overridden", &events).with_priority(50)).unwrap();
    register_global_provider(MockProvider::new("sixty", &events).with_priority(60)).unwrap();

    let loader =
        ProviderLoader::new().with_provider_config("overridden", payload(json!({ "priority": 80 })));
    let report = loader.load_providers(&mut App).unwrap();

    assert_eq!(report.loaded, vec!["sixty", "overridden"]);
}

#[test]
#[serial]
fn test_default_priority_sits_between_and_keeps_ties() {
    clear_global_providers();
    let events = events();

    register_global_provider(MockProvider::new("late", &events).with_priority(150)).unwrap();
    register_global_provider(MockProvider::new("plain1", &events)).unwrap();
    register_global_provider(MockProvider::new("early", &events).with_priority(99)).unwrap();
    register_global_provider(MockProvider::new("plain2", &events)).unwrap();
    register_global_provider(MockProvider::new("explicit100", &events).with_priority(100)).unwrap();

    let report = ProviderLoader::new().load_providers(&mut App).unwrap();

    assert_eq!(
        report.loaded,
        vec!["early", "plain1", "plain2", "explicit100", "late"]
    );
}

#[test]
#[serial]
fn test_register_failure_aborts_before_boot() {
    clear_global_providers();
    let events = events();

    register_global_provider(MockProvider::new("ok", &events).with_priority(1)).unwrap();
    register_global_provider(MockProvider::new("broken", &events).with_priority(2).failing_register())
        .unwrap();
    register_global_provider(MockProvider::new("never", &events).with_priority(3)).unwrap();

    let err = ProviderLoader::new().load_providers(&mut App).unwrap_err();

    assert!(matches!(err, LifecycleError::Register { .. }));
    assert_eq!(err.provider_name(), "broken");
    assert!(err.to_string().contains("failed to register provider 'broken'"));
    assert_eq!(recorded(&events), vec!["ok.register", "broken.register"]);
}

#[test]
#[serial]
fn test_configure_failure_aborts_load() {
    clear_global_providers();
    let events = events();

    register_global_provider(MockProvider::new("picky", &events).failing_configure()).unwrap();

    let loader = ProviderLoader::new().with_provider_config("picky", ProviderConfig::new());
    let err = loader.load_providers(&mut App).unwrap_err();

    assert!(matches!(err, LifecycleError::Configure { .. }));
    assert!(err.provider_error().unwrap().is_configuration());
    assert_eq!(recorded(&events), vec!["picky.configure"]);
}

#[test]
#[serial]
fn test_configure_skipped_without_payload() {
    clear_global_providers();
    let events = events();

    register_global_provider(MockProvider::new("picky", &events).failing_configure()).unwrap();

    ProviderLoader::new().load_providers(&mut App).unwrap();
    assert_eq!(recorded(&events), vec!["picky.register", "picky.boot"]);
}

#[test]
#[serial]
fn test_optional_boot_failure_continues() {
    clear_global_providers();
    let events = events();

    register_global_provider(
        MockProvider::new("flaky", &events)
            .with_priority(1)
            .optional()
            .failing_boot(),
    )
    .unwrap();
    register_global_provider(MockProvider::new("after", &events).with_priority(2)).unwrap();

    let report = ProviderLoader::new().load_providers(&mut App).unwrap();

    assert!(recorded(&events).contains(&"after.boot".to_string()));
    assert_eq!(report.optional_failures.len(), 1);
    assert_eq!(report.optional_failures[0].provider, "flaky");
    assert_eq!(report.booted(), vec!["after"]);
}

#[test]
#[serial]
fn test_required_boot_failure_aborts() {
    clear_global_providers();
    let events = events();

    register_global_provider(MockProvider::new("required", &events).with_priority(1).failing_boot())
        .unwrap();
    register_global_provider(MockProvider::new("after", &events).with_priority(2)).unwrap();

    let err = ProviderLoader::new().load_providers(&mut App).unwrap_err();

    assert!(matches!(err, LifecycleError::Boot { .. }));
    assert_eq!(err.provider_name(), "required");
    assert_eq!(
        recorded(&events),
        vec!["required.register", "after.register", "required.boot"]
    );
}

#[test]
#[serial]
fn test_end_to_end_call_sequence() {
    clear_global_providers();
    let events = events();

    let b = Arc::new(MockProvider::new("B", &events).with_priority(50).accepting_config());
    register_global_provider(MockProvider::new("A", &events).with_priority(10)).unwrap();
    register_global_shared(b.clone()).unwrap();
    register_global_provider(MockProvider::new("C", &events)).unwrap();

    let mut loader = ProviderLoader::new();
    loader.set_provider_config("B", payload(json!({ "key": "value" })));

    let report = loader.load_providers(&mut App).unwrap();

    assert_eq!(
        recorded(&events),
        vec![
            "A.register",
            "B.configure",
            "B.register",
            "C.register",
            "A.boot",
            "B.boot",
            "C.boot",
        ]
    );
    assert_eq!(
        b.received_config.lock().unwrap().clone(),
        Some(payload(json!({ "key": "value" })))
    );
    assert_eq!(report.provider_count(), 3);
    assert!(report.optional_failures.is_empty());
}

#[test]
#[serial]
fn test_settings_document_drives_load() {
    clear_global_providers();
    let events = events();

    register_global_provider(MockProvider::new("database", &events).accepting_config()).unwrap();
    register_global_provider(MockProvider::new("router", &events).with_priority(20)).unwrap();
    register_global_provider(MockProvider::new("metrics", &events)).unwrap();

    let settings = ProviderSettings::from_yaml_str(
        r#"
providers:
  database:
    priority: 5
    config:
      url: postgres://localhost/app
  metrics:
    enabled: false
"#,
    )
    .unwrap();

    let report = settings.to_loader().load_providers(&mut App).unwrap();

    assert_eq!(report.loaded, vec!["database", "router"]);
    assert_eq!(report.skipped, vec!["metrics"]);
    assert_eq!(
        recorded(&events),
        vec![
            "database.configure",
            "database.register",
            "router.register",
            "database.boot",
            "router.boot",
        ]
    );
}
