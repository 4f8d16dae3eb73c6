//! Example: wiring a small host application from self-registering providers
//!
//! Run with `RUST_LOG=bootline_core=debug` to see every lifecycle step.

use bootline_core::provider;
use bootline_core::providers::{host_mut, register_global_provider, Configurable};
use bootline_core::{
    init_logging, LifecycleError, LoggingConfig, ProviderConfig, ProviderError, ProviderSettings,
    ServiceProvider,
};
use std::any::Any;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct HostApp {
    services: Vec<String>,
    database_url: Option<String>,
    listening: bool,
}

struct DatabaseProvider {
    url: Mutex<String>,
}

impl Configurable for DatabaseProvider {
    fn configure(&self, config: &ProviderConfig) -> Result<(), ProviderError> {
        if let Some(url) = config.get("url").and_then(|v| v.as_str()) {
            *self.url.lock().map_err(|_| ProviderError::configuration("poisoned"))? = url.to_string();
        }
        Ok(())
    }
}

impl ServiceProvider for DatabaseProvider {
    fn name(&self) -> &str {
        "database"
    }

    fn register(&self, app: &mut dyn Any) -> Result<(), ProviderError> {
        let host = host_mut::<HostApp>(app)?;
        let url = self
            .url
            .lock()
            .map_err(|_| ProviderError::registration("poisoned"))?
            .clone();
        host.services.push("database".to_string());
        host.database_url = Some(url);
        Ok(())
    }

    fn boot(&self, app: &mut dyn Any) -> Result<(), ProviderError> {
        let host = host_mut::<HostApp>(app)?;
        if host.database_url.is_none() {
            return Err(ProviderError::boot("no database url"));
        }
        Ok(())
    }

    fn priority(&self) -> Option<i64> {
        Some(10)
    }

    fn configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }
}

const SETTINGS: &str = r#"
providers:
  database:
    config:
      url: postgres://localhost/demo
  telemetry:
    enabled: true
"#;

fn register_providers() -> Result<(), LifecycleError> {
    register_global_provider(DatabaseProvider {
        url: Mutex::new("postgres://localhost/default".to_string()),
    })?;

    register_global_provider(provider! {
        name: "router",
        priority: 50,
        register: |app| {
            host_mut::<HostApp>(app)?.services.push("router".to_string());
            Ok(())
        },
        boot: |app| {
            host_mut::<HostApp>(app)?.listening = true;
            Ok(())
        }
    })?;

    register_global_provider(provider! {
        name: "telemetry",
        optional: true,
        register: |_app| { Ok(()) },
        boot: |_app| {
            Err(ProviderError::boot("collector unreachable"))
        }
    })
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging(&LoggingConfig::development())?;

    register_providers()?;

    let loader = ProviderSettings::from_yaml_str(SETTINGS)?
        .with_env_overrides()
        .to_loader();

    let mut app = HostApp::default();
    let report = loader.load_providers(&mut app)?;

    println!("Loaded {:?} (load {})", report.loaded, report.load_id);
    println!("Optional failures: {:?}", report.optional_failures);
    println!("Host: {:?}", app);
    Ok(())
}
