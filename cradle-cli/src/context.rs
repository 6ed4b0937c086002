//! Per-invocation state shared by commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use cradle_providers::{
    AdapterContext, AvailabilityChecker, ConfigStore, EndpointConfigurator, EnvSource,
    PreferenceStore, ProcessEnv, Prober, ProviderDescriptor, ProviderFactory, ProviderManager,
    ProviderRegistry,
};
use tracing::{debug, warn};

use crate::config::{ConfigLoader, CradleConfig};

/// Everything a command needs, built once at startup.
pub struct AppContext {
    root: PathBuf,
    config: CradleConfig,
    registry: ProviderRegistry,
    env: Arc<dyn EnvSource>,
    prober: Prober,
}

impl AppContext {
    /// Load `.env` and layered settings for the project at `root`.
    pub fn load(root: PathBuf) -> Result<Self> {
        load_dotenv(&root);
        let config = ConfigLoader::load(&root)?;
        let prober = Prober::with_timeouts(
            config.probe.timeout(),
            config.probe.model_list_timeout(),
        )?;
        Ok(Self {
            root,
            config,
            registry: ProviderRegistry::builtin(),
            env: Arc::new(ProcessEnv),
            prober,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &CradleConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Descriptor for `key`, or an error listing the registered keys.
    pub fn require(&self, key: &str) -> Result<&ProviderDescriptor> {
        match self.registry.get(key) {
            Some(descriptor) => Ok(descriptor),
            None => bail!(
                "Unknown provider: {key}\nAvailable: {}",
                self.registry.keys().join(", ")
            ),
        }
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(&self.root).with_conf_dir(&self.config.paths.conf_dir)
    }

    pub fn preferences(&self) -> PreferenceStore {
        PreferenceStore::load(self.root.join(&self.config.paths.preferences_file))
    }

    pub fn checker(&self) -> AvailabilityChecker<'_> {
        AvailabilityChecker::new(
            &self.registry,
            self.store(),
            Arc::clone(&self.env),
            self.prober.clone(),
        )
    }

    pub fn manager(&self) -> ProviderManager<'_> {
        ProviderManager::new(self.checker(), self.preferences())
    }

    pub fn factory(&self) -> ProviderFactory<'_> {
        let ctx = AdapterContext {
            root: self.root.clone(),
            env: Arc::clone(&self.env),
            prober: self.prober.clone(),
        };
        ProviderFactory::new(&self.registry, ctx)
    }

    pub fn configurator(&self) -> EndpointConfigurator<'_> {
        EndpointConfigurator::new(&self.registry, self.store(), self.prober.clone())
    }
}

fn load_dotenv(root: &Path) {
    let path = root.join(".env");
    match dotenvy::from_path(&path) {
        Ok(()) => debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(path = %path.display(), error = %e, "could not load environment file"),
    }
}
