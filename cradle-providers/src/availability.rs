//! Two-phase provider checks: configured, then available.
//!
//! `check_configured` never touches the network. `check_available` adds a
//! single discovery probe for local providers; hosted providers are trusted
//! once their credential is present.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::local::discovery_for;
use crate::config_file::ConfigStore;
use crate::credentials::{EnvSource, missing_credential};
use crate::discovery::Prober;
use crate::registry::{ProviderDescriptor, ProviderRegistry};
use crate::types::CheckOutcome;

/// Probes providers in a registry against their config files and environment.
#[derive(Clone)]
pub struct AvailabilityChecker<'a> {
    registry: &'a ProviderRegistry,
    store: ConfigStore,
    env: Arc<dyn EnvSource>,
    prober: Prober,
}

impl<'a> AvailabilityChecker<'a> {
    pub fn new(
        registry: &'a ProviderRegistry,
        store: ConfigStore,
        env: Arc<dyn EnvSource>,
        prober: Prober,
    ) -> Self {
        Self {
            registry,
            store,
            env,
            prober,
        }
    }

    pub fn registry(&self) -> &'a ProviderRegistry {
        self.registry
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn prober(&self) -> &Prober {
        &self.prober
    }

    /// Whether `key` has a config file and, for hosted providers, credentials.
    pub fn check_configured(&self, key: &str) -> CheckOutcome {
        let Some(descriptor) = self.registry.get(key) else {
            return CheckOutcome::fail(format!("Unknown provider: {key}"));
        };

        if !self.store.exists(descriptor) {
            return CheckOutcome::fail(format!(
                "Config file not found: {}",
                self.store.display_path(descriptor).display()
            ));
        }

        if descriptor.is_local() {
            return CheckOutcome::ok("Configuration found");
        }

        match missing_credential(self.env.as_ref(), descriptor) {
            Some(var) => CheckOutcome::fail(format!("API key not found: {var}")),
            None => CheckOutcome::ok("Configured with API key"),
        }
    }

    /// Whether `key` can be used right now.
    ///
    /// Returns the `check_configured` failure unchanged when not configured.
    pub async fn check_available(&self, key: &str) -> CheckOutcome {
        let configured = self.check_configured(key);
        if !configured.ok {
            return configured;
        }
        let Some(descriptor) = self.registry.get(key) else {
            return configured;
        };

        if !descriptor.is_local() {
            return CheckOutcome::ok("API key configured");
        }

        let base = self.base_url(descriptor);
        let result = self.prober.probe(discovery_for(descriptor), &base).await;
        debug!(provider = key, base_url = %base, ?result, "probed local provider");
        result.outcome()
    }

    /// Base URL from the provider's config file, or the descriptor default.
    pub fn base_url(&self, descriptor: &ProviderDescriptor) -> String {
        match self.store.load(descriptor) {
            Ok(file) => file
                .base_url()
                .map(str::to_string)
                .unwrap_or_else(|| descriptor.default_api_base()),
            Err(e) => {
                debug!(provider = descriptor.key, error = %e, "using default base URL");
                descriptor.default_api_base()
            }
        }
    }
}

impl std::fmt::Debug for AvailabilityChecker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityChecker")
            .field("store", &self.store)
            .field("prober", &self.prober)
            .finish_non_exhaustive()
    }
}
