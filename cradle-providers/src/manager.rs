//! Listing, selection and persistence of the default provider.

use tracing::{info, warn};

use crate::availability::AvailabilityChecker;
use crate::console::{Console, prompt_error};
use crate::cost::{CostEstimate, estimate_cost, rate_label};
use crate::preferences::PreferenceStore;
use crate::registry::{ProviderDescriptor, ProviderRegistry};
use crate::types::CheckOutcome;
use crate::Result;

/// Availability of one provider at listing time.
#[derive(Debug, Clone)]
pub struct ProviderStatus<'a> {
    pub descriptor: &'a ProviderDescriptor,
    pub outcome: CheckOutcome,
}

impl ProviderStatus<'_> {
    pub fn key(&self) -> &'static str {
        self.descriptor.key
    }

    pub fn available(&self) -> bool {
        self.outcome.ok
    }
}

/// Setup guidance for a provider that is not available.
pub fn setup_hint(descriptor: &ProviderDescriptor) -> String {
    if descriptor.requires_credential() {
        format!("Add {} to .env file", descriptor.credential_env.join(" and "))
    } else {
        format!("Install and run {}", descriptor.name)
    }
}

fn say(console: &mut dyn Console, line: &str) -> Result<()> {
    console.println(line).map_err(prompt_error)
}

/// Orchestrates the registry, availability checks and preferences.
#[derive(Debug)]
pub struct ProviderManager<'a> {
    checker: AvailabilityChecker<'a>,
    preferences: PreferenceStore,
}

impl<'a> ProviderManager<'a> {
    pub fn new(checker: AvailabilityChecker<'a>, preferences: PreferenceStore) -> Self {
        Self {
            checker,
            preferences,
        }
    }

    pub fn registry(&self) -> &'a ProviderRegistry {
        self.checker.registry()
    }

    pub fn checker(&self) -> &AvailabilityChecker<'a> {
        &self.checker
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    /// The stored default, if it names a registered provider.
    pub fn default_provider(&self) -> Option<&'a ProviderDescriptor> {
        self.preferences
            .default_provider()
            .and_then(|key| self.registry().get(key))
    }

    /// Providers in registry order with their availability.
    ///
    /// With `show_all` false only previously configured providers are listed.
    /// Probes run one at a time in that same order.
    pub async fn list_providers(&self, show_all: bool) -> Vec<ProviderStatus<'a>> {
        let prefs = self.preferences.preferences();
        let mut statuses = Vec::new();
        for descriptor in self.registry().iter() {
            if !show_all && !prefs.is_configured(descriptor.key) {
                continue;
            }
            let outcome = self.checker.check_available(descriptor.key).await;
            statuses.push(ProviderStatus {
                descriptor,
                outcome,
            });
        }
        statuses
    }

    /// Availability of a single registered provider.
    pub async fn check(&self, key: &str) -> Result<CheckOutcome> {
        self.registry().require(key)?;
        Ok(self.checker.check_available(key).await)
    }

    /// Let the operator pick a provider by number.
    ///
    /// Returns `None` when the operator quits. Picking an unavailable
    /// provider requires an explicit confirmation; declining re-prompts.
    /// Invalid input re-prompts without limit.
    pub async fn interactive_select(
        &self,
        console: &mut dyn Console,
    ) -> Result<Option<&'a ProviderDescriptor>> {
        let providers = self.list_providers(true).await;

        say(console, "LLM Provider Selection")?;
        say(console, "")?;
        for (i, status) in providers.iter().enumerate() {
            let descriptor = status.descriptor;
            let mark = if status.available() { "✓" } else { "✗" };
            say(
                console,
                &format!(
                    "{}. [{mark}] {:<25} {:<6} {}",
                    i + 1,
                    descriptor.name,
                    descriptor.kind().label(),
                    rate_label(descriptor)
                ),
            )?;
            say(console, &format!("     Status: {}", status.outcome))?;
            if !status.available() {
                say(console, &format!("     Setup: {}", setup_hint(descriptor)))?;
            }
        }
        say(console, "")?;

        let prompt = format!("Select provider (1-{}) or 'q' to quit", providers.len());
        loop {
            let answer = console.input(&prompt, None).map_err(prompt_error)?;
            let answer = answer.trim();
            if answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }

            let Ok(choice) = answer.parse::<usize>() else {
                say(console, "Please enter a number or 'q'.")?;
                continue;
            };
            let Some(status) = choice.checked_sub(1).and_then(|i| providers.get(i)) else {
                say(console, "Invalid choice. Try again.")?;
                continue;
            };

            if !status.available() {
                say(
                    console,
                    &format!("{} is not currently available.", status.descriptor.name),
                )?;
                let anyway = console
                    .confirm("Select anyway?", false)
                    .map_err(prompt_error)?;
                if !anyway {
                    continue;
                }
            }
            return Ok(Some(status.descriptor));
        }
    }

    /// Make `key` the default and mark it configured, then persist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProvider`](crate::Error::UnknownProvider) if
    /// `key` is not registered.
    pub fn set_default(&mut self, key: &str) -> Result<&'a ProviderDescriptor> {
        let descriptor = self.registry().require(key)?;

        let configured = self.checker.check_configured(key);
        if !configured.ok {
            warn!(provider = key, status = %configured, "setting an unconfigured provider as default");
        }

        let prefs = self.preferences.preferences_mut();
        prefs.default_provider = Some(descriptor.key.to_string());
        prefs.add_configured(descriptor.key);
        self.preferences.save()?;
        info!(provider = key, "default provider set");
        Ok(descriptor)
    }

    /// Add `key` to the configured set without changing the default.
    ///
    /// Returns whether the set changed. Nothing is written when it did not.
    pub fn record_configured(&mut self, key: &str) -> Result<bool> {
        let descriptor = self.registry().require(key)?;
        if !self.preferences.preferences_mut().add_configured(descriptor.key) {
            return Ok(false);
        }
        self.preferences.save()?;
        Ok(true)
    }

    /// Cost of `tokens` on `key`.
    pub fn estimate_cost(&self, key: &str, tokens: u64) -> Result<CostEstimate> {
        let descriptor = self.registry().require(key)?;
        Ok(estimate_cost(descriptor, tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::ConfigStore;
    use crate::console::scripted::ScriptedConsole;
    use crate::discovery::Prober;
    use crate::preferences::LoadOrigin;
    use crate::Error;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    const PREFS: &str = ".cradle_providers.json";

    /// Project where every local provider points at a closed port.
    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let conf = dir.path().join("conf");
        fs::create_dir_all(&conf).unwrap();
        for name in ["ollama", "lmstudio", "vllm"] {
            fs::write(
                conf.join(format!("{name}_config.json")),
                format!(r#"{{"base_url": "http://127.0.0.1:{port}/v1"}}"#),
            )
            .unwrap();
        }
        dir
    }

    fn manager<'a>(
        registry: &'a ProviderRegistry,
        dir: &TempDir,
        env: &[(&str, &str)],
    ) -> ProviderManager<'a> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let prober =
            Prober::with_timeouts(Duration::from_millis(200), Duration::from_millis(200)).unwrap();
        let checker =
            AvailabilityChecker::new(registry, ConfigStore::new(dir.path()), Arc::new(env), prober);
        ProviderManager::new(checker, PreferenceStore::load(dir.path().join(PREFS)))
    }

    #[tokio::test]
    async fn list_providers_keeps_registry_order() {
        let dir = project();
        let registry = ProviderRegistry::builtin();
        let manager = manager(&registry, &dir, &[]);

        let keys: Vec<_> = manager
            .list_providers(true)
            .await
            .iter()
            .map(ProviderStatus::key)
            .collect();
        assert_eq!(keys, registry.keys());
    }

    #[tokio::test]
    async fn list_configured_only_filters_by_preferences() {
        let dir = project();
        let registry = ProviderRegistry::builtin();
        let mut manager = manager(&registry, &dir, &[]);
        manager.record_configured("vllm").unwrap();
        manager.record_configured("openai").unwrap();

        let statuses = manager.list_providers(false).await;
        let keys: Vec<_> = statuses.iter().map(ProviderStatus::key).collect();
        assert_eq!(keys, vec!["openai", "vllm"]);
        assert_eq!(statuses[1].outcome, CheckOutcome::fail("Not running"));
    }

    #[tokio::test]
    async fn select_never_returns_unavailable_without_confirmation() {
        let dir = project();
        let registry = ProviderRegistry::builtin();
        let manager = manager(&registry, &dir, &[]);

        let mut console = ScriptedConsole::new()
            .with_input("9")
            .with_input("two")
            .with_input("4")
            .with_confirm(false)
            .with_input("q");
        let selected = manager.interactive_select(&mut console).await.unwrap();

        assert!(selected.is_none());
        assert_eq!(console.confirm_prompts.len(), 1);
        let output = console.output();
        assert!(output.contains("Invalid choice. Try again."));
        assert!(output.contains("Please enter a number or 'q'."));
        assert!(output.contains("Ollama (Local) is not currently available."));
    }

    #[tokio::test]
    async fn select_unavailable_after_confirmation() {
        let dir = project();
        let registry = ProviderRegistry::builtin();
        let manager = manager(&registry, &dir, &[]);

        let mut console = ScriptedConsole::new().with_input("5").with_confirm(true);
        let selected = manager.interactive_select(&mut console).await.unwrap();

        assert_eq!(selected.map(|d| d.key), Some("lmstudio"));
        assert_eq!(console.confirm_prompts, vec!["Select anyway?"]);
    }

    #[tokio::test]
    async fn select_available_needs_no_confirmation() {
        let dir = project();
        fs::write(dir.path().join("conf/openai_config.json"), "{}").unwrap();
        let registry = ProviderRegistry::builtin();
        let manager = manager(&registry, &dir, &[("OA_OPENAI_KEY", "sk")]);

        let mut console = ScriptedConsole::new().with_input(" 1 ");
        let selected = manager.interactive_select(&mut console).await.unwrap();

        assert_eq!(selected.map(|d| d.key), Some("openai"));
        assert!(console.confirm_prompts.is_empty());
        assert!(console.output().contains("Setup: Add OA_CLAUDE_KEY to .env file"));
        assert!(console.output().contains("Setup: Install and run vLLM (Local)"));
    }

    #[tokio::test]
    async fn exhausted_input_cancels_selection() {
        let dir = project();
        let registry = ProviderRegistry::builtin();
        let manager = manager(&registry, &dir, &[]);

        let mut console = ScriptedConsole::new();
        let err = manager.interactive_select(&mut console).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn set_default_persists_and_marks_configured() {
        let dir = project();
        let registry = ProviderRegistry::builtin();
        let mut manager = manager(&registry, &dir, &[]);

        let descriptor = manager.set_default("ollama").unwrap();
        assert_eq!(descriptor.name, "Ollama (Local)");

        let reloaded = PreferenceStore::load(dir.path().join(PREFS));
        assert_eq!(reloaded.origin(), LoadOrigin::Loaded);
        assert_eq!(reloaded.default_provider(), Some("ollama"));
        assert_eq!(reloaded.preferences().configured_providers, vec!["ollama"]);
    }

    #[test]
    fn switching_default_keeps_single_default() {
        let dir = project();
        let registry = ProviderRegistry::builtin();
        let mut manager = manager(&registry, &dir, &[]);

        manager.set_default("ollama").unwrap();
        manager.set_default("vllm").unwrap();

        assert_eq!(manager.default_provider().map(|d| d.key), Some("vllm"));
        assert_eq!(
            manager.preferences().preferences().configured_providers,
            vec!["ollama", "vllm"]
        );
    }

    #[test]
    fn set_default_unknown_key_leaves_file_untouched() {
        let dir = project();
        let registry = ProviderRegistry::builtin();
        let mut manager = manager(&registry, &dir, &[]);

        let err = manager.set_default("gemini").unwrap_err();
        assert!(matches!(err, Error::UnknownProvider(ref key) if key == "gemini"));
        assert!(!dir.path().join(PREFS).exists());
    }

    #[test]
    fn record_configured_does_not_touch_default() {
        let dir = project();
        let registry = ProviderRegistry::builtin();
        let mut manager = manager(&registry, &dir, &[]);

        assert!(manager.record_configured("lmstudio").unwrap());
        assert!(!manager.record_configured("lmstudio").unwrap());
        assert!(manager.default_provider().is_none());
    }

    #[test]
    fn estimate_cost_for_unknown_key_fails() {
        let dir = project();
        let registry = ProviderRegistry::builtin();
        let manager = manager(&registry, &dir, &[]);

        assert!(matches!(
            manager.estimate_cost("gemini", 10),
            Err(Error::UnknownProvider(_))
        ));
        assert_eq!(
            manager.estimate_cost("claude", 1000).unwrap().cost_usd,
            0.018
        );
    }

    #[test]
    fn setup_hints() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(
            setup_hint(registry.get("claude-aws").unwrap()),
            "Add RF_CLAUDE_AK and RF_CLAUDE_SK to .env file"
        );
    }
}
