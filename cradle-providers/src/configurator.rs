//! Interactive setup of a local provider endpoint.
//!
//! The flow asks for a base URL, tests it against the provider's discovery
//! endpoint, offers the models the server reports and writes the provider
//! config file. Nothing is written until every prompt has been answered.

use tracing::{info, warn};
use url::Url;

use crate::adapter::local::discovery_for;
use crate::config_file::ConfigStore;
use crate::console::{Console, prompt_error};
use crate::discovery::{Prober, discovery_root};
use crate::registry::{ProviderDescriptor, ProviderRegistry};
use crate::types::RuntimeConfig;
use crate::{Error, Result};

/// Substrings that mark a model name as vision-capable.
const VISION_KEYWORDS: &[&str] = &["vision", "llava", "vl", "moondream", "pixtral", "minicpm-v"];

const RETRY: &str = "Retry connection test";
const CHANGE_URL: &str = "Enter a different URL";
const ACCEPT: &str = "Use this URL anyway";
const CANCEL: &str = "Cancel";

/// Whether `model` looks like a vision model by name.
pub fn is_vision_model(model: &str) -> bool {
    let model = model.to_lowercase();
    VISION_KEYWORDS.iter().any(|keyword| model.contains(keyword))
}

/// Normalize operator input to a server root.
///
/// Empty input yields `default`. A missing scheme gets `http://`, and a
/// trailing `/` or `/v1` is removed so the result is always a server root.
///
/// # Errors
///
/// Returns a message for input that is not an `http://` or `https://` URL.
pub fn normalize_base_url(input: &str, default: &str) -> std::result::Result<String, String> {
    let input = input.trim();
    let raw = if input.is_empty() { default } else { input };

    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    let url = discovery_root(&with_scheme).to_string();

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err("URL must start with http:// or https://".to_string());
    }
    match Url::parse(&url) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        Ok(_) => Err("URL has no host".to_string()),
        Err(e) => Err(format!("invalid URL: {e}")),
    }
}

/// Writes local provider config files from operator answers.
#[derive(Debug)]
pub struct EndpointConfigurator<'a> {
    registry: &'a ProviderRegistry,
    store: ConfigStore,
    prober: Prober,
}

enum Connectivity {
    Accepted,
    ChangeUrl,
}

impl<'a> EndpointConfigurator<'a> {
    pub fn new(registry: &'a ProviderRegistry, store: ConfigStore, prober: Prober) -> Self {
        Self {
            registry,
            store,
            prober,
        }
    }

    /// Run the interactive flow for local provider `key`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownProvider`] / [`Error::NotLocalProvider`] for bad keys
    /// - [`Error::Cancelled`] when the operator cancels or input ends
    pub async fn configure(&self, key: &str, console: &mut dyn Console) -> Result<RuntimeConfig> {
        let descriptor = self.registry.require(key)?;
        let Some(default_root) = descriptor.base_url.filter(|_| descriptor.is_local()) else {
            return Err(Error::NotLocalProvider(key.to_string()));
        };

        say(console, &format!("Configure {} Endpoint", descriptor.name))?;
        say(console, "")?;

        let root = loop {
            let answer = console
                .input("Base URL", Some(default_root))
                .map_err(prompt_error)?;
            let url = match normalize_base_url(&answer, default_root) {
                Ok(url) => url,
                Err(reason) => {
                    say(console, &format!("Invalid URL: {reason}"))?;
                    continue;
                }
            };
            match self.test_connectivity(descriptor, &url, console).await? {
                Connectivity::Accepted => break url,
                Connectivity::ChangeUrl => continue,
            }
        };

        let comp_model = self.choose_model(descriptor, &root, console).await?;
        let runtime = self.save(descriptor, &root, comp_model)?;

        say(console, "")?;
        say(console, &format!("{} configured successfully!", descriptor.name))?;
        say(console, &format!("   Model: {}", runtime.comp_model))?;
        if !is_vision_model(&runtime.comp_model) {
            say(console, "   WARNING: This model may not support vision!")?;
            say(console, "   Cradle requires vision models to process game screenshots")?;
        }
        Ok(runtime)
    }

    async fn test_connectivity(
        &self,
        descriptor: &ProviderDescriptor,
        url: &str,
        console: &mut dyn Console,
    ) -> Result<Connectivity> {
        let discovery = discovery_for(descriptor);
        let options: Vec<String> = [RETRY, CHANGE_URL, ACCEPT, CANCEL]
            .iter()
            .map(|s| s.to_string())
            .collect();

        loop {
            say(console, &format!("Testing connection to {url}..."))?;
            let outcome = self.prober.probe(discovery, url).await.outcome();
            if outcome.ok {
                say(console, &format!("✓ {outcome}"))?;
                return Ok(Connectivity::Accepted);
            }

            say(console, &format!("✗ Could not connect: {outcome}"))?;
            let choice = console
                .select("What would you like to do?", &options, 0)
                .map_err(prompt_error)?;
            match options.get(choice).map(String::as_str) {
                Some(RETRY) => continue,
                Some(CHANGE_URL) => return Ok(Connectivity::ChangeUrl),
                Some(ACCEPT) => return Ok(Connectivity::Accepted),
                _ => return Err(Error::Cancelled),
            }
        }
    }

    async fn choose_model(
        &self,
        descriptor: &ProviderDescriptor,
        root: &str,
        console: &mut dyn Console,
    ) -> Result<String> {
        say(console, "Detecting available models...")?;
        let models = self
            .prober
            .list_models(discovery_for(descriptor), root)
            .await;

        if models.is_empty() {
            say(
                console,
                &format!("   No models detected, using default: {}", descriptor.default_model),
            )?;
            return Ok(descriptor.default_model.to_string());
        }

        say(console, &format!("   Found {} model(s)", models.len()))?;
        let default = models
            .iter()
            .position(|m| m == descriptor.default_model)
            .unwrap_or(0);
        let choice = console
            .select("Select model", &models, default)
            .map_err(prompt_error)?;
        Ok(models
            .get(choice)
            .cloned()
            .unwrap_or_else(|| descriptor.default_model.to_string()))
    }

    fn save(
        &self,
        descriptor: &ProviderDescriptor,
        root: &str,
        comp_model: String,
    ) -> Result<RuntimeConfig> {
        let mut file = if self.store.exists(descriptor) {
            self.store.load(descriptor).unwrap_or_else(|e| {
                warn!(
                    provider = descriptor.key,
                    path = %self.store.path_for(descriptor).display(),
                    error = %e,
                    "replacing unreadable provider config"
                );
                Default::default()
            })
        } else {
            Default::default()
        };

        let base_url = format!("{root}/v1");
        let emb_model = file
            .emb_model()
            .map(str::to_string)
            .or_else(|| descriptor.default_embedding_model.map(str::to_string));

        file.base_url = Some(base_url.clone());
        file.comp_model = Some(comp_model.clone());
        file.emb_model = emb_model.clone();
        self.store.save(descriptor, &file)?;
        info!(provider = descriptor.key, %base_url, model = %comp_model, "configured endpoint");

        Ok(RuntimeConfig {
            base_url,
            comp_model,
            emb_model,
            api_key: None,
            secret_key: None,
        })
    }
}

fn say(console: &mut dyn Console, line: &str) -> Result<()> {
    console.println(line).map_err(prompt_error)
}
