//! Adapters bind a provider descriptor to a resolved runtime configuration.
//!
//! There is one [`Adapter`] trait with independent variants per provider kind:
//!
//! - [`HostedAdapter`]: OpenAI and Claude APIs, authenticated from the environment
//! - [`LocalAdapter`]: Ollama and OpenAI-compatible servers on a local or LAN address
//!
//! Variants share only the pure-data defaults held by the registry.
//!
//! # Example
//!
//! ```ignore
//! use cradle_providers::adapter::{init_adapter, AdapterContext};
//!
//! let ctx = AdapterContext::new(".")?;
//! let adapter = init_adapter(registry.require("ollama")?, &"conf/ollama_config.json".into(), &ctx).await?;
//! println!("{} -> {}", adapter.kind(), adapter.runtime().base_url);
//! ```

mod hosted;
pub(crate) mod local;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

pub use hosted::HostedAdapter;
pub use local::LocalAdapter;

use crate::config_file::{ConfigRef, ProviderConfigFile};
use crate::credentials::{EnvSource, ProcessEnv, credentials_for};
use crate::discovery::Prober;
use crate::registry::ProviderDescriptor;
use crate::types::{AdapterKind, EmbeddingSupport, RuntimeConfig};
use crate::{Error, Result};

/// A provider backend bound to a resolved configuration.
#[async_trait]
pub trait Adapter: Send + Sync + fmt::Debug {
    /// Adapter variant of this instance.
    fn kind(&self) -> AdapterKind;

    /// Descriptor whose defaults were applied.
    fn descriptor(&self) -> &ProviderDescriptor;

    /// Configuration resolved at construction.
    fn runtime(&self) -> &RuntimeConfig;

    /// Models offered by the backend, best-effort.
    ///
    /// Returns an empty list on any failure.
    async fn list_available_models(&self) -> Vec<String>;

    /// HTTP handle bound to the resolved base URL, model and credentials.
    fn build_client(&self) -> Result<ClientHandle>;

    /// Whether this adapter also serves embeddings.
    fn supports_embeddings(&self) -> bool {
        self.kind().embeddings() == EmbeddingSupport::Native
    }
}

/// Opaque client used by completion and embedding calls.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    kind: AdapterKind,
    base_url: String,
    model: String,
    embedding_model: Option<String>,
    http: reqwest::Client,
}

impl ClientHandle {
    pub fn kind(&self) -> AdapterKind {
        self.kind
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn embedding_model(&self) -> Option<&str> {
        self.embedding_model.as_deref()
    }

    /// Underlying HTTP client with authentication headers preset.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

/// Shared inputs for adapter construction.
#[derive(Clone)]
pub struct AdapterContext {
    /// Root that relative config paths resolve against.
    pub root: PathBuf,
    pub env: Arc<dyn EnvSource>,
    pub prober: Prober,
}

impl AdapterContext {
    /// Context reading the process environment with default probe timeouts.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            env: Arc::new(ProcessEnv),
            prober: Prober::new()?,
        })
    }

    pub fn with_env(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    pub fn with_prober(mut self, prober: Prober) -> Self {
        self.prober = prober;
        self
    }
}

impl fmt::Debug for AdapterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterContext")
            .field("root", &self.root)
            .field("prober", &self.prober)
            .finish_non_exhaustive()
    }
}

/// Overlay a parsed config file on the defaults of `descriptor`.
///
/// Missing or empty fields fall back to the descriptor, so a local
/// provider always ends up with a base URL.
pub fn runtime_config(
    descriptor: &ProviderDescriptor,
    file: &ProviderConfigFile,
    env: &dyn EnvSource,
) -> RuntimeConfig {
    let emb_model = match descriptor.adapter.embeddings() {
        EmbeddingSupport::Native => file
            .emb_model()
            .map(str::to_string)
            .or_else(|| descriptor.default_embedding_model.map(str::to_string)),
        EmbeddingSupport::Redirect(_) => None,
    };
    let (api_key, secret_key) = credentials_for(env, descriptor);

    RuntimeConfig {
        base_url: file
            .base_url()
            .map(str::to_string)
            .unwrap_or_else(|| descriptor.default_api_base()),
        comp_model: file
            .comp_model()
            .unwrap_or(descriptor.default_model)
            .to_string(),
        emb_model,
        api_key,
        secret_key,
    }
}

/// Construct the adapter variant for `descriptor` from `reference`.
///
/// # Errors
///
/// Returns [`Error::ConfigParse`] when `reference` is a path that is
/// missing or does not parse.
pub async fn init_adapter(
    descriptor: &ProviderDescriptor,
    reference: &ConfigRef,
    ctx: &AdapterContext,
) -> Result<Arc<dyn Adapter>> {
    let adapter: Arc<dyn Adapter> = if descriptor.is_local() {
        Arc::new(LocalAdapter::from_config(descriptor, reference, ctx).await?)
    } else {
        Arc::new(HostedAdapter::from_config(descriptor, reference, ctx)?)
    };
    Ok(adapter)
}

pub(crate) fn build_http(headers: reqwest::header::HeaderMap) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| Error::Request(e.to_string()))
}

pub(crate) fn handle(
    kind: AdapterKind,
    runtime: &RuntimeConfig,
    http: reqwest::Client,
) -> ClientHandle {
    ClientHandle {
        kind,
        base_url: runtime.base_url.clone(),
        model: runtime.comp_model.clone(),
        embedding_model: runtime.emb_model.clone(),
        http,
    }
}
