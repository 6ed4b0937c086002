//! Static catalog of provider descriptors.
//!
//! The registry is built once at process start and passed by reference into
//! the factory, checker and manager. Declaration order is significant: it is
//! the order providers are listed, probed and numbered in.

use std::path::Path;

use crate::discovery::Discovery;
use crate::types::{AdapterKind, ProviderKind};
use crate::{Error, Result};

/// Default embedding model for self-hosted servers.
pub const LOCAL_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Immutable description of one provider's defaults and capabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDescriptor {
    /// Unique id, e.g. `"ollama"`.
    pub key: &'static str,
    /// Human-friendly name, e.g. `"Ollama (Local)"`.
    pub name: &'static str,
    /// Adapter variant used for this provider.
    pub adapter: AdapterKind,
    /// Config file path relative to the project root.
    pub config_file: &'static str,
    /// Environment variables that must all be set (hosted only).
    pub credential_env: &'static [&'static str],
    /// Server root for local providers.
    pub base_url: Option<&'static str>,
    /// Discovery endpoint for local providers.
    pub discovery: Option<Discovery>,
    pub default_model: &'static str,
    pub default_embedding_model: Option<&'static str>,
    /// Approximate cost in USD per 1,000 tokens, zero for local providers.
    pub cost_per_1k_tokens: f64,
    pub supports_vision: bool,
}

impl ProviderDescriptor {
    pub fn kind(&self) -> ProviderKind {
        self.adapter.provider_kind()
    }

    pub fn is_local(&self) -> bool {
        self.kind() == ProviderKind::Local
    }

    pub fn requires_credential(&self) -> bool {
        !self.credential_env.is_empty()
    }

    /// File name component of [`config_file`](Self::config_file).
    pub fn config_file_name(&self) -> &'static str {
        self.config_file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.config_file)
    }

    /// API root used when the config file does not name one.
    ///
    /// Local servers expose their OpenAI-compatible API under `/v1`.
    pub fn default_api_base(&self) -> String {
        match (self.adapter.api_base(), self.base_url) {
            (Some(api), _) => api.to_string(),
            (None, Some(root)) => format!("{}/v1", root.trim_end_matches('/')),
            (None, None) => String::new(),
        }
    }
}

/// Ordered, fixed collection of provider descriptors.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderDescriptor>,
}

impl ProviderRegistry {
    /// Create a registry from descriptors in declaration order.
    pub fn new(providers: Vec<ProviderDescriptor>) -> Self {
        Self { providers }
    }

    /// The built-in Cradle catalog.
    pub fn builtin() -> Self {
        Self::new(vec![
            ProviderDescriptor {
                key: "openai",
                name: "OpenAI",
                adapter: AdapterKind::OpenAi,
                config_file: "conf/openai_config.json",
                credential_env: &["OA_OPENAI_KEY"],
                base_url: None,
                discovery: None,
                default_model: "gpt-4o-2024-05-13",
                default_embedding_model: Some("text-embedding-ada-002"),
                cost_per_1k_tokens: 0.015,
                supports_vision: true,
            },
            ProviderDescriptor {
                key: "claude",
                name: "Claude (Anthropic)",
                adapter: AdapterKind::Claude,
                config_file: "conf/claude_config.json",
                credential_env: &["OA_CLAUDE_KEY"],
                base_url: None,
                discovery: None,
                default_model: "claude-3-5-sonnet-20241022",
                default_embedding_model: None,
                cost_per_1k_tokens: 0.018,
                supports_vision: true,
            },
            ProviderDescriptor {
                key: "claude-aws",
                name: "Claude (AWS Bedrock)",
                adapter: AdapterKind::Claude,
                config_file: "conf/restful_claude_config.json",
                credential_env: &["RF_CLAUDE_AK", "RF_CLAUDE_SK"],
                base_url: None,
                discovery: None,
                default_model: "claude-3-5-sonnet",
                default_embedding_model: None,
                cost_per_1k_tokens: 0.018,
                supports_vision: true,
            },
            ProviderDescriptor {
                key: "ollama",
                name: "Ollama (Local)",
                adapter: AdapterKind::Ollama,
                config_file: "conf/ollama_config.json",
                credential_env: &[],
                base_url: Some("http://localhost:11434"),
                discovery: Some(Discovery::OllamaTags),
                default_model: "llama3.2-vision",
                default_embedding_model: Some(LOCAL_EMBEDDING_MODEL),
                cost_per_1k_tokens: 0.0,
                supports_vision: true,
            },
            ProviderDescriptor {
                key: "lmstudio",
                name: "LM Studio (Local)",
                adapter: AdapterKind::OpenAiCompatible,
                config_file: "conf/lmstudio_config.json",
                credential_env: &[],
                base_url: Some("http://localhost:1234"),
                discovery: Some(Discovery::OpenAiModels),
                default_model: "local-model",
                default_embedding_model: Some(LOCAL_EMBEDDING_MODEL),
                cost_per_1k_tokens: 0.0,
                supports_vision: true,
            },
            ProviderDescriptor {
                key: "vllm",
                name: "vLLM (Local)",
                adapter: AdapterKind::OpenAiCompatible,
                config_file: "conf/vllm_config.json",
                credential_env: &[],
                base_url: Some("http://localhost:8000"),
                discovery: Some(Discovery::OpenAiModels),
                default_model: "local-model",
                default_embedding_model: Some(LOCAL_EMBEDDING_MODEL),
                cost_per_1k_tokens: 0.0,
                supports_vision: true,
            },
        ])
    }

    /// Look up a descriptor by key.
    pub fn get(&self, key: &str) -> Option<&ProviderDescriptor> {
        self.providers.iter().find(|p| p.key == key)
    }

    /// Look up a descriptor, failing with [`Error::UnknownProvider`].
    pub fn require(&self, key: &str) -> Result<&ProviderDescriptor> {
        self.get(key)
            .ok_or_else(|| Error::UnknownProvider(key.to_string()))
    }

    /// Descriptor of the given adapter kind whose config file is named like `path`.
    pub fn find_by_config_file(
        &self,
        adapter: AdapterKind,
        path: &Path,
    ) -> Option<&ProviderDescriptor> {
        let file_name = path.file_name()?.to_str()?;
        self.providers
            .iter()
            .find(|p| p.adapter == adapter && p.config_file_name() == file_name)
    }

    /// All descriptors in declaration order.
    pub fn all(&self) -> &[ProviderDescriptor] {
        &self.providers
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.providers.iter()
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.key).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
