//! Core types shared by the registry, adapters and checkers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::credentials::ApiKey;

/// API root used by hosted OpenAI adapters.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// API root used by hosted Claude adapters.
pub const CLAUDE_API_BASE: &str = "https://api.anthropic.com/v1";

/// Whether a provider is reached over the internet or self-hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Public API service authenticated with a credential.
    Hosted,
    /// OpenAI-compatible server on a local or LAN address.
    Local,
}

impl ProviderKind {
    /// Short upper-case label used in status output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hosted => "API",
            Self::Local => "LOCAL",
        }
    }
}

/// The adapter variant that talks to a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdapterKind {
    /// Hosted OpenAI API.
    #[serde(rename = "openai")]
    OpenAi,
    /// Hosted Claude API.
    Claude,
    /// Local Ollama server.
    Ollama,
    /// Local server speaking the OpenAI API (LM Studio, vLLM).
    #[serde(rename = "openai-compatible")]
    OpenAiCompatible,
}

impl AdapterKind {
    /// Stable name of this adapter kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Claude => "claude",
            Self::Ollama => "ollama",
            Self::OpenAiCompatible => "openai-compatible",
        }
    }

    pub fn provider_kind(self) -> ProviderKind {
        match self {
            Self::OpenAi | Self::Claude => ProviderKind::Hosted,
            Self::Ollama | Self::OpenAiCompatible => ProviderKind::Local,
        }
    }

    /// How this kind serves embedding requests.
    ///
    /// Fixed per kind and not user-configurable.
    pub fn embeddings(self) -> EmbeddingSupport {
        match self {
            Self::Claude => EmbeddingSupport::Redirect("openai"),
            Self::OpenAi | Self::Ollama | Self::OpenAiCompatible => EmbeddingSupport::Native,
        }
    }

    /// Default API root for hosted kinds.
    pub fn api_base(self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some(OPENAI_API_BASE),
            Self::Claude => Some(CLAUDE_API_BASE),
            Self::Ollama | Self::OpenAiCompatible => None,
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a provider's embeddings come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingSupport {
    /// The completion adapter also serves embeddings.
    Native,
    /// Embeddings are served by the adapter of the named descriptor.
    Redirect(&'static str),
}

/// A `(bool, message)` status pair from a configuration or availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub ok: bool,
    pub message: String,
}

impl CheckOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Configuration an adapter runs with, rebuilt on every resolution.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// API root the client is bound to. Never empty for local providers.
    pub base_url: String,
    /// Model used for completions.
    pub comp_model: String,
    /// Model used for embeddings, `None` when embeddings are redirected.
    pub emb_model: Option<String>,
    /// Primary credential (API key or access key).
    pub api_key: Option<ApiKey>,
    /// Secondary credential for providers that need a key pair.
    pub secret_key: Option<ApiKey>,
}

impl RuntimeConfig {
    /// Server root with any trailing `/v1` removed, used for discovery.
    pub fn discovery_root(&self) -> &str {
        crate::discovery::discovery_root(&self.base_url)
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}
