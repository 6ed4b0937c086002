//! Resolution of config references to a completion/embedding adapter pair.
//!
//! The completion adapter kind is chosen by looking for a known provider
//! keyword in the completion reference, in fixed order. The first keyword
//! found as a substring wins, so `conf/claude_config.json` selects Claude.
//! This matches existing config layouts; it also means a directory such as
//! `claude-backup/` in the path is enough to select Claude.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::adapter::{Adapter, AdapterContext, init_adapter};
use crate::config_file::ConfigRef;
use crate::registry::{ProviderDescriptor, ProviderRegistry};
use crate::types::EmbeddingSupport;
use crate::{Error, Result};

/// Provider keywords in match order.
pub const PROVIDER_KEYWORDS: &[&str] = &["openai", "claude", "ollama", "lmstudio", "vllm"];

/// The adapters a caller uses for completions and embeddings.
#[derive(Clone)]
pub struct ResolvedProviders {
    pub completion: Arc<dyn Adapter>,
    pub embedding: Arc<dyn Adapter>,
}

impl ResolvedProviders {
    /// Whether one adapter instance serves both roles.
    pub fn is_shared(&self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.completion), Arc::as_ptr(&self.embedding))
    }
}

impl fmt::Debug for ResolvedProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedProviders")
            .field("completion", &self.completion.descriptor().key)
            .field("embedding", &self.embedding.descriptor().key)
            .field("shared", &self.is_shared())
            .finish()
    }
}

/// Builds adapters for config references against a registry.
#[derive(Debug)]
pub struct ProviderFactory<'a> {
    registry: &'a ProviderRegistry,
    ctx: AdapterContext,
}

impl<'a> ProviderFactory<'a> {
    pub fn new(registry: &'a ProviderRegistry, ctx: AdapterContext) -> Self {
        Self { registry, ctx }
    }

    /// Descriptor selected by the keyword rule for `reference`.
    ///
    /// When the keyword's adapter kind has several descriptors, the one whose
    /// config file name matches the reference is preferred.
    pub fn select(&self, reference: &ConfigRef) -> Result<&'a ProviderDescriptor> {
        let selector = reference.selector();
        let keyword = PROVIDER_KEYWORDS
            .iter()
            .find(|keyword| selector.contains(*keyword))
            .ok_or_else(|| Error::UnresolvedProvider {
                reference: reference.to_string(),
                reason: format!(
                    "no provider keyword found (expected one of: {})",
                    PROVIDER_KEYWORDS.join(", ")
                ),
            })?;

        let base = self
            .registry
            .get(keyword)
            .ok_or_else(|| Error::UnresolvedProvider {
                reference: reference.to_string(),
                reason: format!("provider '{keyword}' is not registered"),
            })?;

        Ok(reference
            .path()
            .and_then(|path| self.registry.find_by_config_file(base.adapter, path))
            .unwrap_or(base))
    }

    /// Resolve `(completion, embedding)` references to adapters.
    ///
    /// Kinds with native embeddings return the same instance for both roles
    /// and ignore `embedding`. Other kinds get a fresh adapter of the
    /// redirect target built from `embedding`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnresolvedProvider`] if no keyword matches, or the
    ///   embedding adapter cannot be initialized
    /// - [`Error::ConfigParse`] if the completion reference cannot be read
    pub async fn resolve(
        &self,
        completion: &ConfigRef,
        embedding: &ConfigRef,
    ) -> Result<ResolvedProviders> {
        let descriptor = self.select(completion)?;
        debug!(provider = descriptor.key, reference = %completion, "selected completion provider");

        let completion_adapter = init_adapter(descriptor, completion, &self.ctx).await?;

        let embedding_adapter = match descriptor.adapter.embeddings() {
            EmbeddingSupport::Native => Arc::clone(&completion_adapter),
            EmbeddingSupport::Redirect(target) => {
                let unresolved = |reason: String| Error::UnresolvedProvider {
                    reference: embedding.to_string(),
                    reason,
                };
                let target = self
                    .registry
                    .get(target)
                    .ok_or_else(|| unresolved(format!("provider '{target}' is not registered")))?;
                init_adapter(target, embedding, &self.ctx)
                    .await
                    .map_err(|e| unresolved(e.to_string()))?
            }
        };

        info!(
            completion = completion_adapter.descriptor().key,
            embedding = embedding_adapter.descriptor().key,
            "resolved providers"
        );
        Ok(ResolvedProviders {
            completion: completion_adapter,
            embedding: embedding_adapter,
        })
    }
}
