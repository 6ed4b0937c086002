//! Adapter for self-hosted servers (Ollama, LM Studio, vLLM).

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tracing::{info, warn};

use super::{Adapter, AdapterContext, ClientHandle, build_http, handle, runtime_config};
use crate::config_file::ConfigRef;
use crate::discovery::{Discovery, PLACEHOLDER_MODEL, ProbeResult, Prober};
use crate::registry::ProviderDescriptor;
use crate::types::{AdapterKind, RuntimeConfig};
use crate::Result;

/// Adapter for an OpenAI-compatible server on a local or LAN address.
#[derive(Debug)]
pub struct LocalAdapter {
    descriptor: ProviderDescriptor,
    runtime: RuntimeConfig,
    discovery: Discovery,
    prober: Prober,
}

impl LocalAdapter {
    /// Parse `reference`, overlay descriptor defaults and auto-select a model.
    ///
    /// When the configured model is the generic placeholder, the server is
    /// probed once and the first loaded model is used. A failed probe is
    /// logged and the placeholder kept; it never fails construction.
    pub async fn from_config(
        descriptor: &ProviderDescriptor,
        reference: &ConfigRef,
        ctx: &AdapterContext,
    ) -> Result<Self> {
        let file = reference.load(&ctx.root)?;
        let mut runtime = runtime_config(descriptor, &file, ctx.env.as_ref());
        let discovery = discovery_for(descriptor);

        if runtime.comp_model == PLACEHOLDER_MODEL {
            match ctx.prober.probe(discovery, &runtime.base_url).await {
                ProbeResult::Running(models) => match models.into_iter().next() {
                    Some(model) => {
                        info!(provider = descriptor.key, %model, "auto-selected loaded model");
                        runtime.comp_model = model;
                    }
                    None => warn!(
                        provider = descriptor.key,
                        base_url = %runtime.base_url,
                        "server is running but has no models loaded"
                    ),
                },
                other => warn!(
                    provider = descriptor.key,
                    base_url = %runtime.base_url,
                    status = %other.outcome(),
                    "could not auto-detect a model"
                ),
            }
        }

        Ok(Self {
            descriptor: descriptor.clone(),
            runtime,
            discovery,
            prober: ctx.prober.clone(),
        })
    }

    pub fn discovery(&self) -> Discovery {
        self.discovery
    }
}

/// Discovery protocol of a local descriptor.
pub(crate) fn discovery_for(descriptor: &ProviderDescriptor) -> Discovery {
    descriptor.discovery.unwrap_or(match descriptor.adapter {
        AdapterKind::Ollama => Discovery::OllamaTags,
        _ => Discovery::OpenAiModels,
    })
}

#[async_trait]
impl Adapter for LocalAdapter {
    fn kind(&self) -> AdapterKind {
        self.descriptor.adapter
    }

    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn runtime(&self) -> &RuntimeConfig {
        &self.runtime
    }

    async fn list_available_models(&self) -> Vec<String> {
        self.prober
            .list_models(self.discovery, &self.runtime.base_url)
            .await
    }

    fn build_client(&self) -> Result<ClientHandle> {
        let http = build_http(HeaderMap::new())?;
        Ok(handle(self.kind(), &self.runtime, http))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ProviderRegistry;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context(root: &std::path::Path) -> AdapterContext {
        let prober =
            Prober::with_timeouts(Duration::from_millis(300), Duration::from_millis(300)).unwrap();
        AdapterContext::new(root).unwrap().with_prober(prober)
    }

    fn inline(value: serde_json::Value) -> ConfigRef {
        match value {
            serde_json::Value::Object(map) => ConfigRef::Inline(map),
            _ => panic!("expected object"),
        }
    }

    fn refused_base() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}/v1")
    }

    #[tokio::test]
    async fn placeholder_model_is_replaced_by_first_loaded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": [{"id": "qwen2-vl-7b"}, {"id": "phi-3"}]})),
            )
            .mount(&server)
            .await;

        let registry = ProviderRegistry::builtin();
        let dir = TempDir::new().unwrap();
        let adapter = LocalAdapter::from_config(
            registry.get("lmstudio").unwrap(),
            &inline(json!({"base_url": format!("{}/v1", server.uri())})),
            &context(dir.path()),
        )
        .await
        .unwrap();

        assert_eq!(adapter.runtime().comp_model, "qwen2-vl-7b");
        assert_eq!(
            adapter.list_available_models().await,
            vec!["qwen2-vl-7b", "phi-3"]
        );
    }

    #[tokio::test]
    async fn unreachable_server_keeps_placeholder() {
        let registry = ProviderRegistry::builtin();
        let dir = TempDir::new().unwrap();
        let adapter = LocalAdapter::from_config(
            registry.get("vllm").unwrap(),
            &inline(json!({"base_url": refused_base()})),
            &context(dir.path()),
        )
        .await
        .unwrap();

        assert_eq!(adapter.runtime().comp_model, PLACEHOLDER_MODEL);
        assert!(adapter.list_available_models().await.is_empty());
    }

    #[tokio::test]
    async fn explicit_model_skips_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": []})))
            .expect(0)
            .mount(&server)
            .await;

        let registry = ProviderRegistry::builtin();
        let dir = TempDir::new().unwrap();
        let adapter = LocalAdapter::from_config(
            registry.get("ollama").unwrap(),
            &inline(json!({"base_url": server.uri(), "comp_model": "llava"})),
            &context(dir.path()),
        )
        .await
        .unwrap();

        assert_eq!(adapter.runtime().comp_model, "llava");
        assert_eq!(adapter.discovery(), Discovery::OllamaTags);
    }

    #[tokio::test]
    async fn file_reference_falls_back_to_default_base_url() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("conf")).unwrap();
        std::fs::write(
            dir.path().join("conf/ollama_config.json"),
            r#"{"comp_model": "llama3.2-vision"}"#,
        )
        .unwrap();

        let registry = ProviderRegistry::builtin();
        let adapter = LocalAdapter::from_config(
            registry.get("ollama").unwrap(),
            &ConfigRef::from("conf/ollama_config.json"),
            &context(dir.path()),
        )
        .await
        .unwrap();

        assert_eq!(adapter.runtime().base_url, "http://localhost:11434/v1");
        assert_eq!(
            adapter.runtime().emb_model.as_deref(),
            Some("nomic-embed-text")
        );
        let client = adapter.build_client().unwrap();
        assert_eq!(client.kind(), AdapterKind::Ollama);
    }
}
