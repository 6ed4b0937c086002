//! Hosted API adapters (OpenAI, Claude).

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::debug;

use super::{Adapter, AdapterContext, ClientHandle, build_http, handle, runtime_config};
use crate::config_file::ConfigRef;
use crate::discovery::ModelsResponse;
use crate::registry::ProviderDescriptor;
use crate::types::{AdapterKind, RuntimeConfig};
use crate::{Error, Result};

/// Claude API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Adapter for a provider reached over the public internet.
#[derive(Debug)]
pub struct HostedAdapter {
    descriptor: ProviderDescriptor,
    runtime: RuntimeConfig,
    list_timeout: std::time::Duration,
}

impl HostedAdapter {
    /// Parse `reference` and overlay it on the defaults of `descriptor`.
    ///
    /// Never touches the network. Missing credentials are not an error here;
    /// they surface through the availability checker.
    pub fn from_config(
        descriptor: &ProviderDescriptor,
        reference: &ConfigRef,
        ctx: &AdapterContext,
    ) -> Result<Self> {
        let file = reference.load(&ctx.root)?;
        let runtime = runtime_config(descriptor, &file, ctx.env.as_ref());
        debug!(
            provider = descriptor.key,
            base_url = %runtime.base_url,
            model = %runtime.comp_model,
            credential = ?runtime.api_key.as_ref().map(|key| key.var()),
            "initialized hosted adapter"
        );
        Ok(Self {
            descriptor: descriptor.clone(),
            runtime,
            list_timeout: ctx.prober.list_timeout(),
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let Some(key) = &self.runtime.api_key else {
            return Ok(headers);
        };
        match self.descriptor.adapter {
            AdapterKind::Claude => {
                headers.insert("x-api-key", secret_header(key.expose_secret())?);
                headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
            }
            _ => {
                let bearer = format!("Bearer {}", key.expose_secret());
                headers.insert(AUTHORIZATION, secret_header(&bearer)?);
            }
        }
        Ok(headers)
    }
}

fn secret_header(raw: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(raw)
        .map_err(|_| Error::Request("API key contains invalid header characters".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

#[async_trait]
impl Adapter for HostedAdapter {
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
        if !self.runtime.has_credentials() {
            return Vec::new();
        }
        let client = match self.build_client() {
            Ok(client) => client,
            Err(e) => {
                debug!(provider = self.descriptor.key, error = %e, "cannot build client");
                return Vec::new();
            }
        };

        let url = format!("{}/models", self.runtime.base_url.trim_end_matches('/'));
        let response = client
            .http()
            .get(&url)
            .timeout(self.list_timeout)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);
        let body = match response {
            Ok(response) => response.json::<ModelsResponse>().await,
            Err(e) => Err(e),
        };

        match body {
            Ok(list) => list.data.into_iter().filter_map(|m| m.id).collect(),
            Err(e) => {
                debug!(provider = self.descriptor.key, %url, error = %e, "model listing failed");
                Vec::new()
            }
        }
    }

    fn build_client(&self) -> Result<ClientHandle> {
        let http = build_http(self.headers()?)?;
        Ok(handle(self.kind(), &self.runtime, http))
    }
}
