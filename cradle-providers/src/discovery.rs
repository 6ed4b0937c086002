//! Discovery endpoints of local servers.
//!
//! Each local provider kind exposes one GET endpoint that both answers
//! liveness probes and enumerates loaded models:
//!
//! - Ollama: `GET {root}/api/tags` returning `{"models": [{"name": ..}]}`
//! - OpenAI-compatible servers: `GET {root}/v1/models` returning `{"data": [{"id": ..}]}`
//!
//! Every request is a single attempt bounded by a timeout. Failures are
//! values ([`ProbeResult`]), never errors.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::types::CheckOutcome;
use crate::{Error, Result};

/// Model name that asks a local adapter to pick whatever the server has loaded.
pub const PLACEHOLDER_MODEL: &str = "local-model";

/// Timeout for liveness probes.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Timeout for model listing.
pub const DEFAULT_MODEL_LIST_TIMEOUT: Duration = Duration::from_secs(5);

/// Model names shown in a probe summary.
const SUMMARY_MODELS: usize = 3;

/// Characters of an unexpected error kept in a probe message.
const ERROR_MESSAGE_LIMIT: usize = 50;

/// Discovery protocol of a local provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// Ollama's native tag listing.
    OllamaTags,
    /// The OpenAI `models` listing.
    OpenAiModels,
}

impl Discovery {
    pub fn path(self) -> &'static str {
        match self {
            Self::OllamaTags => "/api/tags",
            Self::OpenAiModels => "/v1/models",
        }
    }

    /// Full discovery URL for a server root or API base.
    pub fn url(self, base: &str) -> String {
        format!("{}{}", discovery_root(base), self.path())
    }

    /// Model names from a discovery response body.
    ///
    /// Entries without a name are skipped.
    pub fn parse_models(self, body: &[u8]) -> serde_json::Result<Vec<String>> {
        match self {
            Self::OllamaTags => {
                let tags: TagsResponse = serde_json::from_slice(body)?;
                Ok(tags.models.into_iter().filter_map(|m| m.name).collect())
            }
            Self::OpenAiModels => {
                let list: ModelsResponse = serde_json::from_slice(body)?;
                Ok(list.data.into_iter().filter_map(|m| m.id).collect())
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: Option<String>,
}

/// Response of an OpenAI-style `models` endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelsResponse {
    #[serde(default)]
    pub(crate) data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelEntry {
    pub(crate) id: Option<String>,
}

/// Server root of `base`: one trailing `/` and then one trailing `/v1` removed.
pub fn discovery_root(base: &str) -> &str {
    let base = base.strip_suffix('/').unwrap_or(base);
    base.strip_suffix("/v1").unwrap_or(base)
}

// ────────────────────────────────────────────────────────────────────────────
// Probing
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of a single discovery request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// HTTP 200. Models are empty when none are loaded or the body was not understood.
    Running(Vec<String>),
    /// Any non-200 status.
    ServerError(u16),
    /// Nothing accepted the connection.
    NotRunning,
    /// No response within the timeout.
    Timeout,
    /// Anything else, truncated for display.
    Failed(String),
}

impl ProbeResult {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running(_))
    }

    /// Status pair shown to the operator.
    pub fn outcome(&self) -> CheckOutcome {
        match self {
            Self::Running(models) if models.is_empty() => {
                CheckOutcome::ok("Running (no models loaded)")
            }
            Self::Running(models) => {
                let shown: Vec<&str> = models
                    .iter()
                    .take(SUMMARY_MODELS)
                    .map(String::as_str)
                    .collect();
                CheckOutcome::ok(format!(
                    "Running with {} model(s): {}",
                    models.len(),
                    shown.join(", ")
                ))
            }
            Self::ServerError(code) => CheckOutcome::fail(format!("Server error: {code}")),
            Self::NotRunning => CheckOutcome::fail("Not running"),
            Self::Timeout => CheckOutcome::fail("Timeout"),
            Self::Failed(message) => CheckOutcome::fail(format!("Error: {message}")),
        }
    }

    fn from_error(err: &reqwest::Error) -> Self {
        // reqwest reports a connect timeout as both; timeout wins.
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::NotRunning
        } else {
            Self::Failed(err.to_string().chars().take(ERROR_MESSAGE_LIMIT).collect())
        }
    }
}

/// Issues discovery requests with fixed timeouts.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
    probe_timeout: Duration,
    list_timeout: Duration,
}

impl Prober {
    /// Create a prober with the default timeouts.
    pub fn new() -> Result<Self> {
        Self::with_timeouts(DEFAULT_PROBE_TIMEOUT, DEFAULT_MODEL_LIST_TIMEOUT)
    }

    pub fn with_timeouts(probe_timeout: Duration, list_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Request(e.to_string()))?;
        Ok(Self {
            client,
            probe_timeout,
            list_timeout,
        })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    pub fn list_timeout(&self) -> Duration {
        self.list_timeout
    }

    /// Probe the server at `base` once.
    pub async fn probe(&self, discovery: Discovery, base: &str) -> ProbeResult {
        self.request(discovery, base, self.probe_timeout).await
    }

    /// Models loaded on the server at `base`, empty on any failure.
    pub async fn list_models(&self, discovery: Discovery, base: &str) -> Vec<String> {
        match self.request(discovery, base, self.list_timeout).await {
            ProbeResult::Running(models) => models,
            other => {
                debug!(url = %discovery.url(base), result = ?other, "model listing failed");
                Vec::new()
            }
        }
    }

    async fn request(&self, discovery: Discovery, base: &str, timeout: Duration) -> ProbeResult {
        let url = discovery.url(base);
        debug!(%url, ?timeout, "probing discovery endpoint");

        let response = match self.client.get(&url).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) => return ProbeResult::from_error(&e),
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return ProbeResult::ServerError(status.as_u16());
        }

        match response.bytes().await {
            Ok(body) => match discovery.parse_models(&body) {
                Ok(models) => ProbeResult::Running(models),
                Err(e) => {
                    debug!(%url, error = %e, "unrecognized discovery response");
                    ProbeResult::Running(Vec::new())
                }
            },
            Err(e) if e.is_timeout() => ProbeResult::Timeout,
            Err(_) => ProbeResult::Running(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_prober() -> Prober {
        Prober::with_timeouts(Duration::from_millis(200), Duration::from_millis(200)).unwrap()
    }

    /// Address that refuses connections.
    fn refused_base() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    #[test]
    fn discovery_root_strips_slash_then_v1() {
        assert_eq!(discovery_root("http://localhost:1234/v1"), "http://localhost:1234");
        assert_eq!(discovery_root("http://localhost:1234/v1/"), "http://localhost:1234");
        assert_eq!(discovery_root("http://localhost:11434/"), "http://localhost:11434");
        assert_eq!(discovery_root("http://localhost:11434"), "http://localhost:11434");
    }

    #[test]
    fn discovery_urls_per_kind() {
        assert_eq!(
            Discovery::OllamaTags.url("http://localhost:11434/v1"),
            "http://localhost:11434/api/tags"
        );
        assert_eq!(
            Discovery::OpenAiModels.url("http://localhost:8000"),
            "http://localhost:8000/v1/models"
        );
    }

    #[test]
    fn parse_models_skips_unnamed_entries() {
        let body = json!({"models": [{"name": "llava"}, {"size": 3}]}).to_string();
        assert_eq!(
            Discovery::OllamaTags.parse_models(body.as_bytes()).unwrap(),
            vec!["llava"]
        );

        let body = json!({"object": "list", "data": [{"id": "qwen2-vl"}]}).to_string();
        assert_eq!(
            Discovery::OpenAiModels.parse_models(body.as_bytes()).unwrap(),
            vec!["qwen2-vl"]
        );
    }

    #[test]
    fn running_summary_shows_first_three_models() {
        let result = ProbeResult::Running(
            ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect(),
        );
        assert_eq!(
            result.outcome(),
            CheckOutcome::ok("Running with 4 model(s): a, b, c")
        );
        assert_eq!(
            ProbeResult::Running(vec![]).outcome(),
            CheckOutcome::ok("Running (no models loaded)")
        );
    }

    #[test]
    fn failure_messages_are_fixed() {
        assert_eq!(ProbeResult::NotRunning.outcome().message, "Not running");
        assert_eq!(ProbeResult::Timeout.outcome().message, "Timeout");
        assert_eq!(
            ProbeResult::ServerError(503).outcome(),
            CheckOutcome::fail("Server error: 503")
        );
    }

    #[tokio::test]
    async fn probe_ollama_tags_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"models": [{"name": "llama3.2-vision:latest"}]})),
            )
            .mount(&server)
            .await;

        let result = fast_prober()
            .probe(Discovery::OllamaTags, &server.uri())
            .await;
        assert_eq!(
            result.outcome(),
            CheckOutcome::ok("Running with 1 model(s): llama3.2-vision:latest")
        );
    }

    #[tokio::test]
    async fn probe_openai_models_through_v1_base() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "m1"}, {"id": "m2"}]})),
            )
            .mount(&server)
            .await;

        let base = format!("{}/v1", server.uri());
        let result = fast_prober().probe(Discovery::OpenAiModels, &base).await;
        assert_eq!(result, ProbeResult::Running(vec!["m1".into(), "m2".into()]));
    }

    #[tokio::test]
    async fn probe_unparseable_body_counts_as_running() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let result = fast_prober()
            .probe(Discovery::OllamaTags, &server.uri())
            .await;
        assert_eq!(result, ProbeResult::Running(vec![]));
    }

    #[tokio::test]
    async fn probe_non_200_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = fast_prober()
            .probe(Discovery::OpenAiModels, &server.uri())
            .await;
        assert_eq!(result, ProbeResult::ServerError(500));
    }

    #[tokio::test]
    async fn probe_refused_connection_is_not_running() {
        let result = fast_prober()
            .probe(Discovery::OllamaTags, &refused_base())
            .await;
        assert_eq!(result, ProbeResult::NotRunning);
        assert_eq!(result.outcome(), CheckOutcome::fail("Not running"));
    }

    #[tokio::test]
    async fn probe_slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"models": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let result = fast_prober()
            .probe(Discovery::OllamaTags, &server.uri())
            .await;
        assert_eq!(result, ProbeResult::Timeout);
    }

    #[tokio::test]
    async fn list_models_is_empty_on_failure() {
        let models = fast_prober()
            .list_models(Discovery::OpenAiModels, &refused_base())
            .await;
        assert!(models.is_empty());
    }
}
