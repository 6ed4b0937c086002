//! Error types for provider resolution and management.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or managing providers.
///
/// Missing credentials and unreachable servers are not errors. They are
/// reported as a [`CheckOutcome`](crate::CheckOutcome) so callers can render
/// status without special-casing.
#[derive(Debug, Error)]
pub enum Error {
    /// No provider keyword matched the config reference, or a required
    /// secondary adapter could not be initialized.
    #[error("could not resolve a provider for '{reference}': {reason}")]
    UnresolvedProvider { reference: String, reason: String },

    /// Provider key is not in the registry.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Config file is missing or is not valid JSON.
    #[error("invalid provider config {}: {reason}", path.display())]
    ConfigParse { path: PathBuf, reason: String },

    /// Operation only applies to self-hosted providers.
    #[error("'{0}' is not a local provider")]
    NotLocalProvider(String),

    /// The operator cancelled an interactive flow.
    #[error("configuration cancelled")]
    Cancelled,

    /// HTTP client could not be built.
    #[error("request failed: {0}")]
    Request(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn config_parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ConfigParse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_formats_like_cli_output() {
        let err = Error::UnknownProvider("gemini".to_string());
        assert_eq!(err.to_string(), "Unknown provider: gemini");
    }

    #[test]
    fn config_parse_includes_path() {
        let err = Error::config_parse("conf/ollama_config.json", "file not found");
        assert_eq!(
            err.to_string(),
            "invalid provider config conf/ollama_config.json: file not found"
        );
    }

    #[test]
    fn error_from_serde_json() {
        let json_err: serde_json::Error = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
