//! The operator's default provider and configured-provider set.
//!
//! Stored as one JSON object:
//!
//! ```json
//! {"default_provider": "ollama", "configured_providers": ["ollama", "openai"]}
//! ```
//!
//! The store is loaded once per command and written back by the manager
//! after each mutation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Result;
use crate::config_file::save_json;

/// Persisted preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Keys in the order they were first configured, without duplicates.
    #[serde(default)]
    pub configured_providers: Vec<String>,
}

impl Preferences {
    /// Add `key` to the configured set. Returns `false` if already present.
    pub fn add_configured(&mut self, key: &str) -> bool {
        if self.is_configured(key) {
            return false;
        }
        self.configured_providers.push(key.to_string());
        true
    }

    pub fn is_configured(&self, key: &str) -> bool {
        self.configured_providers.iter().any(|k| k == key)
    }
}

/// How the in-memory preferences were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// No file existed; preferences start empty.
    Fresh,
    /// Parsed from the file.
    Loaded,
    /// The file was unreadable or corrupt and was replaced by empty preferences.
    Recovered,
}

/// Preferences bound to the file they are persisted in.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    preferences: Preferences,
    origin: LoadOrigin,
}

impl PreferenceStore {
    /// Load preferences from `path`.
    ///
    /// Never fails: a corrupt file falls back to empty preferences and the
    /// fallback is recorded in [`origin`](Self::origin).
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (preferences, origin) = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(preferences) => (preferences, LoadOrigin::Loaded),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "corrupt preferences, starting empty");
                    (Preferences::default(), LoadOrigin::Recovered)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                (Preferences::default(), LoadOrigin::Fresh)
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "unreadable preferences, starting empty");
                (Preferences::default(), LoadOrigin::Recovered)
            }
        };
        Self {
            path,
            preferences,
            origin,
        }
    }

    /// Write the current preferences back to the file.
    pub fn save(&self) -> Result<()> {
        save_json(&self.path, &self.preferences)?;
        info!(path = %self.path.display(), "saved provider preferences");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> LoadOrigin {
        self.origin
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub(crate) fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    pub fn default_provider(&self) -> Option<&str> {
        self.preferences.default_provider.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::load(dir.path().join(".cradle_providers.json"));
        assert_eq!(store.origin(), LoadOrigin::Fresh);
        assert_eq!(store.preferences(), &Preferences::default());
    }

    #[test]
    fn corrupt_file_recovers_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".cradle_providers.json");
        fs::write(&path, "{\"default_provider\": ").unwrap();

        let store = PreferenceStore::load(&path);
        assert_eq!(store.origin(), LoadOrigin::Recovered);
        assert_eq!(store.default_provider(), None);
        assert!(store.preferences().configured_providers.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".cradle_providers.json");

        let mut store = PreferenceStore::load(&path);
        store.preferences_mut().default_provider = Some("ollama".to_string());
        store.preferences_mut().add_configured("ollama");
        store.save().unwrap();

        let reloaded = PreferenceStore::load(&path);
        assert_eq!(reloaded.origin(), LoadOrigin::Loaded);
        assert_eq!(reloaded.default_provider(), Some("ollama"));
        assert_eq!(reloaded.preferences().configured_providers, vec!["ollama"]);
    }

    #[test]
    fn null_default_and_missing_fields_parse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"default_provider": null}"#).unwrap();

        let store = PreferenceStore::load(&path);
        assert_eq!(store.origin(), LoadOrigin::Loaded);
        assert_eq!(store.preferences(), &Preferences::default());
    }

    #[test]
    fn add_configured_keeps_set_semantics() {
        let mut prefs = Preferences::default();
        assert!(prefs.add_configured("openai"));
        assert!(!prefs.add_configured("openai"));
        assert!(prefs.add_configured("vllm"));
        assert_eq!(prefs.configured_providers, vec!["openai", "vllm"]);
    }
}
