//! Provider config files and config references.
//!
//! A provider config file is a small JSON object:
//!
//! ```json
//! {"base_url": "http://localhost:11434/v1", "comp_model": "llama3.2-vision", "emb_model": "nomic-embed-text"}
//! ```
//!
//! Hosted providers usually carry only model names. Unknown keys are kept
//! on a round trip but otherwise ignored.

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::registry::ProviderDescriptor;
use crate::{Error, Result};

/// Label used in errors for inline mappings.
const INLINE_LABEL: &str = "<inline>";

/// Contents of `conf/<provider>_config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comp_model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emb_model: Option<String>,

    /// Keys this layer does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProviderConfigFile {
    /// Value of a string field, treating empty strings as absent.
    fn non_empty(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn base_url(&self) -> Option<&str> {
        Self::non_empty(&self.base_url)
    }

    pub fn comp_model(&self) -> Option<&str> {
        Self::non_empty(&self.comp_model)
    }

    pub fn emb_model(&self) -> Option<&str> {
        Self::non_empty(&self.emb_model)
    }
}

/// A reference to provider configuration: a file path or an inline mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigRef {
    Path(PathBuf),
    Inline(Map<String, Value>),
}

impl ConfigRef {
    /// Text the provider keyword rule is applied to.
    ///
    /// For paths this is the path itself. Inline mappings have no path, so
    /// their `"provider"` field is used instead.
    pub fn selector(&self) -> Cow<'_, str> {
        match self {
            Self::Path(path) => path.to_string_lossy(),
            Self::Inline(map) => Cow::Borrowed(
                map.get("provider").and_then(Value::as_str).unwrap_or(""),
            ),
        }
    }

    /// Path of a file reference.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Inline(_) => None,
        }
    }

    /// Parse the referenced configuration.
    ///
    /// Relative paths are resolved against `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] when the file does not exist or is not
    /// a JSON object with the expected field types.
    pub fn load(&self, root: &Path) -> Result<ProviderConfigFile> {
        match self {
            Self::Path(path) => {
                let full = root.join(path);
                let value = load_json(&full)?;
                serde_json::from_value(value).map_err(|e| Error::config_parse(full, e))
            }
            Self::Inline(map) => serde_json::from_value(Value::Object(map.clone()))
                .map_err(|e| Error::config_parse(INLINE_LABEL, e)),
        }
    }
}

impl std::fmt::Display for ConfigRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Inline(_) => f.write_str(INLINE_LABEL),
        }
    }
}

impl From<&str> for ConfigRef {
    fn from(s: &str) -> Self {
        Self::Path(PathBuf::from(s))
    }
}

impl From<PathBuf> for ConfigRef {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ConfigRef {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Map<String, Value>> for ConfigRef {
    fn from(map: Map<String, Value>) -> Self {
        Self::Inline(map)
    }
}

/// Load a JSON document from `path`.
///
/// # Errors
///
/// Returns [`Error::ConfigParse`] if the file is missing or is not valid JSON.
pub fn load_json(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::config_parse(path, "file not found"));
    }
    let contents = fs::read_to_string(path).map_err(|e| Error::config_parse(path, e))?;
    serde_json::from_str(&contents).map_err(|e| Error::config_parse(path, e))
}

/// Write `value` as pretty JSON to `path`, creating parent directories.
///
/// The file is written to a temporary sibling and renamed into place, so an
/// interrupted write never leaves a truncated file behind.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Reads and writes provider config files under a project root.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: PathBuf,
    conf_dir: Option<PathBuf>,
}

impl ConfigStore {
    /// Store rooted at `root`, using each descriptor's own config path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            conf_dir: None,
        }
    }

    /// Place config files in `dir` (relative to the root) instead of `conf/`.
    pub fn with_conf_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.conf_dir = Some(dir.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Config path relative to the root, as shown to the operator.
    pub fn display_path(&self, descriptor: &ProviderDescriptor) -> PathBuf {
        match &self.conf_dir {
            Some(dir) => dir.join(descriptor.config_file_name()),
            None => PathBuf::from(descriptor.config_file),
        }
    }

    /// Absolute (root-joined) config path for `descriptor`.
    pub fn path_for(&self, descriptor: &ProviderDescriptor) -> PathBuf {
        self.root.join(self.display_path(descriptor))
    }

    pub fn exists(&self, descriptor: &ProviderDescriptor) -> bool {
        self.path_for(descriptor).is_file()
    }

    /// Reference to the config file of `descriptor`.
    pub fn reference(&self, descriptor: &ProviderDescriptor) -> ConfigRef {
        ConfigRef::Path(self.display_path(descriptor))
    }

    pub fn load(&self, descriptor: &ProviderDescriptor) -> Result<ProviderConfigFile> {
        self.reference(descriptor).load(&self.root)
    }

    pub fn save(&self, descriptor: &ProviderDescriptor, config: &ProviderConfigFile) -> Result<()> {
        let path = self.path_for(descriptor);
        save_json(&path, config)?;
        info!(provider = descriptor.key, path = %path.display(), "saved provider config");
        Ok(())
    }
}
