use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default liveness probe timeout in seconds
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 2;

/// Default model listing timeout in seconds
pub const DEFAULT_MODEL_LIST_TIMEOUT_SECS: u64 = 5;

/// Default provider config directory, relative to the project root
pub const DEFAULT_CONF_DIR: &str = "conf";

/// Default preference file, relative to the project root
pub const DEFAULT_PREFERENCES_FILE: &str = ".cradle_providers.json";

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawCradleConfig {
    #[serde(default)]
    pub probe: RawProbeConfig,

    #[serde(default)]
    pub paths: RawPathsConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawProbeConfig {
    pub timeout_secs: Option<u64>,
    pub model_list_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawPathsConfig {
    pub conf_dir: Option<PathBuf>,
    pub preferences_file: Option<PathBuf>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CradleConfig {
    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// Seconds to wait for a discovery endpoint during checks
    pub timeout_secs: u64,

    /// Seconds to wait when listing models
    pub model_list_timeout_secs: u64,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn model_list_timeout(&self) -> Duration {
        Duration::from_secs(self.model_list_timeout_secs)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            model_list_timeout_secs: DEFAULT_MODEL_LIST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    /// Directory holding `<provider>_config.json` files
    pub conf_dir: PathBuf,

    /// Preference file with the default provider
    pub preferences_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            conf_dir: PathBuf::from(DEFAULT_CONF_DIR),
            preferences_file: PathBuf::from(DEFAULT_PREFERENCES_FILE),
        }
    }
}
