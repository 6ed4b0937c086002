use super::types::{
    CradleConfig, PathsConfig, ProbeConfig, RawCradleConfig, RawPathsConfig, RawProbeConfig,
};
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project) for the project at `root`
    pub fn load(root: &Path) -> Result<CradleConfig> {
        Self::load_from_paths(&Self::user_config_path(), &Self::project_config_path(root))
    }

    /// Load and merge the two layers from explicit paths
    pub fn load_from_paths(user_path: &Path, project_path: &Path) -> Result<CradleConfig> {
        let mut raw = RawCradleConfig::default();

        // Layer 1: User config
        if let Some(user_config) = Self::read_layer(user_path)? {
            raw = Self::merge_raw(raw, user_config);
        }

        // Layer 2: Project config
        if let Some(project_config) = Self::read_layer(project_path)? {
            raw = Self::merge_raw(raw, project_config);
        }

        let config = Self::finalize(raw);
        Self::validate(&config)?;
        Ok(config)
    }

    /// Reject settings that would make every probe fail
    fn validate(config: &CradleConfig) -> Result<()> {
        if config.probe.timeout_secs == 0 {
            bail!("probe.timeout_secs must be at least 1");
        }
        if config.probe.model_list_timeout_secs == 0 {
            bail!("probe.model_list_timeout_secs must be at least 1");
        }
        Ok(())
    }

    fn read_layer(path: &Path) -> Result<Option<RawCradleConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let raw = toml::from_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(Some(raw))
    }

    /// Get user config path (`$XDG_CONFIG_HOME/cradle/config.toml`)
    pub fn user_config_path() -> PathBuf {
        cradle_paths::user_config_file()
    }

    /// Get project config path
    /// Can be overridden with CRADLE_PROJECT_CONFIG_DIR env var (useful for isolated tests)
    pub fn project_config_path(root: &Path) -> PathBuf {
        cradle_paths::project_config_file(root)
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawCradleConfig, overlay: RawCradleConfig) -> RawCradleConfig {
        RawCradleConfig {
            probe: RawProbeConfig {
                timeout_secs: overlay.probe.timeout_secs.or(base.probe.timeout_secs),
                model_list_timeout_secs: overlay
                    .probe
                    .model_list_timeout_secs
                    .or(base.probe.model_list_timeout_secs),
            },
            paths: RawPathsConfig {
                conf_dir: overlay.paths.conf_dir.or(base.paths.conf_dir),
                preferences_file: overlay
                    .paths
                    .preferences_file
                    .or(base.paths.preferences_file),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawCradleConfig) -> CradleConfig {
        let probe_defaults = ProbeConfig::default();
        let path_defaults = PathsConfig::default();
        CradleConfig {
            probe: ProbeConfig {
                timeout_secs: raw.probe.timeout_secs.unwrap_or(probe_defaults.timeout_secs),
                model_list_timeout_secs: raw
                    .probe
                    .model_list_timeout_secs
                    .unwrap_or(probe_defaults.model_list_timeout_secs),
            },
            paths: PathsConfig {
                conf_dir: raw.paths.conf_dir.unwrap_or(path_defaults.conf_dir),
                preferences_file: raw
                    .paths
                    .preferences_file
                    .unwrap_or(path_defaults.preferences_file),
            },
        }
    }
}
