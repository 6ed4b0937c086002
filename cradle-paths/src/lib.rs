//! Settings locations for cradle.
//!
//! User settings follow the XDG layout on every platform, the way tools
//! like gh and kubectl do. Project settings live next to the project they
//! configure.

use std::path::{Path, PathBuf};

/// Environment variable that relocates the project settings directory.
pub const PROJECT_CONFIG_DIR_ENV: &str = "CRADLE_PROJECT_CONFIG_DIR";

/// Project settings directory name, relative to the project root.
pub const PROJECT_CONFIG_DIR: &str = ".cradle";

/// Settings file name in both the user and project directories.
pub const CONFIG_FILE: &str = "config.toml";

/// Get the cradle user config directory.
///
/// Returns `$XDG_CONFIG_HOME/cradle` if set, otherwise `~/.config/cradle`.
pub fn config_dir() -> PathBuf {
    config_dir_from(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        dirs::home_dir(),
    )
}

fn config_dir_from(xdg_config: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    match (xdg_config.filter(|p| !p.as_os_str().is_empty()), home) {
        (Some(xdg), _) => xdg.join("cradle"),
        (None, Some(home)) => home.join(".config/cradle"),
        (None, None) => PathBuf::from(".config/cradle"),
    }
}

/// User-level settings file.
pub fn user_config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Project settings directory for `root`.
///
/// `CRADLE_PROJECT_CONFIG_DIR` replaces `<root>/.cradle` when set. A
/// relative override is taken relative to `root`.
pub fn project_config_dir(root: &Path) -> PathBuf {
    project_config_dir_from(root, std::env::var_os(PROJECT_CONFIG_DIR_ENV).map(PathBuf::from))
}

fn project_config_dir_from(root: &Path, overridden: Option<PathBuf>) -> PathBuf {
    match overridden.filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => root.join(dir),
        None => root.join(PROJECT_CONFIG_DIR),
    }
}

/// Project-level settings file for `root`.
pub fn project_config_file(root: &Path) -> PathBuf {
    project_config_dir(root).join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_prefers_xdg() {
        let path = config_dir_from(Some("/tmp/xdg".into()), Some("/home/op".into()));
        assert_eq!(path, PathBuf::from("/tmp/xdg/cradle"));
    }

    #[test]
    fn config_dir_falls_back_to_home() {
        let path = config_dir_from(None, Some("/home/op".into()));
        assert_eq!(path, PathBuf::from("/home/op/.config/cradle"));

        let path = config_dir_from(Some(PathBuf::new()), Some("/home/op".into()));
        assert_eq!(path, PathBuf::from("/home/op/.config/cradle"));
    }

    #[test]
    fn config_dir_without_home_is_relative() {
        assert_eq!(config_dir_from(None, None), PathBuf::from(".config/cradle"));
    }

    #[test]
    fn user_config_file_ends_with_cradle_config() {
        assert!(user_config_file().ends_with("cradle/config.toml"));
    }

    #[test]
    fn project_dir_defaults_under_root() {
        let dir = project_config_dir_from(Path::new("/work/game"), None);
        assert_eq!(dir, PathBuf::from("/work/game/.cradle"));
    }

    #[test]
    fn project_dir_override_relative_and_absolute() {
        let dir = project_config_dir_from(Path::new("/work/game"), Some("settings".into()));
        assert_eq!(dir, PathBuf::from("/work/game/settings"));

        let dir = project_config_dir_from(Path::new("/work/game"), Some("/etc/cradle".into()));
        assert_eq!(dir, PathBuf::from("/etc/cradle"));
    }
}
