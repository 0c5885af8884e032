//! On-disk configuration, `$XDG_CONFIG_HOME/thumbs/config.toml`.
//!
//! Everything is optional; command-line flags win over file values.

use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigIoSnafu, ConfigParseSnafu, PathNotFoundSnafu, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub cleanup: Cleanup,
}

/// Fallbacks for the global walk flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub all: bool,
}

/// Glob patterns prepended to every `cleanup` run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cleanup {
    #[serde(default)]
    pub globs: Vec<String>,
}

pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "thumbs")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load the configuration. A missing default file yields `Config::default()`;
/// a missing explicitly given file is an error.
pub fn load(override_path: Option<&Path>) -> Result<Config> {
    let path = match override_path {
        Some(path) => {
            if !path.exists() {
                return PathNotFoundSnafu { path }.fail();
            }
            path.to_path_buf()
        }
        None => match default_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };

    let raw = fs::read_to_string(&path).context(ConfigIoSnafu { path: &path })?;
    toml::from_str(&raw).context(ConfigParseSnafu { path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_a_full_config() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[defaults]
recursive = true

[cleanup]
globs = ["!**/Downloads/**"]
"#,
        )
        .unwrap();

        let config = load(Some(&path)).unwrap();
        assert!(config.defaults.recursive);
        assert!(!config.defaults.all);
        assert_eq!(config.cleanup.globs, vec!["!**/Downloads/**"]);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "").unwrap();

        assert_eq!(load(Some(&path)).unwrap(), Config::default());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        assert!(load(Some(&temp.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "defaults = 3").unwrap();

        assert!(load(Some(&path)).is_err());
    }
}
