use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::client::PROBLEM_SPECIFICATIONS_RAW;

/// Settings read from `~/.init-exercise/config.toml`. Every field is
/// optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub track_dir: Option<String>,
    pub spec_base_url: String,
    pub use_maplit: bool,
    pub configlet: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            track_dir: None,
            spec_base_url: PROBLEM_SPECIFICATIONS_RAW.to_string(),
            use_maplit: false,
            configlet: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".init-exercise"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn load() -> Result<Config> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir {}", dir.display()))?;
        }
        let contents =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn expanded_track_dir(&self) -> Option<PathBuf> {
        self.track_dir.as_deref().map(expand_home)
    }
}

pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.spec_base_url, PROBLEM_SPECIFICATIONS_RAW);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "use_maplit = true\ntrack_dir = \"/tracks/rust\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.use_maplit);
        assert_eq!(config.expanded_track_dir(), Some(PathBuf::from("/tracks/rust")));
        assert_eq!(config.spec_base_url, PROBLEM_SPECIFICATIONS_RAW);
        assert_eq!(config.configlet, None);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            track_dir: Some("~/src/rust".into()),
            spec_base_url: "http://localhost/specs".into(),
            use_maplit: true,
            configlet: Some("/usr/local/bin/configlet".into()),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "use_maplit = \"maybe\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn home_expansion() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/tracks"), home.join("tracks"));
            assert_eq!(expand_home("~"), home);
        }
    }
}
