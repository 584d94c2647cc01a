//! Configuration file support for Berth.
//!
//! Berth reads two configuration files:
//! - Global: `~/.berth/config.toml` - User-wide defaults
//! - Project: `.berth/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File extensions counted as sources when no override is configured.
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["m", "mm", "c", "cc", "cpp", "swift", "h"];

/// Berth configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `berth check` settings
    pub check: CheckConfig,

    /// `berth plan` settings
    pub plan: PlanConfig,
}

/// Settings for descriptor checking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CheckConfig {
    /// Always verify the source layout
    pub layout: Option<bool>,

    /// Extensions counted as source files (without the dot)
    pub source_extensions: Vec<String>,
}

impl CheckConfig {
    /// Get the effective source extensions.
    pub fn source_extensions(&self) -> Vec<String> {
        if self.source_extensions.is_empty() {
            DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect()
        } else {
            self.source_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect()
        }
    }
}

/// Settings for build plan output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Pretty-print the JSON plan
    pub pretty: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.check.layout.is_some() {
            self.check.layout = other.check.layout;
        }
        if !other.check.source_extensions.is_empty() {
            self.check.source_extensions = other.check.source_extensions;
        }
        if other.plan.pretty.is_some() {
            self.plan.pretty = other.plan.pretty;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.berth/config.toml)
/// 2. Global config (~/.berth/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global berth config directory (~/.berth).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".berth"))
}

/// Get the global config path (~/.berth/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.berth/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".berth").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_extensions() {
        let config = Config::default();
        let exts = config.check.source_extensions();
        assert!(exts.contains(&"m".to_string()));
        assert!(exts.contains(&"swift".to_string()));
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = project_config_path(tmp.path());
        std::fs::create_dir_all(project.parent().unwrap()).unwrap();

        std::fs::write(&global, "[check]\nsource-extensions = [\"c\"]\n").unwrap();
        std::fs::write(
            &project,
            "[check]\nlayout = true\nsource-extensions = [\".m\", \"h\"]\n\n[plan]\npretty = true\n",
        )
        .unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.check.layout, Some(true));
        assert_eq!(config.plan.pretty, Some(true));
        assert_eq!(config.check.source_extensions(), vec!["m", "h"]);
    }

    #[test]
    fn test_project_false_overrides_global_true() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = project_config_path(tmp.path());
        std::fs::create_dir_all(project.parent().unwrap()).unwrap();

        std::fs::write(&global, "[check]\nlayout = true\n\n[plan]\npretty = true\n").unwrap();
        std::fs::write(&project, "[check]\nlayout = false\n\n[plan]\npretty = false\n").unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.check.layout, Some(false));
        assert_eq!(config.plan.pretty, Some(false));

        // Unset project keys keep the global value
        std::fs::write(&project, "[check]\nsource-extensions = [\"m\"]\n").unwrap();
        let config = load_config(Some(&global), &project);
        assert_eq!(config.check.layout, Some(true));
        assert_eq!(config.plan.pretty, Some(true));
    }

    #[test]
    fn test_missing_or_broken_config_falls_back() {
        let tmp = TempDir::new().unwrap();
        let broken = tmp.path().join("config.toml");
        std::fs::write(&broken, "[check\n").unwrap();

        assert_eq!(Config::load_or_default(&broken), Config::default());
        assert_eq!(
            load_config(None, &tmp.path().join("missing.toml")),
            Config::default()
        );
    }
}
