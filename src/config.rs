use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{GitIncrementError, Result};
use crate::version::DEFAULT_BUILD_TAG;

/// Represents the complete file configuration for git-increment.
///
/// Contains version formatting defaults, packaging settings for the default
/// plugin, and script-plugin declarations.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub version: VersionConfig,

    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub plugins: HashMap<String, ScriptPluginConfig>,
}

fn default_build_tag() -> String {
    DEFAULT_BUILD_TAG.to_string()
}

fn default_annotated() -> bool {
    true
}

/// Version string defaults.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VersionConfig {
    /// Label used in build suffixes when a tag carries none.
    #[serde(default = "default_build_tag")]
    pub build_tag: String,

    /// Create annotated tags when a changelog message is available.
    #[serde(default = "default_annotated")]
    pub annotated: bool,
}

impl Default for VersionConfig {
    fn default() -> Self {
        VersionConfig {
            build_tag: default_build_tag(),
            annotated: default_annotated(),
        }
    }
}

/// Packaging settings consumed by the default plugin.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PackageConfig {
    /// Command run to build the package, argv style.
    #[serde(default)]
    pub build_command: Vec<String>,

    /// File to rewrite with the new version string, if any.
    #[serde(default)]
    pub version_file: Option<String>,
}

/// Commands backing a script plugin, one per capability.
///
/// Only the capabilities with a configured command are advertised by the
/// resulting plugin; the rest fall through to the default plugin.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ScriptPluginConfig {
    #[serde(default)]
    pub get_version: Option<String>,

    #[serde(default)]
    pub set_version: Option<String>,

    #[serde(default)]
    pub set_package_version: Option<String>,

    #[serde(default)]
    pub build_package: Option<String>,
}

/// The parsed increment request for one run.
///
/// Mirrors the CLI flags in a format suitable for the controller, so the
/// workflow can be driven programmatically without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub increment_major: bool,
    pub increment_minor: bool,
    pub increment_patch: bool,
    pub increment_build: bool,
    pub explicit_build_number: Option<u32>,
    pub changelog: Option<String>,
    pub dry_run: bool,
    pub skip_tag: bool,
    pub skip_build: bool,
    pub plugin_name: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            increment_major: false,
            increment_minor: false,
            increment_patch: false,
            increment_build: false,
            explicit_build_number: None,
            changelog: None,
            dry_run: false,
            skip_tag: false,
            skip_build: false,
            plugin_name: "default".to_string(),
        }
    }
}

impl RunConfig {
    /// Whether a major, minor or patch increment was requested.
    pub fn wants_release_increment(&self) -> bool {
        self.increment_major || self.increment_minor || self.increment_patch
    }

    /// Checks the changelog invariant: release increments require one.
    ///
    /// Runs before any plugin or version-control call, so a violation never
    /// leaves partial state behind.
    pub fn validate(&self) -> Result<()> {
        if self.wants_release_increment() && self.changelog.is_none() {
            return Err(GitIncrementError::MissingChangelog);
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitincrement.toml` in current directory
/// 3. `.gitincrement.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./gitincrement.toml").exists() {
        fs::read_to_string("./gitincrement.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitincrement.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config =
        toml::from_str(&config_str).map_err(|e| GitIncrementError::config(e.to_string()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version.build_tag, "jenkins");
        assert!(config.version.annotated);
        assert!(config.package.build_command.is_empty());
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn test_run_config_defaults_to_default_plugin() {
        let config = RunConfig::default();
        assert_eq!(config.plugin_name, "default");
        assert!(!config.wants_release_increment());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_changelog_for_release_increment() {
        let config = RunConfig {
            increment_patch: true,
            ..RunConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GitIncrementError::MissingChangelog)
        ));
    }

    #[test]
    fn test_validate_build_increment_needs_no_changelog() {
        let config = RunConfig {
            increment_build: true,
            explicit_build_number: Some(7),
            ..RunConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_changelog_satisfies_invariant() {
        let config = RunConfig {
            increment_major: true,
            changelog: Some("rewrote the core".to_string()),
            ..RunConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
