use std::fs;
use std::path::PathBuf;

use crate::error::{GitIncrementError, Result};
use crate::plugin::executor::CommandRunner;
use crate::plugin::{BuildOutcome, Capability, Plugin, PluginContext, PLUGIN_NAMESPACE};
use crate::version::Version;

/// Packaging backend for cargo projects.
///
/// Only covers the packaging half of the contract; tag handling falls
/// through to the default plugin via dispatch.
#[derive(Debug)]
pub struct CargoPlugin {
    qualified: String,
    manifest_path: PathBuf,
}

impl CargoPlugin {
    pub fn new() -> Self {
        CargoPlugin {
            qualified: format!("{}.cargo", PLUGIN_NAMESPACE),
            manifest_path: PathBuf::from("Cargo.toml"),
        }
    }

    /// Use a manifest other than `./Cargo.toml`.
    pub fn with_manifest(path: impl Into<PathBuf>) -> Self {
        CargoPlugin {
            manifest_path: path.into(),
            ..Self::new()
        }
    }
}

impl Default for CargoPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for CargoPlugin {
    fn qualified_name(&self) -> &str {
        &self.qualified
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![Capability::SetPackageVersion, Capability::BuildPackage]
    }

    /// Rewrites `package.version` in the manifest.
    fn set_package_version(&self, _ctx: &PluginContext, version: &Version) -> Result<()> {
        let manifest = fs::read_to_string(&self.manifest_path)?;
        let mut value: toml::Value = manifest
            .parse()
            .map_err(|e| GitIncrementError::config(format!("invalid Cargo.toml: {}", e)))?;

        let package = value
            .get_mut("package")
            .and_then(|p| p.as_table_mut())
            .ok_or_else(|| GitIncrementError::config("Cargo.toml has no [package] table"))?;
        package.insert(
            "version".to_string(),
            toml::Value::String(version.to_string()),
        );

        let rendered = toml::to_string(&value)
            .map_err(|e| GitIncrementError::config(format!("cannot render Cargo.toml: {}", e)))?;
        fs::write(&self.manifest_path, rendered)?;
        Ok(())
    }

    /// Packages the crate in place; the working tree already carries the
    /// rewritten manifest, so no tag checkout happens here.
    fn build_package(&self, _ctx: &PluginContext, version: &Version) -> Result<BuildOutcome> {
        let argv = vec![
            "cargo".to_string(),
            "package".to_string(),
            "--allow-dirty".to_string(),
        ];
        let env = version.to_env_vars()?;
        CommandRunner::run_argv(&argv, &env)
    }
}
