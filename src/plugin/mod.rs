//! Plugin capability contract, registry and fallback dispatch
//!
//! A plugin is a named implementation of up to four packaging operations.
//! The picked plugin may implement any subset; the `default` plugin covers
//! the rest through the [Dispatcher], which resolves a per-capability table
//! once at load time instead of probing on every call.

pub mod cargo;
pub mod default;
pub mod executor;
pub mod registry;
pub mod script;

pub use cargo::CargoPlugin;
pub use default::DefaultPlugin;
pub use registry::PluginRegistry;
pub use script::ScriptPlugin;

use std::sync::Arc;

use crate::config::Config;
use crate::error::{GitIncrementError, Result};
use crate::git::SourceControl;
use crate::version::Version;

/// Namespace prefix carried by every qualified plugin name.
pub const PLUGIN_NAMESPACE: &str = "gitincrement.plugins";

/// The four operations a plugin may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    GetVersion,
    SetVersion,
    SetPackageVersion,
    BuildPackage,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::GetVersion,
        Capability::SetVersion,
        Capability::SetPackageVersion,
        Capability::BuildPackage,
    ];

    /// Get the capability name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Capability::GetVersion => "get_version",
            Capability::SetVersion => "set_version",
            Capability::SetPackageVersion => "set_package_version",
            Capability::BuildPackage => "build_package",
        }
    }

    fn index(self) -> usize {
        match self {
            Capability::GetVersion => 0,
            Capability::SetVersion => 1,
            Capability::SetPackageVersion => 2,
            Capability::BuildPackage => 3,
        }
    }
}

/// Collaborators handed to every plugin call.
pub struct PluginContext<'a> {
    pub scm: &'a dyn SourceControl,
    pub config: &'a Config,
}

/// Result of a packaging run.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome {
    pub status: i32,
    pub output: String,
}

/// A named packaging backend.
///
/// `capabilities()` declares which operations the plugin actually
/// implements; the default method bodies reject the call, so a plugin only
/// overrides what it advertises.
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Full name including the namespace prefix, unique per discovery pass.
    fn qualified_name(&self) -> &str;

    /// The operations this plugin implements itself.
    fn capabilities(&self) -> Vec<Capability>;

    /// Retrieve the current version from the repository.
    fn get_version(&self, _ctx: &PluginContext, _extra_args: &[String]) -> Result<Version> {
        Err(GitIncrementError::unsupported(
            Capability::GetVersion.name(),
            self.qualified_name(),
        ))
    }

    /// Persist the version as a tag. The returned value replaces the
    /// caller's working version.
    fn set_version(&self, _ctx: &PluginContext, _version: Version) -> Result<Version> {
        Err(GitIncrementError::unsupported(
            Capability::SetVersion.name(),
            self.qualified_name(),
        ))
    }

    /// Write the version into the package metadata.
    fn set_package_version(&self, _ctx: &PluginContext, _version: &Version) -> Result<()> {
        Err(GitIncrementError::unsupported(
            Capability::SetPackageVersion.name(),
            self.qualified_name(),
        ))
    }

    /// Build the package for the given version.
    fn build_package(&self, _ctx: &PluginContext, _version: &Version) -> Result<BuildOutcome> {
        Err(GitIncrementError::unsupported(
            Capability::BuildPackage.name(),
            self.qualified_name(),
        ))
    }
}

/// Strips the namespace prefix from a qualified plugin name.
pub fn plugin_short_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Per-capability dispatch table with fallback to the default plugin.
///
/// Resolved once at construction: each capability maps to the picked
/// plugin when it advertises it, otherwise to the default, otherwise to an
/// empty slot that raises [GitIncrementError::UnsupportedOperation] when
/// dispatched.
#[derive(Debug)]
pub struct Dispatcher {
    picked_name: String,
    table: [Option<Arc<dyn Plugin>>; 4],
}

impl Dispatcher {
    pub fn new(picked: Arc<dyn Plugin>, default: Arc<dyn Plugin>) -> Self {
        let picked_name = picked.qualified_name().to_string();
        let picked_capabilities = picked.capabilities();
        let default_capabilities = default.capabilities();

        let table = Capability::ALL.map(|capability| {
            if picked_capabilities.contains(&capability) {
                Some(Arc::clone(&picked))
            } else if default_capabilities.contains(&capability) {
                Some(Arc::clone(&default))
            } else {
                None
            }
        });

        Dispatcher { picked_name, table }
    }

    fn target(&self, capability: Capability) -> Result<&Arc<dyn Plugin>> {
        self.table[capability.index()]
            .as_ref()
            .ok_or_else(|| {
                GitIncrementError::unsupported(capability.name(), self.picked_name.as_str())
            })
    }

    /// Qualified name of the plugin serving a capability, if any.
    pub fn target_name(&self, capability: Capability) -> Option<&str> {
        self.table[capability.index()]
            .as_ref()
            .map(|plugin| plugin.qualified_name())
    }

    pub fn get_version(&self, ctx: &PluginContext, extra_args: &[String]) -> Result<Version> {
        self.target(Capability::GetVersion)?
            .get_version(ctx, extra_args)
    }

    pub fn set_version(&self, ctx: &PluginContext, version: Version) -> Result<Version> {
        self.target(Capability::SetVersion)?.set_version(ctx, version)
    }

    pub fn set_package_version(&self, ctx: &PluginContext, version: &Version) -> Result<()> {
        self.target(Capability::SetPackageVersion)?
            .set_package_version(ctx, version)
    }

    pub fn build_package(&self, ctx: &PluginContext, version: &Version) -> Result<BuildOutcome> {
        self.target(Capability::BuildPackage)?
            .build_package(ctx, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_names() {
        assert_eq!(Capability::GetVersion.name(), "get_version");
        assert_eq!(Capability::SetVersion.name(), "set_version");
        assert_eq!(Capability::SetPackageVersion.name(), "set_package_version");
        assert_eq!(Capability::BuildPackage.name(), "build_package");
    }

    #[test]
    fn test_plugin_short_name_strips_namespace() {
        assert_eq!(plugin_short_name("gitincrement.plugins.default"), "default");
        assert_eq!(plugin_short_name("bare"), "bare");
    }
}
