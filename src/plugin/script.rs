use std::collections::HashMap;

use crate::config::ScriptPluginConfig;
use crate::error::{GitIncrementError, Result};
use crate::plugin::executor::CommandRunner;
use crate::plugin::{BuildOutcome, Capability, Plugin, PluginContext, PLUGIN_NAMESPACE};
use crate::version::Version;

/// A plugin backed by shell commands declared in the config file.
///
/// Advertises exactly the capabilities that have a configured command;
/// everything else falls through to the default plugin.
#[derive(Debug)]
pub struct ScriptPlugin {
    qualified: String,
    commands: ScriptPluginConfig,
}

impl ScriptPlugin {
    pub fn new(name: &str, commands: ScriptPluginConfig) -> Self {
        ScriptPlugin {
            qualified: format!("{}.{}", PLUGIN_NAMESPACE, name),
            commands,
        }
    }

    fn command(&self, capability: Capability) -> Result<&str> {
        let command = match capability {
            Capability::GetVersion => &self.commands.get_version,
            Capability::SetVersion => &self.commands.set_version,
            Capability::SetPackageVersion => &self.commands.set_package_version,
            Capability::BuildPackage => &self.commands.build_package,
        };
        command.as_deref().ok_or_else(|| {
            GitIncrementError::unsupported(capability.name(), self.qualified.as_str())
        })
    }
}

impl Plugin for ScriptPlugin {
    fn qualified_name(&self) -> &str {
        &self.qualified
    }

    fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|capability| self.command(*capability).is_ok())
            .collect()
    }

    /// Runs the configured command and parses its stdout as a version
    /// string. Extra arguments are appended to the command line.
    fn get_version(&self, ctx: &PluginContext, extra_args: &[String]) -> Result<Version> {
        let mut line = self.command(Capability::GetVersion)?.to_string();
        for arg in extra_args {
            line.push(' ');
            line.push_str(arg);
        }

        let outcome = CommandRunner::run_shell(&line, &HashMap::new())?;
        let mut version = Version::parse(outcome.output.trim(), &ctx.config.version.build_tag)?;
        version.annotated = ctx.config.version.annotated;
        version.extra_args = extra_args.to_vec();
        Ok(version)
    }

    /// Runs the configured command for its side effects; the script owns
    /// tag creation. The working version passes through unchanged.
    fn set_version(&self, _ctx: &PluginContext, version: Version) -> Result<Version> {
        let command = self.command(Capability::SetVersion)?;
        CommandRunner::run_shell(command, &version.to_env_vars()?)?;
        Ok(version)
    }

    fn set_package_version(&self, _ctx: &PluginContext, version: &Version) -> Result<()> {
        let command = self.command(Capability::SetPackageVersion)?;
        CommandRunner::run_shell(command, &version.to_env_vars()?)?;
        Ok(())
    }

    fn build_package(&self, _ctx: &PluginContext, version: &Version) -> Result<BuildOutcome> {
        let command = self.command(Capability::BuildPackage)?;
        CommandRunner::run_shell(command, &version.to_env_vars()?)
    }
}
