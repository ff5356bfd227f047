use std::fs;

use crate::error::{GitIncrementError, Result};
use crate::git::with_checkout;
use crate::plugin::executor::CommandRunner;
use crate::plugin::{BuildOutcome, Capability, Plugin, PluginContext, PLUGIN_NAMESPACE};
use crate::version::Version;

/// The mandatory fallback plugin. Implements all four capabilities against
/// the version-control collaborator and the `[package]` config section.
#[derive(Debug)]
pub struct DefaultPlugin {
    qualified: String,
}

impl DefaultPlugin {
    pub fn new() -> Self {
        DefaultPlugin {
            qualified: format!("{}.default", PLUGIN_NAMESPACE),
        }
    }
}

impl Default for DefaultPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for DefaultPlugin {
    fn qualified_name(&self) -> &str {
        &self.qualified
    }

    fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL.to_vec()
    }

    /// Picks the highest parseable version among the repository's tags.
    fn get_version(&self, ctx: &PluginContext, extra_args: &[String]) -> Result<Version> {
        let tags = ctx.scm.list_tags("*")?;
        let default_build_tag = &ctx.config.version.build_tag;

        let mut versions: Vec<Version> = tags
            .iter()
            .filter_map(|tag| Version::parse(tag, default_build_tag).ok())
            .collect();
        versions.sort_by_key(|v| v.sort_key());

        let mut version = versions.pop().ok_or_else(|| {
            GitIncrementError::version("no parseable version tag found in the repository")
        })?;

        version.annotated = ctx.config.version.annotated;
        version.extra_args = extra_args.to_vec();
        Ok(version)
    }

    /// Creates the tag; annotated with the changelog message when one is
    /// present and annotation is enabled, lightweight otherwise.
    fn set_version(&self, ctx: &PluginContext, mut version: Version) -> Result<Version> {
        let tag = version.to_string();
        let message = version.changelog_text()?;

        let annotation = if version.annotated && !message.is_empty() {
            Some(message.as_str())
        } else {
            None
        };
        ctx.scm.create_tag(&tag, annotation)?;

        version
            .user_data
            .insert("created_tag".to_string(), toml::Value::String(tag));
        Ok(version)
    }

    fn set_package_version(&self, ctx: &PluginContext, version: &Version) -> Result<()> {
        if let Some(path) = &ctx.config.package.version_file {
            fs::write(path, format!("{}\n", version))?;
        }
        Ok(())
    }

    /// Runs the configured build command from a checkout of the version's
    /// tag, restoring the starting branch afterwards.
    fn build_package(&self, ctx: &PluginContext, version: &Version) -> Result<BuildOutcome> {
        let command = &ctx.config.package.build_command;
        if command.is_empty() {
            return Err(GitIncrementError::config(
                "package.build_command is not configured",
            ));
        }

        let mut argv = command.clone();
        argv.extend(version.extra_args.iter().cloned());
        let env = version.to_env_vars()?;

        with_checkout(ctx.scm, &version.to_string(), || {
            CommandRunner::run_argv(&argv, &env)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::git::MockSourceControl;

    fn context<'a>(scm: &'a MockSourceControl, config: &'a Config) -> PluginContext<'a> {
        PluginContext { scm, config }
    }

    #[test]
    fn test_get_version_picks_highest_tag() {
        let scm = MockSourceControl::new("master").with_tags(&[
            "0.3.2-jenkins-3447876",
            "0.3.1",
            "not-a-version",
            "0.2.9",
        ]);
        let config = Config::default();
        let plugin = DefaultPlugin::new();

        let version = plugin.get_version(&context(&scm, &config), &[]).unwrap();
        assert_eq!(version.to_string(), "0.3.2-jenkins-3447876");
    }

    #[test]
    fn test_get_version_attaches_extra_args() {
        let scm = MockSourceControl::new("master").with_tags(&["1.0.0"]);
        let config = Config::default();
        let plugin = DefaultPlugin::new();

        let args = vec!["--target".to_string(), "deb".to_string()];
        let version = plugin.get_version(&context(&scm, &config), &args).unwrap();
        assert_eq!(version.extra_args, args);
    }

    #[test]
    fn test_get_version_without_tags_fails() {
        let scm = MockSourceControl::new("master");
        let config = Config::default();
        let plugin = DefaultPlugin::new();

        assert!(plugin.get_version(&context(&scm, &config), &[]).is_err());
    }

    #[test]
    fn test_set_version_creates_annotated_tag_with_changelog() {
        let scm = MockSourceControl::new("master");
        let config = Config::default();
        let plugin = DefaultPlugin::new();

        let mut version = Version::new(0, 4, 0);
        version.annotated = true;
        version.changelog = "new features".to_string();

        let updated = plugin
            .set_version(&context(&scm, &config), version)
            .unwrap();
        assert_eq!(
            scm.created_tags(),
            vec![("0.4.0".to_string(), Some("new features".to_string()))]
        );
        assert_eq!(
            updated.user_data.get("created_tag"),
            Some(&toml::Value::String("0.4.0".to_string()))
        );
    }

    #[test]
    fn test_set_version_without_changelog_is_lightweight() {
        let scm = MockSourceControl::new("master");
        let config = Config::default();
        let plugin = DefaultPlugin::new();

        let mut version = Version::new(1, 0, 0);
        version.annotated = true;
        version.build_number = Some(99);

        plugin
            .set_version(&context(&scm, &config), version)
            .unwrap();
        assert_eq!(
            scm.created_tags(),
            vec![("1.0.0-jenkins-99".to_string(), None)]
        );
    }

    #[test]
    fn test_set_package_version_writes_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("VERSION");

        let scm = MockSourceControl::new("master");
        let mut config = Config::default();
        config.package.version_file = Some(path.to_str().unwrap().to_string());
        let plugin = DefaultPlugin::new();

        plugin
            .set_package_version(&context(&scm, &config), &Version::new(1, 2, 3))
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1.2.3\n");
    }

    #[test]
    fn test_build_package_runs_from_tag_checkout() {
        let scm = MockSourceControl::new("master");
        let mut config = Config::default();
        config.package.build_command = vec!["echo".to_string(), "built".to_string()];
        let plugin = DefaultPlugin::new();

        let version = Version::new(2, 0, 0);
        let outcome = plugin
            .build_package(&context(&scm, &config), &version)
            .unwrap();

        assert_eq!(outcome.output, "built");
        assert_eq!(scm.checkouts(), vec!["2.0.0", "master"]);
    }

    #[test]
    fn test_build_package_without_command_fails() {
        let scm = MockSourceControl::new("master");
        let config = Config::default();
        let plugin = DefaultPlugin::new();

        let result = plugin.build_package(&context(&scm, &config), &Version::new(1, 0, 0));
        assert!(matches!(result, Err(GitIncrementError::Config(_))));
    }
}
