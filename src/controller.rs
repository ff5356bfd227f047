//! Repository controller: the run's orchestration state machine.
//!
//! Resolve plugins, acquire the current version, update it, build the
//! package — each phase gated by the run configuration and terminal on the
//! first failure. The controller only surfaces errors; offering to delete a
//! just-created tag is the caller's job, via [RepositoryController::created_tag].

use crate::config::RunConfig;
use crate::error::Result;
use crate::plugin::{BuildOutcome, Dispatcher, PluginContext, PluginRegistry};
use crate::ui::Reporter;
use crate::version::Version;

pub struct RepositoryController {
    dispatcher: Dispatcher,
    run_config: RunConfig,
    created_tag: Option<String>,
}

impl RepositoryController {
    /// Resolves the default and picked plugins up front; an unknown plugin
    /// name fails here, before anything runs.
    pub fn new(registry: &PluginRegistry, run_config: RunConfig) -> Result<Self> {
        let dispatcher = registry.dispatcher(&run_config.plugin_name)?;
        Ok(RepositoryController {
            dispatcher,
            run_config,
            created_tag: None,
        })
    }

    /// The tag created during [run](Self::run), if it got that far.
    ///
    /// Set only after the tag exists, so the caller can offer compensation
    /// when a later phase fails.
    pub fn created_tag(&self) -> Option<&str> {
        self.created_tag.as_deref()
    }

    /// Executes the run: acquire version, update it unless `skip_tag`,
    /// build unless `skip_build`.
    ///
    /// The changelog invariant is checked before any plugin or
    /// version-control call, so a violation leaves no partial state.
    pub fn run(
        &mut self,
        ctx: &PluginContext,
        reporter: &dyn Reporter,
        extra_args: &[String],
    ) -> Result<Option<BuildOutcome>> {
        self.run_config.validate()?;

        let mut version = self.dispatcher.get_version(ctx, extra_args)?;
        reporter.debug(&format!("latest version is {}", version));

        if !self.run_config.skip_tag {
            version = self.update_version(ctx, reporter, version)?;
            // set_version implementations may hand back a version without
            // the pass-through args; the build step still needs them.
            if version.extra_args.is_empty() {
                version.extra_args = extra_args.to_vec();
            }
        }

        if !self.run_config.skip_build {
            return self.build_package(ctx, reporter, &version);
        }

        Ok(None)
    }

    /// Computes the new version and writes it as a tag.
    ///
    /// The plugin's returned value replaces the working version, so a
    /// backend can enrich it after tagging.
    fn update_version(
        &mut self,
        ctx: &PluginContext,
        reporter: &dyn Reporter,
        mut version: Version,
    ) -> Result<Version> {
        if let Some(changelog) = &self.run_config.changelog {
            version.changelog = changelog.clone();
        }
        version.apply_increment(&self.run_config, 1);

        if self.run_config.dry_run {
            reporter.info(&format!(
                "Not updating repository to version {}, because of --dry-run",
                version
            ));
            return Ok(version);
        }

        let tag = version.to_string();
        let updated = self.dispatcher.set_version(ctx, version)?;
        self.created_tag = Some(tag);
        Ok(updated)
    }

    fn build_package(
        &self,
        ctx: &PluginContext,
        reporter: &dyn Reporter,
        version: &Version,
    ) -> Result<Option<BuildOutcome>> {
        if self.run_config.dry_run {
            reporter.info(&format!(
                "Not updating package version to {}, because of --dry-run",
                version
            ));
            return Ok(None);
        }

        self.dispatcher.set_package_version(ctx, version)?;
        let outcome = self.dispatcher.build_package(ctx, version)?;
        Ok(Some(outcome))
    }
}
