use clap::Parser;
use std::process;

use git_increment::config::{self, RunConfig};
use git_increment::controller::RepositoryController;
use git_increment::git::{Git2SourceControl, SourceControl};
use git_increment::plugin::{PluginContext, PluginRegistry};
use git_increment::ui::{self, ConsoleReporter};

#[derive(clap::Parser)]
#[command(
    name = "git-increment",
    about = "Version increment tool for git repositories"
)]
struct Args {
    #[arg(short = 'p', long, help = "Increment the patch number")]
    patch: bool,

    #[arg(short = 'm', long, help = "Increment the minor number")]
    minor: bool,

    #[arg(short = 'M', long, help = "Increment the major number")]
    major: bool,

    #[arg(short = 'b', long, help = "Increment the build number")]
    build: bool,

    #[arg(short = 'B', long, help = "Create a tag with this exact build number")]
    build_number: Option<u32>,

    #[arg(
        short = 'c',
        long,
        help = "Description of the changes in the new version, or a file holding it"
    )]
    changelog: Option<String>,

    #[arg(short = 'n', long, help = "Don't perform any changes")]
    dry_run: bool,

    #[arg(
        long,
        default_value = "default",
        help = "The plugin used to get the version and build the package"
    )]
    plugin: String,

    #[arg(long, help = "Tag only, don't build")]
    skip_build: bool,

    #[arg(long, help = "Build only, don't tag")]
    skip_tag: bool,

    #[arg(short = 'v', long, help = "More output")]
    verbose: bool,

    #[arg(long, help = "Show available plugins and exit")]
    list: bool,

    #[arg(long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Extra arguments passed through to the plugin"
    )]
    extra_args: Vec<String>,
}

fn main() {
    let args = Args::parse();

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            process::exit(e.exit_code());
        }
    };

    // One discovery pass over the available plugins
    let registry = PluginRegistry::discover(&config);

    if args.list {
        ui::display_available_plugins(&registry.available());
        return;
    }

    let scm = match Git2SourceControl::open(".") {
        Ok(scm) => scm,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            process::exit(e.exit_code());
        }
    };

    let run_config = RunConfig {
        increment_major: args.major,
        increment_minor: args.minor,
        increment_patch: args.patch,
        increment_build: args.build,
        explicit_build_number: args.build_number,
        changelog: args.changelog.clone(),
        dry_run: args.dry_run,
        skip_tag: args.skip_tag,
        skip_build: args.skip_build,
        plugin_name: args.plugin.clone(),
    };

    let reporter = ConsoleReporter::new(args.verbose);

    let mut controller = match RepositoryController::new(&registry, run_config) {
        Ok(controller) => controller,
        Err(e) => {
            ui::display_error(&e.to_string());
            process::exit(e.exit_code());
        }
    };

    let ctx = PluginContext {
        scm: &scm,
        config: &config,
    };

    match controller.run(&ctx, &reporter, &args.extra_args) {
        Ok(Some(outcome)) => {
            if !outcome.output.is_empty() {
                println!("{}", outcome.output);
            }
            ui::display_success("Package build finished");
        }
        Ok(None) => {
            ui::display_success("Done");
        }
        Err(e) => {
            ui::display_error(&e.to_string());

            // A tag may already exist; offer to undo it before exiting.
            if let Some(tag) = controller.created_tag() {
                offer_tag_removal(&scm, tag);
            }

            process::exit(e.exit_code());
        }
    }
}

/// Confirmation-gated compensation after a failed run.
///
/// Deletion is best-effort: a failure here is logged and never escalated.
fn offer_tag_removal(scm: &dyn SourceControl, tag: &str) {
    let prompt = format!(
        "An error occurred, do you need me to remove the tag {}?",
        tag
    );

    match ui::confirm_action(&prompt, false) {
        Ok(true) => match scm.delete_tag(tag) {
            Ok(()) => ui::display_success(&format!("Removed tag {}", tag)),
            Err(e) => ui::display_error(&format!("Could not remove tag {}: {}", tag, e)),
        },
        Ok(false) => {}
        Err(e) => ui::display_error(&format!("Could not read confirmation: {}", e)),
    }
}
