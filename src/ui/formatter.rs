//! Pure formatting functions for UI output.
//!
//! All display logic lives here, separated from user interaction.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display available plugins by short name.
pub fn display_available_plugins(plugins: &[String]) {
    println!("{}", style("Available plugins:").bold());
    for plugin in plugins {
        println!("  - {}", plugin);
    }
}
