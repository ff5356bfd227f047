//! User interface module - interaction (prompts), formatting and the
//! reporting collaborator handed to the controller.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{display_available_plugins, display_error, display_status, display_success};

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y"/"yes" and "n"/"no" (case-insensitive); pressing Enter picks
/// `default_yes`.
pub fn confirm_action(prompt: &str, default_yes: bool) -> Result<bool> {
    let suffix = if default_yes { "(Y/n)" } else { "(y/N)" };
    print!("\n{} {}: ", prompt, suffix);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    if response.is_empty() {
        return Ok(default_yes);
    }
    Ok(response == "y" || response == "yes")
}

/// Run-progress reporting collaborator.
///
/// Passed into the controller explicitly instead of a process-wide logger,
/// so tests can capture what would have been printed.
pub trait Reporter {
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
    fn error(&self, message: &str);
}

/// Console-backed reporter; `debug` output is gated behind verbose mode.
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        ConsoleReporter { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        display_status(message);
    }

    fn debug(&self, message: &str) {
        if self.verbose {
            display_status(message);
        }
    }

    fn error(&self, message: &str) {
        display_error(message);
    }
}

/// Reporter that records messages in memory, for tests.
#[derive(Default)]
pub struct MemoryReporter {
    messages: Mutex<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages reported so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    fn record(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

impl Reporter for MemoryReporter {
    fn info(&self, message: &str) {
        self.record(message);
    }

    fn debug(&self, message: &str) {
        self.record(message);
    }

    fn error(&self, message: &str) {
        self.record(message);
    }
}
