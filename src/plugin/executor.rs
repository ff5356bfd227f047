use std::collections::HashMap;
use std::process::Command;

use crate::error::{GitIncrementError, Result};
use crate::plugin::BuildOutcome;

/// Executes packaging commands with version context in the environment.
pub struct CommandRunner;

impl CommandRunner {
    /// Run an argv-style command.
    ///
    /// A non-zero exit code is an error carrying the captured output.
    pub fn run_argv(argv: &[String], env: &HashMap<String, String>) -> Result<BuildOutcome> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| GitIncrementError::build("empty command"))?;

        let mut cmd = Command::new(program);
        cmd.args(args);
        Self::run(cmd, env)
    }

    /// Run a command line through `sh -c`, for script-plugin commands
    /// configured as a single string.
    pub fn run_shell(command: &str, env: &HashMap<String, String>) -> Result<BuildOutcome> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        Self::run(cmd, env)
    }

    fn run(mut cmd: Command, env: &HashMap<String, String>) -> Result<BuildOutcome> {
        for (key, value) in env {
            cmd.env(key, value);
        }

        let output = cmd
            .output()
            .map_err(|e| GitIncrementError::build(format!("failed to execute command: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitIncrementError::build(format!(
                "command exited with code {}\nStdout: {}\nStderr: {}",
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }

        Ok(BuildOutcome {
            status: output.status.code().unwrap_or(0),
            output: stdout.trim_end().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_shell_captures_output() {
        let outcome = CommandRunner::run_shell("echo hello", &HashMap::new()).unwrap();
        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.output, "hello");
    }

    #[test]
    fn test_run_shell_passes_environment() {
        let mut env = HashMap::new();
        env.insert("GITINCREMENT_VERSION".to_string(), "1.2.3".to_string());

        let outcome = CommandRunner::run_shell("echo $GITINCREMENT_VERSION", &env).unwrap();
        assert_eq!(outcome.output, "1.2.3");
    }

    #[test]
    fn test_nonzero_exit_is_an_error() {
        let result = CommandRunner::run_shell("echo broken >&2; exit 3", &HashMap::new());
        let err = result.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("code 3"), "unexpected message: {}", msg);
        assert!(msg.contains("broken"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let argv = vec!["definitely-not-a-real-program".to_string()];
        assert!(CommandRunner::run_argv(&argv, &HashMap::new()).is_err());
    }

    #[test]
    fn test_empty_argv_is_an_error() {
        assert!(CommandRunner::run_argv(&[], &HashMap::new()).is_err());
    }
}
