use thiserror::Error;

/// Unified error type for git-increment operations
#[derive(Error, Debug)]
pub enum GitIncrementError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Malformed version string: '{0}'")]
    MalformedVersion(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Plugin '{attempted}' unknown, try one of: {}", .available.join(", "))]
    UnknownPlugin {
        attempted: String,
        available: Vec<String>,
    },

    #[error("Plugin '{plugin}' does not support operation '{operation}'")]
    UnsupportedOperation { operation: String, plugin: String },

    #[error("A changelog is required when incrementing the major, minor or patch number")]
    MissingChangelog,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Build failed: {0}")]
    Build(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-increment
pub type Result<T> = std::result::Result<T, GitIncrementError>;

impl GitIncrementError {
    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitIncrementError::Version(msg.into())
    }

    /// Create a malformed-version error for the given input
    pub fn malformed(input: impl Into<String>) -> Self {
        GitIncrementError::MalformedVersion(input.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitIncrementError::Config(msg.into())
    }

    /// Create a build error with context
    pub fn build(msg: impl Into<String>) -> Self {
        GitIncrementError::Build(msg.into())
    }

    pub fn unsupported(operation: impl Into<String>, plugin: impl Into<String>) -> Self {
        GitIncrementError::UnsupportedOperation {
            operation: operation.into(),
            plugin: plugin.into(),
        }
    }

    /// Process exit code for this error class.
    ///
    /// Version errors, unknown plugins and missing changelogs are
    /// distinguishable by the calling process.
    pub fn exit_code(&self) -> i32 {
        match self {
            GitIncrementError::Git(_)
            | GitIncrementError::MalformedVersion(_)
            | GitIncrementError::Version(_) => 1,
            GitIncrementError::UnknownPlugin { .. } => 2,
            GitIncrementError::MissingChangelog => 3,
            GitIncrementError::UnsupportedOperation { .. } => 4,
            GitIncrementError::Config(_) => 5,
            GitIncrementError::Build(_) | GitIncrementError::Io(_) => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitIncrementError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GitIncrementError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_unknown_plugin_lists_available_names() {
        let err = GitIncrementError::UnknownPlugin {
            attempted: "nonexistent".to_string(),
            available: vec!["bar".to_string(), "default".to_string(), "foo".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'nonexistent'"));
        assert!(msg.contains("bar, default, foo"));
    }

    #[test]
    fn test_unsupported_operation_names_plugin() {
        let err = GitIncrementError::unsupported("build_package", "gitincrement.plugins.cargo");
        let msg = err.to_string();
        assert!(msg.contains("build_package"));
        assert!(msg.contains("gitincrement.plugins.cargo"));
    }

    #[test]
    fn test_exit_codes_are_distinct_per_class() {
        let version = GitIncrementError::malformed("x.y");
        let unknown = GitIncrementError::UnknownPlugin {
            attempted: "x".to_string(),
            available: vec![],
        };
        let changelog = GitIncrementError::MissingChangelog;

        assert_eq!(version.exit_code(), 1);
        assert_eq!(unknown.exit_code(), 2);
        assert_eq!(changelog.exit_code(), 3);
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (GitIncrementError::config("x"), "Configuration error"),
            (GitIncrementError::version("x"), "Version error"),
            (GitIncrementError::malformed("x"), "Malformed version"),
            (GitIncrementError::build("x"), "Build failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
