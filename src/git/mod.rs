//! Version-control abstraction layer
//!
//! The [SourceControl] trait defines the git operations the tool needs.
//! Concrete implementations:
//!
//! - [repository::Git2SourceControl]: real implementation using the `git2` crate
//! - [mock::MockSourceControl]: recording implementation for tests
//!
//! Code should depend on the trait rather than a concrete implementation.

pub mod mock;
pub mod repository;

pub use mock::MockSourceControl;
pub use repository::Git2SourceControl;

use crate::error::Result;

/// Common version-control operations, shared by the real repository and
/// the test mock.
///
/// Implementors must be `Send + Sync`. All calls are synchronous and may
/// block on process or network work.
pub trait SourceControl: Send + Sync {
    /// List tag names matching a glob pattern (`*` for all).
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>>;

    /// Create a tag on the current HEAD. A message makes it an annotated
    /// tag; without one a lightweight tag is created.
    fn create_tag(&self, name: &str, message: Option<&str>) -> Result<()>;

    /// Delete a tag by name.
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// Short name of the currently checked-out branch.
    fn current_branch(&self) -> Result<String>;

    /// Check out a branch, tag or commit.
    fn checkout(&self, refname: &str) -> Result<()>;
}

/// Runs `f` with `refname` checked out, restoring the starting branch
/// afterwards whether or not `f` succeeded.
///
/// The body's error wins over a restore failure.
pub fn with_checkout<T>(
    scm: &dyn SourceControl,
    refname: &str,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let branch = scm.current_branch()?;
    scm.checkout(refname)?;

    let result = f();
    let restored = scm.checkout(&branch);

    match result {
        Ok(value) => restored.map(|_| value),
        Err(e) => Err(e),
    }
}
