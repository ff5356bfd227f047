use git2::Repository;
use std::path::Path;

use crate::error::{GitIncrementError, Result};
use crate::git::SourceControl;

/// Wrapper around git2::Repository implementing [SourceControl].
pub struct Git2SourceControl {
    repo: Repository,
}

impl Git2SourceControl {
    /// Open or discover a git repository at or above `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(Git2SourceControl { repo })
    }
}

impl SourceControl for Git2SourceControl {
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(Some(pattern))?;
        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn create_tag(&self, name: &str, message: Option<&str>) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;

        match message {
            Some(message) => {
                let signature = self.repo.signature()?;
                self.repo
                    .tag(name, head.as_object(), &signature, message, false)?;
            }
            None => {
                self.repo.tag_lightweight(name, head.as_object(), false)?;
            }
        }

        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.repo.tag_delete(name)?;
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        head.shorthand()
            .map(|s| s.to_string())
            .ok_or_else(|| GitIncrementError::version("HEAD is not a named reference"))
    }

    fn checkout(&self, refname: &str) -> Result<()> {
        let (object, reference) = self.repo.revparse_ext(refname)?;

        self.repo.checkout_tree(&object, None)?;

        match reference {
            Some(reference) => {
                let name = reference.name().ok_or_else(|| {
                    GitIncrementError::version(format!("reference for '{}' is not utf-8", refname))
                })?;
                self.repo.set_head(name)?;
            }
            None => {
                self.repo.set_head_detached(object.id())?;
            }
        }

        Ok(())
    }
}

// SAFETY: Git2SourceControl wraps git2::Repository which is Send.
// All access goes through &self with libgit2's thread-safe object model.
unsafe impl Sync for Git2SourceControl {}
