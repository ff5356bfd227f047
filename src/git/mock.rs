use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{GitIncrementError, Result};
use crate::git::SourceControl;

/// Mock version-control backend for testing without a real repository.
///
/// Records every operation so tests can assert on what was (or was not)
/// called.
pub struct MockSourceControl {
    branch: String,
    tags: Mutex<Vec<String>>,
    created: Mutex<Vec<(String, Option<String>)>>,
    deleted: Mutex<Vec<String>>,
    checkouts: Mutex<Vec<String>>,
    operations: AtomicUsize,
    fail_tag_creation: bool,
}

impl MockSourceControl {
    /// Create a mock repository checked out on `branch`.
    pub fn new(branch: impl Into<String>) -> Self {
        MockSourceControl {
            branch: branch.into(),
            tags: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            checkouts: Mutex::new(Vec::new()),
            operations: AtomicUsize::new(0),
            fail_tag_creation: false,
        }
    }

    /// Seed the repository with existing tags.
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = Mutex::new(tags.iter().map(|t| t.to_string()).collect());
        self
    }

    /// Make `create_tag` fail, for exercising error paths.
    pub fn failing_tag_creation(mut self) -> Self {
        self.fail_tag_creation = true;
        self
    }

    /// Tags created through this mock, with their annotation messages.
    pub fn created_tags(&self) -> Vec<(String, Option<String>)> {
        self.created.lock().unwrap().clone()
    }

    /// Tags deleted through this mock.
    pub fn deleted_tags(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    /// Refs checked out, in order.
    pub fn checkouts(&self) -> Vec<String> {
        self.checkouts.lock().unwrap().clone()
    }

    /// Total number of operations invoked on this mock.
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }
}

impl SourceControl for MockSourceControl {
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        self.record();
        let tags = self.tags.lock().unwrap();
        if pattern == "*" {
            return Ok(tags.clone());
        }
        let prefix = pattern.trim_end_matches('*');
        Ok(tags
            .iter()
            .filter(|t| t.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn create_tag(&self, name: &str, message: Option<&str>) -> Result<()> {
        self.record();
        if self.fail_tag_creation {
            return Err(GitIncrementError::version(format!(
                "cannot create tag '{}'",
                name
            )));
        }
        self.tags.lock().unwrap().push(name.to_string());
        self.created
            .lock()
            .unwrap()
            .push((name.to_string(), message.map(|m| m.to_string())));
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.record();
        self.tags.lock().unwrap().retain(|t| t != name);
        self.deleted.lock().unwrap().push(name.to_string());
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        self.record();
        Ok(self.branch.clone())
    }

    fn checkout(&self, refname: &str) -> Result<()> {
        self.record();
        self.checkouts.lock().unwrap().push(refname.to_string());
        Ok(())
    }
}
