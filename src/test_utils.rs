//! Test utilities for creating temporary directory trees.
//!
//! Only compiled for tests, benchmarks and the `test-utils` feature.

use std::fs;
use std::path::{Path, PathBuf};

use git2::Repository;
use tempfile::TempDir;

/// A temporary directory, optionally initialized as a git repository.
///
/// Removed when dropped.
pub struct TestRepo {
    dir: TempDir,
    git: Option<Repository>,
}

impl TestRepo {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir, git: None }
    }

    /// Create a new temporary directory with a git repository in it.
    pub fn with_git() -> Self {
        let mut repo = Self::new();
        repo.init_git();
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Initialize a git repository in the temporary directory.
    pub fn init_git(&mut self) {
        let git = Repository::init(self.dir.path()).expect("Failed to init git");
        self.git = Some(git);
    }

    /// Write a file and add it to the index if git is initialized.
    ///
    /// Creates parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.add_untracked(path, content);
        if let Some(git) = &self.git {
            let mut index = git.index().expect("Failed to open index");
            index
                .add_path(Path::new(path))
                .expect("Failed to add file to index");
            index.write().expect("Failed to write index");
        }
        full_path
    }

    /// Write a file without adding it to the index.
    pub fn add_untracked(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Create an empty directory.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Append lines to the repository's `.git/info/exclude`.
    pub fn add_exclude(&self, patterns: &str) {
        let git = self.git.as_ref().expect("Git not initialized");
        let info = git.path().join("info");
        fs::create_dir_all(&info).expect("Failed to create info dir");
        let exclude = info.join("exclude");
        let mut existing = fs::read_to_string(&exclude).unwrap_or_default();
        existing.push_str(patterns);
        existing.push('\n');
        fs::write(exclude, existing).expect("Failed to write exclude file");
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}
