//! Git repository integration: ignore rules for tree building

use std::path::{Path, PathBuf};

use git2::Repository;
use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// Name of the VCS metadata directory, always hidden while ignore rules apply.
pub const VCS_DIR: &str = ".git";

/// Decides whether a path is excluded by ignore patterns.
///
/// Patterns come from the repository exclude file, the worktree's root
/// `.gitignore` and any extra patterns, in that order. The last pattern that
/// matches a path decides, so `!keep.log` after `*.log` re-includes the file.
pub struct IgnoreFilter {
    root: PathBuf,
    matcher: Gitignore,
}

impl IgnoreFilter {
    /// Discover the git repository containing `path` and load its rules.
    ///
    /// Outside a repository only `extra` applies, rooted at `path`.
    pub fn discover(path: &Path, extra: &[String]) -> Self {
        let repo = match Repository::discover(path) {
            Ok(repo) => repo,
            Err(e) => {
                tracing::debug!("no git repository at {}: {}", path.display(), e.message());
                return Self::from_patterns(path, extra.iter().map(String::as_str));
            }
        };
        let Some(workdir) = repo.workdir().map(Path::to_path_buf) else {
            tracing::debug!("bare repository at {}, using extra patterns only", path.display());
            return Self::from_patterns(path, extra.iter().map(String::as_str));
        };

        let mut lines = Vec::new();
        lines.extend(read_pattern_file(&repo.path().join("info").join("exclude")));
        lines.extend(read_pattern_file(&workdir.join(".gitignore")));
        lines.extend(extra.iter().cloned());

        Self::from_patterns(&workdir, lines.iter().map(String::as_str))
    }

    /// Build a filter from explicit patterns, rooted at `root`.
    pub fn from_patterns<'a, I>(root: &Path, patterns: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                tracing::warn!("skipping invalid ignore pattern '{}': {}", pattern, e);
            }
        }
        let matcher = builder.build().unwrap_or_else(|e| {
            tracing::warn!("ignore rules unusable, showing everything: {}", e);
            Gitignore::empty()
        });
        Self {
            root: root.to_path_buf(),
            matcher,
        }
    }

    /// A filter that excludes nothing.
    pub fn empty(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            matcher: Gitignore::empty(),
        }
    }

    /// The directory ignore patterns are relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of loaded patterns, including negations.
    pub fn len(&self) -> usize {
        (self.matcher.num_ignores() + self.matcher.num_whitelists()) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check a path relative to the ignore root.
    pub fn should_exclude(&self, relative: &Path, is_dir: bool) -> bool {
        self.matcher.matched(relative, is_dir).is_ignore()
    }

    /// Check an absolute path. Paths outside the ignore root are never excluded.
    pub fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        match path.strip_prefix(&self.root) {
            Ok(relative) if !relative.as_os_str().is_empty() => {
                self.should_exclude(relative, is_dir)
            }
            _ => false,
        }
    }
}

/// Read ignore patterns from a file: trimmed lines, skipping blanks and comments.
/// A missing or unreadable file yields no patterns.
fn read_pattern_file(path: &Path) -> Vec<String> {
    let Ok(data) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    parse_patterns(&data)
}

fn parse_patterns(data: &str) -> Vec<String> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestRepo;

    #[test]
    fn test_parse_patterns_skips_comments_and_blanks() {
        let patterns = parse_patterns("# build output\n\n  target/  \n*.log\n   \n#x\n!keep.log\n");
        assert_eq!(patterns, vec!["target/", "*.log", "!keep.log"]);
    }

    #[test]
    fn test_glob_pattern_excludes_files() {
        let filter = IgnoreFilter::from_patterns(Path::new("/repo"), ["*.log"]);
        assert!(filter.should_exclude(Path::new("x.log"), false));
        assert!(filter.should_exclude(Path::new("nested/x.log"), false));
        assert!(!filter.should_exclude(Path::new("y.txt"), false));
    }

    #[test]
    fn test_directory_only_pattern() {
        let filter = IgnoreFilter::from_patterns(Path::new("/repo"), ["build/"]);
        assert!(filter.should_exclude(Path::new("build"), true));
        assert!(!filter.should_exclude(Path::new("build"), false));
    }

    #[test]
    fn test_last_match_wins() {
        let filter = IgnoreFilter::from_patterns(Path::new("/repo"), ["*.log", "!keep.log"]);
        assert!(filter.should_exclude(Path::new("drop.log"), false));
        assert!(!filter.should_exclude(Path::new("keep.log"), false));

        let filter = IgnoreFilter::from_patterns(Path::new("/repo"), ["!keep.log", "*.log"]);
        assert!(filter.should_exclude(Path::new("keep.log"), false));
    }

    #[test]
    fn test_no_patterns_includes_everything() {
        let filter = IgnoreFilter::empty(Path::new("/repo"));
        assert!(filter.is_empty());
        assert!(!filter.should_exclude(Path::new("anything.log"), false));
    }

    #[test]
    fn test_is_excluded_uses_root_relative_path() {
        let filter = IgnoreFilter::from_patterns(Path::new("/repo"), ["/top.txt"]);
        assert!(filter.is_excluded(Path::new("/repo/top.txt"), false));
        assert!(!filter.is_excluded(Path::new("/repo/sub/top.txt"), false));
        assert!(!filter.is_excluded(Path::new("/elsewhere/top.txt"), false));
        assert!(!filter.is_excluded(Path::new("/repo"), true));
    }

    #[test]
    fn test_discover_reads_gitignore() {
        let repo = TestRepo::with_git();
        repo.add_file(".gitignore", "# logs\n*.log\n\ntarget/\n");
        let filter = IgnoreFilter::discover(repo.path(), &[]);
        assert_eq!(filter.len(), 2);
        let root = filter.root().to_path_buf();
        assert!(filter.is_excluded(&root.join("debug.log"), false));
        assert!(filter.is_excluded(&root.join("target"), true));
        assert!(!filter.is_excluded(&root.join("main.rs"), false));
    }

    #[test]
    fn test_discover_reads_info_exclude() {
        let repo = TestRepo::with_git();
        repo.add_exclude("secret.txt");
        let filter = IgnoreFilter::discover(repo.path(), &[]);
        assert!(filter.is_excluded(&filter.root().join("secret.txt"), false));
    }

    #[test]
    fn test_discover_from_subdirectory_uses_worktree_root() {
        let repo = TestRepo::with_git();
        repo.add_file(".gitignore", "/sub/skip.txt\n");
        repo.add_untracked("sub/skip.txt", "x");
        let sub = repo.path().join("sub");
        let filter = IgnoreFilter::discover(&sub, &[]);
        assert!(filter.is_excluded(&filter.root().join("sub/skip.txt"), false));
    }

    #[test]
    fn test_discover_outside_repo_uses_extra_patterns() {
        let repo = TestRepo::new();
        repo.add_untracked(".gitignore", "*.log\n");
        let filter = IgnoreFilter::discover(repo.path(), &["*.tmp".to_string()]);
        assert_eq!(filter.len(), 1);
        assert!(filter.should_exclude(Path::new("a.tmp"), false));
        assert!(!filter.should_exclude(Path::new("a.log"), false));
    }

    #[test]
    fn test_extra_patterns_override_gitignore() {
        let repo = TestRepo::with_git();
        repo.add_file(".gitignore", "*.log\n");
        let filter = IgnoreFilter::discover(repo.path(), &["!keep.log".to_string()]);
        assert!(!filter.should_exclude(Path::new("keep.log"), false));
        assert!(filter.should_exclude(Path::new("drop.log"), false));
    }
}
