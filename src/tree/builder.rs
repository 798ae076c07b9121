//! TreeBuilder - scans a directory into an in-memory tree

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::git::{IgnoreFilter, VCS_DIR};

use super::config::BuildConfig;
use super::node::{NodeId, Tree};

/// Builds a [`Tree`] from the filesystem, pruning ignored entries as it goes.
///
/// The build is fail-fast: any entry that cannot be stat'ed and any directory
/// that cannot be listed aborts the whole build.
pub struct TreeBuilder {
    config: BuildConfig,
    filter: Option<IgnoreFilter>,
}

impl TreeBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: IgnoreFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Load ignore rules from the repository containing `root`.
    pub fn with_discovered_filter(self, root: &Path) -> Self {
        let filter = IgnoreFilter::discover(root, &self.config.exclude_patterns);
        tracing::debug!(
            "loaded {} ignore patterns rooted at {}",
            filter.len(),
            filter.root().display()
        );
        self.with_filter(filter)
    }

    pub fn build(&self, root: &Path) -> Result<Tree> {
        let meta = fs::metadata(root).map_err(|e| Error::io(root, e))?;
        let name = root
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| root.display().to_string());

        let mut tree = Tree::new(name, root, meta.is_dir());
        if meta.is_dir() {
            let root_id = tree.root();
            self.build_children(&mut tree, root_id)?;
        }

        tracing::debug!("built tree for {} ({} nodes)", root.display(), tree.len());
        Ok(tree)
    }

    fn build_children(&self, tree: &mut Tree, dir: NodeId) -> Result<()> {
        let path = tree.node(dir).path.clone();
        let mut entries = fs::read_dir(&path)
            .and_then(|rd| rd.collect::<std::io::Result<Vec<_>>>())
            .map_err(|e| Error::io(&path, e))?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let entry_path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let file_type = entry.file_type().map_err(|e| Error::io(&entry_path, e))?;
            let is_symlink = file_type.is_symlink();

            // Only kept entries must stat cleanly. A dangling link is matched as a file.
            let listed_as_dir = file_type.is_dir() || (is_symlink && entry_path.is_dir());
            if self.should_skip(&entry_path, &name, listed_as_dir) {
                tracing::trace!("skipping ignored {}", entry_path.display());
                continue;
            }

            let meta = fs::metadata(&entry_path).map_err(|e| Error::io(&entry_path, e))?;
            let is_dir = meta.is_dir();
            let child = tree.add_child(dir, name, &entry_path, is_dir);

            // Symlinked directories appear in the tree but are never descended.
            if is_dir && !is_symlink {
                self.build_children(tree, child)?;
            }
        }
        Ok(())
    }

    fn should_skip(&self, path: &Path, name: &str, is_dir: bool) -> bool {
        if !self.config.respects_ignore() {
            return false;
        }
        if is_dir && name == VCS_DIR {
            return true;
        }
        self.filter
            .as_ref()
            .is_some_and(|f| f.is_excluded(path, is_dir))
    }
}
