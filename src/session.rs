//! Interactive navigation session over a selection tree
//!
//! A [`Session`] owns the tree, the visible list and the cursor. Commands are
//! processed one at a time to completion. Rebuilds (show-all toggle, entering
//! a directory) replace the tree wholesale and reset every selection; when a
//! rebuild fails the previous tree stays in place.

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::digest::{Digest, DigestGenerator, DigestStats};
use crate::error::{Error, Result};
use crate::tree::{
    BuildConfig, NodeId, SelectionState, Tree, TreeBuilder, flatten_visible, reanchor,
};

/// Why an input line is not a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("o needs a file name")]
    MissingFileName,
    #[error("unknown command '{0}' (? for help)")]
    Unknown(String),
}

/// A user command, one per key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Expand,
    Collapse,
    Toggle,
    ToggleAll,
    ToggleShowAll,
    Enter,
    Preview,
    SetOutput(PathBuf),
    Generate,
    Help,
    Quit,
}

impl Command {
    /// Parse a key name as typed on one input line, e.g. `j`, `space`,
    /// `enter` or `o digest.txt`.
    pub fn parse(input: &str) -> std::result::Result<Self, ParseCommandError> {
        let input = input.trim_end_matches(['\r', '\n']);
        if input == " " {
            return Ok(Command::Toggle);
        }
        let input = input.trim();
        if input == "o" {
            return Err(ParseCommandError::MissingFileName);
        }
        if let Some(rest) = input.strip_prefix("o ") {
            return Ok(Command::SetOutput(PathBuf::from(rest.trim())));
        }
        let cmd = match input {
            "k" | "up" => Command::Up,
            "j" | "down" => Command::Down,
            "l" | "right" => Command::Expand,
            "h" | "left" => Command::Collapse,
            "space" => Command::Toggle,
            "a" => Command::ToggleAll,
            "i" => Command::ToggleShowAll,
            "" | "enter" => Command::Enter,
            "p" => Command::Preview,
            "g" => Command::Generate,
            "?" => Command::Help,
            "q" => Command::Quit,
            _ => return Err(ParseCommandError::Unknown(input.to_string())),
        };
        Ok(cmd)
    }
}

/// What the caller should do after a command.
#[derive(Debug)]
pub enum Outcome {
    Continue,
    Quit,
    /// A digest was generated and the session is over.
    Finished(Digest),
}

/// Resolve a user-supplied root to an absolute, canonical directory path.
pub fn validate_root(path: &Path) -> Result<PathBuf> {
    let path = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| Error::io(path, e))?
            .join(path)
    };
    match absolute.canonicalize() {
        Ok(resolved) if resolved.is_dir() => Ok(resolved),
        _ => Err(Error::InvalidRootPath(absolute)),
    }
}

pub struct Session {
    root: PathBuf,
    config: BuildConfig,
    tree: Tree,
    visible: Vec<NodeId>,
    cursor: usize,
    generator: DigestGenerator,
    stats: DigestStats,
    output_file: Option<PathBuf>,
    preview: Option<Digest>,
    show_help: bool,
    status: Option<String>,
}

impl Session {
    /// Validate `path` and build its tree.
    pub fn open(path: &Path, config: BuildConfig, generator: DigestGenerator) -> Result<Self> {
        let root = validate_root(path)?;
        let tree = build_tree(&root, &config)?;
        let visible = flatten_visible(&tree);
        let stats = generator.stats(&tree);
        tracing::info!("opened {} ({} entries)", root.display(), tree.len());
        Ok(Self {
            root,
            config,
            tree,
            visible,
            cursor: 0,
            generator,
            stats,
            output_file: None,
            preview: None,
            show_help: false,
            status: None,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Select every node whose root-relative path matches one of `patterns`.
    /// Returns the number of nodes matched.
    pub fn select_matching(&mut self, patterns: &[Pattern]) -> usize {
        let matched: Vec<NodeId> = self
            .tree
            .preorder()
            .into_iter()
            .filter(|&id| id != self.tree.root())
            .filter(|&id| {
                let relative = self.tree.relative_path(id);
                patterns.iter().any(|p| p.matches(&relative))
            })
            .collect();
        for &id in &matched {
            self.tree.set_selection(id, SelectionState::Full);
        }
        self.refresh_stats();
        matched.len()
    }

    /// Select the whole tree.
    pub fn select_all(&mut self) {
        let root = self.tree.root();
        self.tree.set_selection(root, SelectionState::Full);
        self.refresh_stats();
    }

    pub fn visible(&self) -> &[NodeId] {
        &self.visible
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Node under the cursor.
    pub fn current(&self) -> Option<NodeId> {
        self.visible.get(self.cursor).copied()
    }

    pub fn stats(&self) -> &DigestStats {
        &self.stats
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    pub fn set_output_file(&mut self, path: impl Into<PathBuf>) {
        self.output_file = Some(path.into());
    }

    pub fn preview(&self) -> Option<&Digest> {
        self.preview.as_ref()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Message from the last failed command, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.visible.len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor onto a node if it is visible.
    pub fn focus(&mut self, id: NodeId) -> bool {
        match self.visible.iter().position(|&v| v == id) {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    /// Expand the directory under the cursor.
    pub fn expand(&mut self) -> bool {
        let Some(id) = self.current() else {
            return false;
        };
        if !self.tree.set_expanded(id, true) {
            return false;
        }
        self.refresh_visible(id);
        true
    }

    /// Collapse the directory under the cursor, or else collapse its parent
    /// and move the cursor there.
    pub fn collapse(&mut self) -> bool {
        let Some(id) = self.current() else {
            return false;
        };
        let node = self.tree.node(id);
        let target = if node.is_dir && node.expanded {
            id
        } else if let Some(parent) = node.parent {
            parent
        } else {
            return false;
        };
        self.tree.set_expanded(target, false);
        self.refresh_visible(target);
        true
    }

    pub fn toggle_current(&mut self) {
        if let Some(id) = self.current() {
            self.tree.toggle(id);
            self.refresh_stats();
        }
    }

    pub fn toggle_all(&mut self) {
        let visible = self.visible.clone();
        self.tree.select_all_visible(&visible);
        self.refresh_stats();
    }

    /// Rebuild with ignore rules switched on or off.
    pub fn toggle_show_all(&mut self) -> Result<()> {
        let config = self.config.toggled();
        self.rebuild(self.root.clone(), config)
    }

    /// Close the preview, or re-root the session at the directory under the
    /// cursor.
    pub fn enter(&mut self) -> Result<()> {
        if self.preview.take().is_some() {
            return Ok(());
        }
        let Some(id) = self.current() else {
            return Ok(());
        };
        let node = self.tree.node(id);
        if !node.is_dir {
            return Ok(());
        }
        let path = node.path.clone();
        self.rebuild(path, self.config.clone())
    }

    /// Generate the digest, writing it to the output file when one is set.
    pub fn generate(&mut self) -> Result<Digest> {
        let digest = self.generator.generate(&self.tree);
        if let Some(path) = &self.output_file {
            digest.write_to(path)?;
        }
        Ok(digest)
    }

    /// Generate the digest and keep it for display.
    pub fn open_preview(&mut self) {
        self.preview = Some(self.generator.generate(&self.tree));
    }

    pub fn handle(&mut self, command: Command) -> Outcome {
        self.status = None;
        let result = match command {
            Command::Up => {
                self.move_up();
                Ok(())
            }
            Command::Down => {
                self.move_down();
                Ok(())
            }
            Command::Expand => {
                self.expand();
                Ok(())
            }
            Command::Collapse => {
                self.collapse();
                Ok(())
            }
            Command::Toggle => {
                self.toggle_current();
                Ok(())
            }
            Command::ToggleAll => {
                self.toggle_all();
                Ok(())
            }
            Command::ToggleShowAll => self.toggle_show_all(),
            Command::Enter => self.enter(),
            Command::Preview => {
                self.open_preview();
                Ok(())
            }
            Command::SetOutput(path) => {
                self.set_output_file(path);
                Ok(())
            }
            Command::Help => {
                self.show_help = !self.show_help;
                Ok(())
            }
            Command::Quit => return Outcome::Quit,
            Command::Generate => match self.generate() {
                Ok(digest) => return Outcome::Finished(digest),
                Err(e) => Err(e),
            },
        };

        if let Err(e) = result {
            tracing::warn!("{}", e);
            self.status = Some(e.to_string());
        }
        Outcome::Continue
    }

    fn rebuild(&mut self, root: PathBuf, config: BuildConfig) -> Result<()> {
        let root = validate_root(&root)?;
        let tree = build_tree(&root, &config)?;
        tracing::info!(
            "rebuilt tree at {} (show all: {}, {} entries)",
            root.display(),
            config.show_all,
            tree.len()
        );
        self.root = root;
        self.config = config;
        self.tree = tree;
        self.visible = flatten_visible(&self.tree);
        self.cursor = 0;
        self.preview = None;
        self.refresh_stats();
        Ok(())
    }

    fn refresh_visible(&mut self, anchor: NodeId) {
        self.visible = flatten_visible(&self.tree);
        self.cursor = reanchor(&self.visible, anchor, self.cursor);
    }

    fn refresh_stats(&mut self) {
        self.stats = self.generator.stats(&self.tree);
    }
}

fn build_tree(root: &Path, config: &BuildConfig) -> Result<Tree> {
    TreeBuilder::new(config.clone())
        .with_discovered_filter(root)
        .build(root)
}
