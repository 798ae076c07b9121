//! Colored rendering of a session or tree

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::session::Session;
use crate::tree::{NodeId, Tree, flatten_visible};

use super::config::OutputConfig;
use super::line::{HELP, KEY_HINTS, format_line, format_status};

/// Renders trees and sessions to a terminal stream.
pub struct TreeView {
    config: OutputConfig,
}

impl TreeView {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    fn stdout(&self) -> StandardStream {
        let choice = if self.config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        StandardStream::stdout(choice)
    }

    /// Print a tree with its selection marks, no cursor.
    pub fn print_tree(&self, tree: &Tree) -> io::Result<()> {
        let mut stdout = self.stdout();
        self.write_tree(&mut stdout, tree)
    }

    pub fn write_tree<W: WriteColor>(&self, out: &mut W, tree: &Tree) -> io::Result<()> {
        if self.config.expand_all {
            let mut expanded = tree.clone();
            expanded.expand_all();
            let visible = flatten_visible(&expanded);
            return self.write_lines(out, &expanded, &visible, None);
        }
        self.write_lines(out, tree, &flatten_visible(tree), None)
    }

    /// Print the full session screen: help, preview, or tree plus status bar.
    pub fn print_session(&self, session: &Session) -> io::Result<()> {
        let mut stdout = self.stdout();
        self.write_session(&mut stdout, session)
    }

    pub fn write_session<W: WriteColor>(&self, out: &mut W, session: &Session) -> io::Result<()> {
        if session.show_help() {
            write!(out, "{}", HELP)?;
            return Ok(());
        }
        if let Some(digest) = session.preview() {
            write!(out, "{}", digest.text())?;
            writeln!(out, "(enter to close preview)")?;
            return Ok(());
        }

        self.write_lines(out, session.tree(), session.visible(), Some(session.cursor()))?;
        writeln!(out)?;

        let mut bold = ColorSpec::new();
        bold.set_bold(true);
        out.set_color(&bold)?;
        writeln!(out, "{}", format_status(session.stats()))?;
        out.reset()?;

        if let Some(status) = session.status() {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            writeln!(out, "{}", status)?;
            out.reset()?;
        }
        if let Some(file) = session.output_file() {
            writeln!(out, "Output: {}", file.display())?;
        }

        out.set_color(ColorSpec::new().set_fg(Some(Color::Black)).set_intense(true))?;
        writeln!(out, "{}", KEY_HINTS)?;
        out.reset()?;
        Ok(())
    }

    fn write_lines<W: WriteColor>(
        &self,
        out: &mut W,
        tree: &Tree,
        visible: &[NodeId],
        cursor: Option<usize>,
    ) -> io::Result<()> {
        for (index, &id) in visible.iter().enumerate() {
            let is_cursor = cursor == Some(index);
            let mut spec = ColorSpec::new();
            if tree.node(id).is_dir {
                spec.set_fg(Some(Color::Blue)).set_intense(true);
            }
            if is_cursor {
                spec.set_bold(true).set_underline(true);
            }
            out.set_color(&spec)?;
            write!(out, "{}", format_line(tree, id, is_cursor))?;
            out.reset()?;
            writeln!(out)?;
        }
        Ok(())
    }
}
