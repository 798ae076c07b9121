//! Configuration types for tree building

/// Configuration for tree building behavior.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    /// Show everything, including ignored paths and `.git`.
    pub show_all: bool,
    /// Extra ignore patterns, applied after the repository's own rules.
    pub exclude_patterns: Vec<String>,
}

impl BuildConfig {
    /// Whether ignore rules are enforced.
    pub fn respects_ignore(&self) -> bool {
        !self.show_all
    }

    /// The same configuration with show-all mode flipped.
    pub fn toggled(&self) -> Self {
        Self {
            show_all: !self.show_all,
            exclude_patterns: self.exclude_patterns.clone(),
        }
    }
}
