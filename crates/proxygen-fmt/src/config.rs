//! Configuration for the built-in Go formatter.
//!
//! The canonical style mirrors `gofmt` as far as re-indentation goes: tabs,
//! at most one blank line in a row.

/// Formatting configuration. All values are fixed for canonical style.
#[derive(Debug, Clone, Copy)]
pub struct FormatConfig {
    /// Indent with tabs rather than spaces
    pub use_tabs: bool,
    /// Spaces per level when not using tabs
    pub indent_width: u8,
    /// Longest run of blank lines kept
    pub max_blank_lines: u8,
}

impl Default for FormatConfig {
    fn default() -> Self {
        CANONICAL
    }
}

/// The canonical formatting style.
pub const CANONICAL: FormatConfig = FormatConfig {
    use_tabs: true,
    indent_width: 4,
    max_blank_lines: 1,
};

impl FormatConfig {
    /// Get the indentation string for a given level.
    pub fn indent(&self, level: usize) -> String {
        if self.use_tabs {
            "\t".repeat(level)
        } else {
            " ".repeat(self.indent_width as usize * level)
        }
    }
}
