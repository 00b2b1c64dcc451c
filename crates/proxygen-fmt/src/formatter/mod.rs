//! Main entry point for formatting generated Go source.
//!
//! `SourceFormatter` is the seam the code emitter depends on; `Canonical`
//! works without a Go toolchain, `Gofmt` defers to the real thing.

mod canonical;
mod gofmt;

pub use canonical::Canonical;
pub use gofmt::Gofmt;

use crate::errors::FormatError;

/// Result of formatting source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    /// The formatted output
    pub output: String,
    /// Whether the output differs from the input
    pub changed: bool,
}

impl FormatResult {
    pub fn new(source: &str, output: String) -> Self {
        let changed = output != source;
        Self { output, changed }
    }
}

/// Canonicalizes source text or reports why it is not valid Go.
pub trait SourceFormatter {
    fn format(&self, source: &str) -> Result<FormatResult, FormatError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Which formatter to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatterChoice {
    /// `gofmt` when it is on `PATH`, the built-in formatter otherwise
    #[default]
    Auto,
    Builtin,
    Gofmt,
}

impl FormatterChoice {
    pub fn build(self) -> Box<dyn SourceFormatter> {
        match self {
            FormatterChoice::Builtin => Box::new(Canonical::default()),
            FormatterChoice::Gofmt => Box::new(Gofmt::default()),
            FormatterChoice::Auto => match Gofmt::find() {
                Some(gofmt) => Box::new(gofmt),
                None => Box::new(Canonical::default()),
            },
        }
    }
}

#[cfg(test)]
mod tests;
