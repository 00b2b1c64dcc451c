//! Formatting of generated Go source: a built-in canonicalizer and a
//! `gofmt` backend behind one trait.

pub mod config;
pub mod errors;
pub mod formatter;

pub use config::{CANONICAL, FormatConfig};
pub use errors::FormatError;
pub use formatter::{Canonical, FormatResult, FormatterChoice, Gofmt, SourceFormatter};
