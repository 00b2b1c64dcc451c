// src/errors/mod.rs
//! Driver errors and diagnostic rendering.
//!
//! Library errors only carry spans; the source text is attached here, right
//! before rendering.

#![allow(unused_assignments)] // False positives from thiserror derive

pub mod report;

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

pub use proxygen_codegen::EmitError;
pub use proxygen_fmt::FormatError;
pub use proxygen_frontend::{LexerError, ParserError};
pub use proxygen_sema::{LoadError, ResolveError};

pub use report::{render_error, render_to_stderr, render_to_string, render_to_writer};

#[derive(Error, Debug, Diagnostic)]
pub enum ProxygenError {
    #[error("'{path}' is not an interface path")]
    #[diagnostic(
        code(E5001),
        help("expected <module path>.<Interface>, e.g. example.com/app/store.Store")
    )]
    InterfacePath { path: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Emit(#[from] EmitError),

    #[error("could not write {}: {message}", .path.display())]
    #[diagnostic(code(E5002))]
    FileIo { path: PathBuf, message: String },
}

impl ProxygenError {
    /// Go file the diagnostic's labels point into, if any.
    pub fn source_file(&self) -> Option<&Path> {
        match self {
            ProxygenError::Resolve(err) => err.source_file(),
            _ => None,
        }
    }

    /// Generated text the diagnostic's labels point into, if any.
    pub fn generated_source(&self) -> Option<&str> {
        match self {
            ProxygenError::Emit(EmitError::Formatting { generated, .. }) => Some(generated),
            _ => None,
        }
    }
}

/// Split `<module path>.<Interface>` at the last dot.
pub fn split_interface_path(path: &str) -> Result<(&str, &str), ProxygenError> {
    match path.rsplit_once('.') {
        Some((module, name)) if !module.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((module, name))
        }
        _ => Err(ProxygenError::InterfacePath {
            path: path.to_string(),
        }),
    }
}
