//! Module loading (E2xxx) and interface resolution (E3xxx) errors.
//!
//! Errors carry spans only; the offending file is recorded so the caller can
//! attach its source when rendering.

#![allow(unused_assignments)] // False positives from thiserror derive

use std::path::{Path, PathBuf};

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum LoadError {
    #[error("module not found: {path}")]
    #[diagnostic(
        code(E2001),
        help("searched: {searched}")
    )]
    ModuleNotFound { path: String, searched: String },

    #[error("failed to read {}: {message}", .file.display())]
    #[diagnostic(code(E2002))]
    Read { file: PathBuf, message: String },

    #[error("module {path} mixes packages `{first}` and `{second}`")]
    #[diagnostic(
        code(E2003),
        help("every non-test file of a module must declare the same package")
    )]
    MixedPackages {
        path: String,
        first: String,
        second: String,
        file: PathBuf,
        #[label("declares package `{second}`")]
        span: SourceSpan,
    },

    #[error("failed to parse {}: {message}", .file.display())]
    #[diagnostic(code(E2004))]
    ModuleParse {
        file: PathBuf,
        message: String,
        #[label("{message}")]
        span: SourceSpan,
    },
}

impl LoadError {
    /// The Go source file the error points into, if any.
    pub fn source_file(&self) -> Option<&Path> {
        match self {
            LoadError::MixedPackages { file, .. } | LoadError::ModuleParse { file, .. } => {
                Some(file)
            }
            LoadError::ModuleNotFound { .. } | LoadError::Read { .. } => None,
        }
    }
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ResolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error("interface {name} not found in module {module}")]
    #[diagnostic(
        code(E3001),
        help("the name must refer to an exported interface type declared in the module")
    )]
    InterfaceNotFound { module: String, name: String },

    #[error("cannot qualify `{ty}`: {reason}")]
    #[diagnostic(code(E3002))]
    TypeQualification {
        ty: String,
        reason: String,
        file: PathBuf,
        #[label("{reason}")]
        span: SourceSpan,
    },

    #[error("cyclic interface embedding: {chain}")]
    #[diagnostic(code(E3003))]
    CyclicEmbedding { chain: String },

    #[error("generic interface {name} cannot be proxied")]
    #[diagnostic(
        code(E3004),
        help("only interfaces without type parameters can be proxied")
    )]
    GenericInterface {
        name: String,
        file: PathBuf,
        #[label("declared with type parameters")]
        span: SourceSpan,
    },
}

impl ResolveError {
    /// The Go source file the error points into, if any.
    pub fn source_file(&self) -> Option<&Path> {
        match self {
            ResolveError::Load(err) => err.source_file(),
            ResolveError::TypeQualification { file, .. }
            | ResolveError::GenericInterface { file, .. } => Some(file),
            ResolveError::InterfaceNotFound { .. } | ResolveError::CyclicEmbedding { .. } => None,
        }
    }

    pub fn is_cyclic(&self) -> bool {
        matches!(self, ResolveError::CyclicEmbedding { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_keep_their_code_through_resolution() {
        let err: ResolveError = LoadError::ModuleNotFound {
            path: "example.com/missing".to_string(),
            searched: "/tmp/x".to_string(),
        }
        .into();
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("E2001"));
        assert_eq!(err.to_string(), "module not found: example.com/missing");
        assert!(err.source_file().is_none());
    }

    #[test]
    fn qualification_errors_point_at_a_file() {
        let err = ResolveError::TypeQualification {
            ty: "secret".to_string(),
            reason: "type is not exported".to_string(),
            file: PathBuf::from("a/a.go"),
            span: (0, 6).into(),
        };
        assert_eq!(err.source_file(), Some(Path::new("a/a.go")));
        assert!(!err.is_cyclic());
    }
}
