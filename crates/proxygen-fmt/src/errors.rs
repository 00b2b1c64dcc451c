//! Formatting errors (E4xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum FormatError {
    #[error("generated source is not valid Go: {message}")]
    #[diagnostic(
        code(E4001),
        help("this is a bug in the generator, not in the input")
    )]
    Syntax {
        message: String,
        #[label("{message}")]
        span: SourceSpan,
    },

    #[error("{program} rejected the generated source")]
    #[diagnostic(code(E4002), help("{stderr}"))]
    External { program: String, stderr: String },

    #[error("failed to run {program}: {message}")]
    #[diagnostic(code(E4003))]
    Spawn { program: String, message: String },
}
