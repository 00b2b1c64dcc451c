//! Parser errors (E1xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("expected '{expected}', found '{found}'")]
    #[diagnostic(code(E1002))]
    ExpectedToken {
        expected: String,
        found: String,
        #[label("unexpected token")]
        span: SourceSpan,
    },

    #[error("unexpected token '{token}'")]
    #[diagnostic(code(E1003))]
    UnexpectedToken {
        token: String,
        #[label("unexpected")]
        span: SourceSpan,
    },

    #[error("expected type, found '{found}'")]
    #[diagnostic(code(E1004))]
    ExpectedType {
        found: String,
        #[label("expected type")]
        span: SourceSpan,
    },

    #[error("expected identifier, found '{found}'")]
    #[diagnostic(code(E1006))]
    ExpectedIdentifier {
        found: String,
        #[label("expected identifier")]
        span: SourceSpan,
    },

    #[error("missing package clause")]
    #[diagnostic(
        code(E1010),
        help("every Go source file starts with `package <name>`")
    )]
    MissingPackageClause {
        #[label("expected `package` here")]
        span: SourceSpan,
    },

    #[error("mixed named and unnamed parameters")]
    #[diagnostic(
        code(E1011),
        help("either name every parameter or none of them")
    )]
    MixedParameters {
        #[label("in this parameter list")]
        span: SourceSpan,
    },

    #[error("can only use '...' with the final parameter")]
    #[diagnostic(code(E1012))]
    MisplacedEllipsis {
        #[label("variadic parameter must come last")]
        span: SourceSpan,
    },

    #[error("unbalanced '{open}'")]
    #[diagnostic(code(E1013), help("the declaration is never closed"))]
    UnclosedDelimiter {
        open: String,
        #[label("opened here")]
        span: SourceSpan,
    },

    #[error("lexical error in source")]
    #[diagnostic(code(E1014))]
    Lexical {
        #[related]
        errors: Vec<super::LexerError>,
        #[label("first error here")]
        span: SourceSpan,
    },
}
