//! Emission errors (E41xx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::Diagnostic;
use proxygen_fmt::FormatError;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum EmitError {
    #[error("the {formatter} formatter rejected the generated proxy: {source}")]
    #[diagnostic(
        code(E4101),
        help("this is a bug in the generator; run with PROXYGEN_LOG=debug to see the unformatted output")
    )]
    Formatting {
        formatter: String,
        #[diagnostic_source]
        source: FormatError,
        /// Unformatted text that was rejected
        generated: String,
    },

    #[error("failed to render the proxy document")]
    #[diagnostic(code(E4102))]
    Render(#[from] std::fmt::Error),

    #[error("'{name}' is not a valid Go identifier for the {role}")]
    #[diagnostic(code(E4103))]
    InvalidIdentifier { name: String, role: &'static str },

    #[error("method {method} clashes with a field of the generated proxy")]
    #[diagnostic(
        code(E4104),
        help("the proxy struct declares the fields {fields}; a method of the same name cannot be generated")
    )]
    FieldClash { method: String, fields: String },

    #[error("proxy type {name} would redeclare the interface in its own package")]
    #[diagnostic(code(E4105), help("pick a different --name"))]
    TypeNameClash { name: String },

    #[error("import name '{name}' is used by more than one import of the generated proxy")]
    #[diagnostic(code(E4106))]
    ImportNameClash { name: String },
}
