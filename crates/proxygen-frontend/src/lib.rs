//! proxygen frontend: lexer, parser, and syntax tree for Go declarations.

pub mod ast;
pub mod ast_display;
pub mod errors;
pub mod lexer;
mod parse_decl;
mod parse_type;
pub mod parser;
pub mod span;
pub mod token;

pub use ast::*;
pub use errors::{LexerError, ParserError};
pub use lexer::Lexer;
pub use parser::{ParseError, Parser};
pub use token::{Span, Token, TokenType};
