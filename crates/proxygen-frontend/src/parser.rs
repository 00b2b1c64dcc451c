// parser.rs
//
// Recursive-descent parser for Go source files. Only the package clause,
// imports and type declarations are turned into syntax; functions, variables
// and constants are skipped by delimiter balancing.

use crate::ast::{Ident, SourceFile};
use crate::errors::{LexerError, ParserError};
use crate::{Lexer, Span, Token, TokenType};

pub struct Parser<'src> {
    pub(crate) lexer: Lexer<'src>,
    pub(crate) current: Token<'src>,
    pub(crate) previous: Token<'src>,
}

/// A parse error wrapping a miette-enabled ParserError
#[derive(Debug, Clone)]
pub struct ParseError {
    pub error: ParserError,
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(error: ParserError, span: Span) -> Self {
        Self { error, span }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.error, self.span.line, self.span.column)
    }
}

impl std::error::Error for ParseError {}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: Token::new(TokenType::Eof, "", Span::default()),
        }
    }

    /// The source text being parsed.
    pub fn source(&self) -> &'src str {
        self.lexer.source()
    }

    /// Take lexer errors (for diagnostic rendering)
    pub fn take_lexer_errors(&mut self) -> Vec<LexerError> {
        self.lexer.take_errors()
    }

    /// Parse a complete source file.
    pub fn parse_file(&mut self) -> Result<SourceFile, ParseError> {
        let result = self.parse_file_inner();
        // A lexical error usually causes a confusing parse error downstream;
        // report the root cause instead.
        if self.lexer.has_errors() {
            let errors = self.lexer.take_errors();
            let span = errors
                .first()
                .map(lexer_error_span)
                .unwrap_or(self.current.span);
            return Err(ParseError::new(
                ParserError::Lexical {
                    errors,
                    span: span.into(),
                },
                span,
            ));
        }
        result
    }

    fn parse_file_inner(&mut self) -> Result<SourceFile, ParseError> {
        let build_constraint = build_constraint(self.source());

        if !self.check(TokenType::KwPackage) {
            return Err(ParseError::new(
                ParserError::MissingPackageClause {
                    span: self.current.span.into(),
                },
                self.current.span,
            ));
        }
        self.advance();
        let package = self.expect_ident()?;
        self.expect_semicolon()?;

        let mut file = SourceFile {
            package,
            imports: Vec::new(),
            types: Vec::new(),
            build_constraint,
        };

        while !self.check(TokenType::Eof) {
            match self.current.ty {
                TokenType::KwImport => self.import_decl(&mut file.imports)?,
                TokenType::KwType => self.type_decl(&mut file.types)?,
                TokenType::KwFunc | TokenType::KwVar | TokenType::KwConst => {
                    self.skip_declaration()?
                }
                TokenType::Semicolon => self.advance(),
                _ => return Err(self.unexpected_token_error()),
            }
        }

        Ok(file)
    }

    /// Skip a declaration up to the semicolon that terminates it at depth zero.
    pub(crate) fn skip_declaration(&mut self) -> Result<(), ParseError> {
        let mut open: Vec<Token<'src>> = Vec::new();
        loop {
            match self.current.ty {
                TokenType::Eof => {
                    return match open.last() {
                        Some(opener) => Err(ParseError::new(
                            ParserError::UnclosedDelimiter {
                                open: opener.ty.as_str().to_string(),
                                span: opener.span.into(),
                            },
                            opener.span,
                        )),
                        None => Ok(()),
                    };
                }
                TokenType::Semicolon if open.is_empty() => {
                    self.advance();
                    return Ok(());
                }
                ty if ty.is_opening_delimiter() => open.push(self.current.clone()),
                ty => {
                    if let Some(expected) = ty.opening_delimiter() {
                        match open.pop() {
                            Some(opener) if opener.ty == expected => {}
                            _ => return Err(self.unexpected_token_error()),
                        }
                    }
                }
            }
            self.advance();
        }
    }

    /// Advance to the next token
    pub(crate) fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.lexer.next_token());
    }

    /// Check if the current token matches the given type
    pub(crate) fn check(&self, ty: TokenType) -> bool {
        self.current.ty == ty
    }

    /// Consume the current token if it matches, otherwise return false
    pub(crate) fn match_token(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require a token of the given type, or return an error
    pub(crate) fn consume(&mut self, ty: TokenType) -> Result<Token<'src>, ParseError> {
        if self.check(ty) {
            self.advance();
            Ok(self.previous.clone())
        } else {
            Err(ParseError::new(
                ParserError::ExpectedToken {
                    expected: ty.as_str().to_string(),
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            ))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        if self.check(TokenType::Identifier) {
            let ident = Ident::new(self.current.lexeme.to_string(), self.current.span);
            self.advance();
            Ok(ident)
        } else {
            Err(ParseError::new(
                ParserError::ExpectedIdentifier {
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            ))
        }
    }

    /// Statements end with a semicolon, which may be omitted before a
    /// closing `)` or `}`.
    pub(crate) fn expect_semicolon(&mut self) -> Result<(), ParseError> {
        if self.match_token(TokenType::Semicolon)
            || self.check(TokenType::RParen)
            || self.check(TokenType::RBrace)
            || self.check(TokenType::Eof)
        {
            Ok(())
        } else {
            Err(ParseError::new(
                ParserError::ExpectedToken {
                    expected: ";".to_string(),
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            ))
        }
    }

    /// Token type `n` tokens past the current one (`n >= 1`).
    pub(crate) fn peek_nth(&self, n: usize) -> TokenType {
        let mut lexer = self.lexer.clone();
        let mut ty = self.current.ty;
        for _ in 0..n {
            ty = lexer.next_token().ty;
        }
        ty
    }

    /// With `[` at the lookahead position `offset` (0 = current token),
    /// return the type of the token following its matching `]`.
    pub(crate) fn peek_after_brackets(&self, offset: usize) -> TokenType {
        let mut lexer = self.lexer.clone();
        for _ in 0..offset {
            lexer.next_token();
        }
        let mut depth = 1usize;
        loop {
            match lexer.next_token().ty {
                TokenType::LBracket => depth += 1,
                TokenType::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        return lexer.next_token().ty;
                    }
                }
                TokenType::Eof => return TokenType::Eof,
                _ => {}
            }
        }
    }

    /// Create an unexpected token error at the current position
    pub(crate) fn unexpected_token_error(&self) -> ParseError {
        ParseError::new(
            ParserError::UnexpectedToken {
                token: self.current.lexeme.to_string(),
                span: self.current.span.into(),
            },
            self.current.span,
        )
    }
}

fn lexer_error_span(error: &LexerError) -> Span {
    let source_span = match error {
        LexerError::UnexpectedCharacter { span, .. }
        | LexerError::UnterminatedString { span }
        | LexerError::UnterminatedRawString { span }
        | LexerError::UnterminatedRune { span }
        | LexerError::InvalidNumber { span }
        | LexerError::UnterminatedComment { span } => *span,
    };
    let start = source_span.offset();
    Span::new(start, start + source_span.len(), 0, 0)
}

/// Extract a `//go:build` line appearing before the package clause.
fn build_constraint(source: &str) -> Option<String> {
    for line in source.lines() {
        let line = line.trim();
        if let Some(expr) = line.strip_prefix("//go:build") {
            return Some(expr.trim().to_string());
        }
        if line.starts_with("package") {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests;
