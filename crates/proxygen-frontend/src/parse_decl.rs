// parse_decl.rs
//
// Import and type declarations.

use smallvec::SmallVec;

use crate::TokenType;
use crate::ast::{Ident, ImportName, ImportSpec, TypeParam, TypeSpec};
use crate::errors::ParserError;
use crate::parser::{ParseError, Parser};

impl<'src> Parser<'src> {
    /// `import "p"`, `import ( ... )`
    pub(crate) fn import_decl(&mut self, imports: &mut Vec<ImportSpec>) -> Result<(), ParseError> {
        self.consume(TokenType::KwImport)?;
        if self.match_token(TokenType::LParen) {
            while !self.check(TokenType::RParen) {
                if self.match_token(TokenType::Semicolon) {
                    continue;
                }
                imports.push(self.import_spec()?);
                self.expect_semicolon()?;
            }
            self.consume(TokenType::RParen)?;
        } else {
            imports.push(self.import_spec()?);
        }
        self.expect_semicolon()
    }

    fn import_spec(&mut self) -> Result<ImportSpec, ParseError> {
        let start = self.current.span;
        let name = match self.current.ty {
            TokenType::Dot => {
                self.advance();
                ImportName::Dot
            }
            TokenType::Identifier if self.current.lexeme == "_" => {
                self.advance();
                ImportName::Blank
            }
            TokenType::Identifier => ImportName::Alias(self.expect_ident()?),
            _ => ImportName::Default,
        };

        let path = match self.current.ty {
            TokenType::StringLiteral | TokenType::RawStringLiteral => {
                let lexeme = self.current.lexeme.to_string();
                self.advance();
                unquote(&lexeme)
            }
            _ => {
                return Err(ParseError::new(
                    ParserError::ExpectedToken {
                        expected: "import path".to_string(),
                        found: self.current.ty.as_str().to_string(),
                        span: self.current.span.into(),
                    },
                    self.current.span,
                ));
            }
        };

        Ok(ImportSpec {
            name,
            path,
            span: start.merge(self.previous.span),
        })
    }

    /// `type T ...`, `type ( ... )`
    pub(crate) fn type_decl(&mut self, types: &mut Vec<TypeSpec>) -> Result<(), ParseError> {
        self.consume(TokenType::KwType)?;
        if self.match_token(TokenType::LParen) {
            while !self.check(TokenType::RParen) {
                if self.match_token(TokenType::Semicolon) {
                    continue;
                }
                types.push(self.type_spec()?);
                self.expect_semicolon()?;
            }
            self.consume(TokenType::RParen)?;
        } else {
            types.push(self.type_spec()?);
        }
        self.expect_semicolon()
    }

    fn type_spec(&mut self) -> Result<TypeSpec, ParseError> {
        let name = self.expect_ident()?;
        let type_params = if self.check(TokenType::LBracket) && self.starts_type_params() {
            self.type_params()?
        } else {
            Vec::new()
        };
        let alias = self.match_token(TokenType::Eq);
        let ty = self.parse_type()?;
        let span = name.span.merge(ty.span);
        Ok(TypeSpec {
            name,
            type_params,
            ty,
            alias,
            span,
        })
    }

    /// With `[` current: distinguish `type T[P any] ...` from `type T [N]E`.
    ///
    /// `[P *C]` is a parameter list only when `*` is followed by a type name
    /// that ends the constraint; `[N * 2]` and `[N * (M + 1)]` are lengths.
    fn starts_type_params(&self) -> bool {
        if self.peek_nth(1) != TokenType::Identifier {
            return false;
        }
        match self.peek_nth(2) {
            TokenType::Star => {
                self.peek_nth(3) == TokenType::Identifier
                    && matches!(
                        self.peek_nth(4),
                        TokenType::Comma | TokenType::RBracket | TokenType::Dot | TokenType::LBracket
                    )
            }
            next => matches!(
                next,
                TokenType::Identifier
                    | TokenType::Comma
                    | TokenType::Tilde
                    | TokenType::LBracket
                    | TokenType::KwInterface
                    | TokenType::KwMap
                    | TokenType::KwChan
                    | TokenType::KwFunc
                    | TokenType::KwStruct
            ),
        }
    }

    /// `[K comparable, V any]`, `[A, B any]`
    fn type_params(&mut self) -> Result<Vec<TypeParam>, ParseError> {
        self.consume(TokenType::LBracket)?;
        let mut params = Vec::new();
        let mut pending: SmallVec<[Ident; 2]> = SmallVec::new();
        while !self.check(TokenType::RBracket) {
            pending.push(self.expect_ident()?);
            if self.match_token(TokenType::Comma) {
                continue;
            }
            let constraint = self.parse_constraint()?;
            params.push(TypeParam {
                names: std::mem::take(&mut pending),
                constraint,
            });
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        if let Some(dangling) = pending.first() {
            return Err(ParseError::new(
                ParserError::ExpectedType {
                    found: "]".to_string(),
                    span: dangling.span.into(),
                },
                dangling.span,
            ));
        }
        self.consume(TokenType::RBracket)?;
        Ok(params)
    }
}

/// Strip the quotes of a string literal used as an import path.
fn unquote(lexeme: &str) -> String {
    let inner = lexeme
        .strip_prefix(['"', '`'])
        .and_then(|s| s.strip_suffix(['"', '`']))
        .unwrap_or(lexeme);
    inner.replace("\\\\", "\\").replace("\\\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::unquote;

    #[test]
    fn unquote_import_paths() {
        assert_eq!(unquote("\"fmt\""), "fmt");
        assert_eq!(unquote("`net/http`"), "net/http");
        assert_eq!(unquote("bare"), "bare");
    }
}
