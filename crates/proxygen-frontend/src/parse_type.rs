// parse_type.rs
//
// Type expressions, signatures, interface and struct bodies.

use smallvec::SmallVec;

use crate::TokenType;
use crate::ast::{
    ChanDir, Field, Ident, InterfaceElem, InterfaceType, Signature, StructField, TypeExpr,
    TypeExprKind,
};
use crate::errors::ParserError;
use crate::parser::{ParseError, Parser};

/// A parameter list entry before Go's grouping rules are applied.
enum ParamEntry {
    /// A lone identifier: either a parameter name or a type name.
    Bare(Ident),
    /// A type that cannot be a name.
    Typed(TypeExpr),
    /// `name Type`
    Named(Ident, TypeExpr),
}

impl<'src> Parser<'src> {
    /// Parse a type expression
    pub(crate) fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current.span;
        match self.current.ty {
            TokenType::Identifier => self.type_name(),
            TokenType::Star => {
                self.advance();
                let elem = self.parse_type()?;
                let span = start.merge(elem.span);
                Ok(TypeExpr::new(TypeExprKind::Pointer(Box::new(elem)), span))
            }
            TokenType::LBracket => self.slice_or_array(),
            TokenType::KwMap => {
                self.advance();
                self.consume(TokenType::LBracket)?;
                let key = self.parse_type()?;
                self.consume(TokenType::RBracket)?;
                let value = self.parse_type()?;
                let span = start.merge(value.span);
                Ok(TypeExpr::new(
                    TypeExprKind::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    },
                    span,
                ))
            }
            TokenType::KwChan => {
                self.advance();
                let dir = if self.match_token(TokenType::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let elem = self.parse_type()?;
                let span = start.merge(elem.span);
                Ok(TypeExpr::new(
                    TypeExprKind::Chan {
                        dir,
                        elem: Box::new(elem),
                    },
                    span,
                ))
            }
            TokenType::Arrow => {
                self.advance();
                self.consume(TokenType::KwChan)?;
                let elem = self.parse_type()?;
                let span = start.merge(elem.span);
                Ok(TypeExpr::new(
                    TypeExprKind::Chan {
                        dir: ChanDir::Recv,
                        elem: Box::new(elem),
                    },
                    span,
                ))
            }
            TokenType::KwFunc => {
                self.advance();
                let sig = self.signature()?;
                let span = start.merge(self.previous.span);
                Ok(TypeExpr::new(TypeExprKind::Func(sig), span))
            }
            TokenType::KwInterface => self.interface_type(),
            TokenType::KwStruct => self.struct_type(),
            TokenType::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.consume(TokenType::RParen)?;
                let span = start.merge(self.previous.span);
                Ok(TypeExpr::new(TypeExprKind::Paren(Box::new(inner)), span))
            }
            _ => Err(ParseError::new(
                ParserError::ExpectedType {
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            )),
        }
    }

    /// `Name`, `pkg.Name`, with optional type arguments
    fn type_name(&mut self) -> Result<TypeExpr, ParseError> {
        let first = self.expect_ident()?;
        let (package, name) = if self.match_token(TokenType::Dot) {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };

        let mut type_args = Vec::new();
        if self.check(TokenType::LBracket)
            && !matches!(
                self.peek_nth(1),
                TokenType::RBracket | TokenType::IntLiteral | TokenType::Ellipsis
            )
        {
            self.advance();
            while !self.check(TokenType::RBracket) {
                type_args.push(self.parse_type()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
            self.consume(TokenType::RBracket)?;
        }

        let start = package.as_ref().map_or(name.span, |p| p.span);
        let span = start.merge(self.previous.span);
        Ok(TypeExpr::new(
            TypeExprKind::Named {
                package,
                name,
                type_args,
            },
            span,
        ))
    }

    /// `[]T` or `[N]T`
    fn slice_or_array(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current.span;
        self.consume(TokenType::LBracket)?;
        if self.match_token(TokenType::RBracket) {
            let elem = self.parse_type()?;
            let span = start.merge(elem.span);
            return Ok(TypeExpr::new(TypeExprKind::Slice(Box::new(elem)), span));
        }

        let len_start = self.current.span.start;
        let mut depth = 0usize;
        while depth > 0 || !self.check(TokenType::RBracket) {
            match self.current.ty {
                TokenType::Eof => {
                    return Err(ParseError::new(
                        ParserError::UnclosedDelimiter {
                            open: "[".to_string(),
                            span: start.into(),
                        },
                        start,
                    ));
                }
                TokenType::LBracket | TokenType::LParen => depth += 1,
                TokenType::RBracket | TokenType::RParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
        let len = self.source()[len_start..self.current.span.start]
            .trim()
            .to_string();
        self.consume(TokenType::RBracket)?;
        let elem = self.parse_type()?;
        let span = start.merge(elem.span);
        Ok(TypeExpr::new(
            TypeExprKind::Array {
                len,
                elem: Box::new(elem),
            },
            span,
        ))
    }

    /// Parameters and optional results, after `func` or a method name.
    pub(crate) fn signature(&mut self) -> Result<Signature, ParseError> {
        let params = self.parameters()?;
        let results = if self.check(TokenType::LParen) {
            self.parameters()?
        } else if self.starts_type() {
            let ty = self.parse_type()?;
            vec![Field {
                names: SmallVec::new(),
                ty,
            }]
        } else {
            Vec::new()
        };
        Ok(Signature { params, results })
    }

    fn starts_type(&self) -> bool {
        matches!(
            self.current.ty,
            TokenType::Identifier
                | TokenType::Star
                | TokenType::LBracket
                | TokenType::KwMap
                | TokenType::KwChan
                | TokenType::Arrow
                | TokenType::KwFunc
                | TokenType::KwInterface
                | TokenType::KwStruct
        )
    }

    /// `(a, b int, c ...string)` or `(int, error)`
    fn parameters(&mut self) -> Result<Vec<Field>, ParseError> {
        let open = self.consume(TokenType::LParen)?;
        let mut entries = Vec::new();
        while !self.check(TokenType::RParen) {
            entries.push(self.param_entry()?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        self.consume(TokenType::RParen)?;
        let span = open.span.merge(self.previous.span);

        let fields = group_parameters(entries).ok_or_else(|| {
            ParseError::new(ParserError::MixedParameters { span: span.into() }, span)
        })?;

        let last = fields.len().saturating_sub(1);
        for (idx, field) in fields.iter().enumerate() {
            let variadic = matches!(field.ty.kind, TypeExprKind::Variadic(_));
            if variadic && (idx != last || field.names.len() > 1) {
                return Err(ParseError::new(
                    ParserError::MisplacedEllipsis {
                        span: field.ty.span.into(),
                    },
                    field.ty.span,
                ));
            }
        }
        Ok(fields)
    }

    fn param_entry(&mut self) -> Result<ParamEntry, ParseError> {
        if !self.check(TokenType::Identifier) {
            return Ok(ParamEntry::Typed(self.param_type()?));
        }

        match self.peek_nth(1) {
            TokenType::Dot => Ok(ParamEntry::Typed(self.parse_type()?)),
            TokenType::Comma | TokenType::RParen => Ok(ParamEntry::Bare(self.expect_ident()?)),
            TokenType::LBracket => {
                // `buf []byte` / `buf [4]byte` name a parameter; `List[int]` is a type.
                let names_param = self.peek_nth(2) == TokenType::RBracket
                    || !matches!(
                        self.peek_after_brackets(1),
                        TokenType::Comma | TokenType::RParen
                    );
                if names_param {
                    let name = self.expect_ident()?;
                    let ty = self.param_type()?;
                    Ok(ParamEntry::Named(name, ty))
                } else {
                    Ok(ParamEntry::Typed(self.parse_type()?))
                }
            }
            _ => {
                let name = self.expect_ident()?;
                let ty = self.param_type()?;
                Ok(ParamEntry::Named(name, ty))
            }
        }
    }

    /// A parameter type, which may be variadic.
    fn param_type(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current.span;
        if self.match_token(TokenType::Ellipsis) {
            let elem = self.parse_type()?;
            let span = start.merge(elem.span);
            return Ok(TypeExpr::new(TypeExprKind::Variadic(Box::new(elem)), span));
        }
        self.parse_type()
    }

    /// A constraint or embedded element: `~int | string`, `io.Reader`.
    pub(crate) fn parse_constraint(&mut self) -> Result<TypeExpr, ParseError> {
        let first = self.constraint_term()?;
        if !self.check(TokenType::Pipe) {
            return Ok(first);
        }
        let start = first.span;
        let mut terms = vec![first];
        while self.match_token(TokenType::Pipe) {
            terms.push(self.constraint_term()?);
        }
        let span = start.merge(self.previous.span);
        Ok(TypeExpr::new(TypeExprKind::Union(terms), span))
    }

    fn constraint_term(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current.span;
        if self.match_token(TokenType::Tilde) {
            let ty = self.parse_type()?;
            let span = start.merge(ty.span);
            return Ok(TypeExpr::new(TypeExprKind::Tilde(Box::new(ty)), span));
        }
        self.parse_type()
    }

    /// `interface { ... }`
    fn interface_type(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current.span;
        self.consume(TokenType::KwInterface)?;
        self.consume(TokenType::LBrace)?;
        let mut elems = Vec::new();
        while !self.check(TokenType::RBrace) {
            if self.match_token(TokenType::Semicolon) {
                continue;
            }
            if self.check(TokenType::Identifier) && self.peek_nth(1) == TokenType::LParen {
                let name = self.expect_ident()?;
                let sig = self.signature()?;
                elems.push(InterfaceElem::Method { name, sig });
            } else {
                elems.push(InterfaceElem::Embed(self.parse_constraint()?));
            }
            self.expect_semicolon()?;
        }
        self.consume(TokenType::RBrace)?;
        let span = start.merge(self.previous.span);
        Ok(TypeExpr::new(
            TypeExprKind::Interface(InterfaceType { elems }),
            span,
        ))
    }

    /// `struct { ... }`
    fn struct_type(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current.span;
        self.consume(TokenType::KwStruct)?;
        self.consume(TokenType::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(TokenType::RBrace) {
            if self.match_token(TokenType::Semicolon) {
                continue;
            }
            fields.push(self.struct_field()?);
            self.expect_semicolon()?;
        }
        self.consume(TokenType::RBrace)?;
        let span = start.merge(self.previous.span);
        Ok(TypeExpr::new(TypeExprKind::Struct(fields), span))
    }

    fn struct_field(&mut self) -> Result<StructField, ParseError> {
        let embedded = match self.current.ty {
            TokenType::Star => true,
            TokenType::Identifier => match self.peek_nth(1) {
                TokenType::Dot
                | TokenType::Semicolon
                | TokenType::RBrace
                | TokenType::StringLiteral
                | TokenType::RawStringLiteral => true,
                TokenType::LBracket => matches!(
                    self.peek_after_brackets(1),
                    TokenType::Semicolon
                        | TokenType::RBrace
                        | TokenType::StringLiteral
                        | TokenType::RawStringLiteral
                ),
                _ => false,
            },
            _ => false,
        };

        let mut names = SmallVec::new();
        let ty = if embedded {
            self.parse_type()?
        } else {
            names.push(self.expect_ident()?);
            while self.match_token(TokenType::Comma) {
                names.push(self.expect_ident()?);
            }
            self.parse_type()?
        };

        let tag = match self.current.ty {
            TokenType::StringLiteral | TokenType::RawStringLiteral => {
                let tag = self.current.lexeme.to_string();
                self.advance();
                Some(tag)
            }
            _ => None,
        };

        Ok(StructField { names, ty, tag })
    }
}

/// Apply Go's parameter grouping. Returns `None` when named and unnamed
/// parameters are mixed.
fn group_parameters(entries: Vec<ParamEntry>) -> Option<Vec<Field>> {
    let any_named = entries
        .iter()
        .any(|entry| matches!(entry, ParamEntry::Named(..)));

    if !any_named {
        let fields = entries
            .into_iter()
            .map(|entry| {
                let ty = match entry {
                    ParamEntry::Bare(ident) => {
                        let span = ident.span;
                        TypeExpr::new(
                            TypeExprKind::Named {
                                package: None,
                                name: ident,
                                type_args: Vec::new(),
                            },
                            span,
                        )
                    }
                    ParamEntry::Typed(ty) => ty,
                    ParamEntry::Named(..) => unreachable!("checked above"),
                };
                Field {
                    names: SmallVec::new(),
                    ty,
                }
            })
            .collect();
        return Some(fields);
    }

    let mut fields = Vec::new();
    let mut pending: SmallVec<[Ident; 2]> = SmallVec::new();
    for entry in entries {
        match entry {
            ParamEntry::Bare(ident) => pending.push(ident),
            ParamEntry::Named(name, ty) => {
                pending.push(name);
                fields.push(Field {
                    names: std::mem::take(&mut pending),
                    ty,
                });
            }
            ParamEntry::Typed(_) => return None,
        }
    }
    if !pending.is_empty() {
        return None;
    }
    Some(fields)
}
