// lexer.rs
//
// Go lexer with automatic semicolon insertion.

use crate::errors::LexerError;
use crate::{Span, Token, TokenType};

#[derive(Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    start: usize,
    current: usize,
    line: u32,
    column: u32,
    start_column: u32,
    start_line: u32,
    // Type of the last emitted token, drives semicolon insertion
    last: Option<TokenType>,
    // Error collection
    errors: Vec<LexerError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_column: 1,
            start_line: 1,
            last: None,
            errors: Vec::new(),
        }
    }

    /// Take all collected errors, leaving the internal list empty.
    pub fn take_errors(&mut self) -> Vec<LexerError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors have been collected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the source string being lexed.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Lex the whole input, stopping after `Eof`.
    pub fn tokenize(mut self) -> (Vec<Token<'src>>, Vec<LexerError>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.ty == TokenType::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.errors)
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Token<'src> {
        let token = self.scan_token();
        self.last = Some(token.ty);
        token
    }

    fn scan_token(&mut self) -> Token<'src> {
        if let Some(semicolon) = self.skip_trivia() {
            return semicolon;
        }

        self.begin_token();

        let Some(c) = self.advance() else {
            if self.wants_semicolon() {
                return self.make_token_with_lexeme(TokenType::Semicolon, "");
            }
            return self.make_token(TokenType::Eof);
        };

        match c {
            '(' => self.make_token(TokenType::LParen),
            ')' => self.make_token(TokenType::RParen),
            '[' => self.make_token(TokenType::LBracket),
            ']' => self.make_token(TokenType::RBracket),
            '{' => self.make_token(TokenType::LBrace),
            '}' => self.make_token(TokenType::RBrace),
            ',' => self.make_token(TokenType::Comma),
            ';' => self.make_token(TokenType::Semicolon),
            '~' => self.make_token(TokenType::Tilde),
            ':' => {
                if self.match_char('=') {
                    self.make_token(TokenType::ColonEq)
                } else {
                    self.make_token(TokenType::Colon)
                }
            }
            '.' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.number_fraction()
                } else if self.peek() == Some('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    self.make_token(TokenType::Ellipsis)
                } else {
                    self.make_token(TokenType::Dot)
                }
            }
            '+' => {
                if self.match_char('+') {
                    self.make_token(TokenType::PlusPlus)
                } else if self.match_char('=') {
                    self.make_token(TokenType::PlusEq)
                } else {
                    self.make_token(TokenType::Plus)
                }
            }
            '-' => {
                if self.match_char('-') {
                    self.make_token(TokenType::MinusMinus)
                } else if self.match_char('=') {
                    self.make_token(TokenType::MinusEq)
                } else {
                    self.make_token(TokenType::Minus)
                }
            }
            '*' => self.with_assign(TokenType::Star, TokenType::StarEq),
            '/' => self.with_assign(TokenType::Slash, TokenType::SlashEq),
            '%' => self.with_assign(TokenType::Percent, TokenType::PercentEq),
            '^' => self.with_assign(TokenType::Caret, TokenType::CaretEq),
            '=' => self.with_assign(TokenType::Eq, TokenType::EqEq),
            '!' => self.with_assign(TokenType::Bang, TokenType::BangEq),
            '&' => {
                if self.match_char('&') {
                    self.make_token(TokenType::AmpAmp)
                } else if self.match_char('^') {
                    self.with_assign(TokenType::AmpCaret, TokenType::AmpCaretEq)
                } else {
                    self.with_assign(TokenType::Ampersand, TokenType::AmpEq)
                }
            }
            '|' => {
                if self.match_char('|') {
                    self.make_token(TokenType::PipePipe)
                } else {
                    self.with_assign(TokenType::Pipe, TokenType::PipeEq)
                }
            }
            '<' => {
                if self.match_char('-') {
                    self.make_token(TokenType::Arrow)
                } else if self.match_char('<') {
                    self.with_assign(TokenType::LessLess, TokenType::LessLessEq)
                } else {
                    self.with_assign(TokenType::Lt, TokenType::LtEq)
                }
            }
            '>' => {
                if self.match_char('>') {
                    self.with_assign(TokenType::GreaterGreater, TokenType::GreaterGreaterEq)
                } else {
                    self.with_assign(TokenType::Gt, TokenType::GtEq)
                }
            }
            '"' => self.string(),
            '`' => self.raw_string(),
            '\'' => self.rune(),
            c if c.is_ascii_digit() => self.number(c),
            c if c == '_' || unicode_ident::is_xid_start(c) => self.identifier(),
            _ => self.error_unexpected_char(c),
        }
    }

    /// Skip whitespace and comments. Returns an inserted semicolon when a
    /// newline terminates the current statement.
    fn skip_trivia(&mut self) -> Option<Token<'src>> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.advance();
                }
                Some('\n') => {
                    if self.wants_semicolon() {
                        self.begin_token();
                        self.advance();
                        return Some(self.make_token_with_lexeme(TokenType::Semicolon, "\n"));
                    }
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some('/') if self.peek_next() == Some('*') => {
                    self.begin_token();
                    self.advance();
                    self.advance();
                    let mut saw_newline = false;
                    let mut closed = false;
                    while let Some(c) = self.advance() {
                        if c == '\n' {
                            saw_newline = true;
                        }
                        if c == '*' && self.match_char('/') {
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        let span = self.current_span();
                        tracing::debug!(
                            line = self.start_line,
                            col = self.start_column,
                            "lexer error: unterminated comment"
                        );
                        self.errors.push(LexerError::UnterminatedComment { span: span.into() });
                    }
                    if saw_newline && self.wants_semicolon() {
                        return Some(self.make_token_with_lexeme(TokenType::Semicolon, "\n"));
                    }
                }
                _ => return None,
            }
        }
    }

    fn wants_semicolon(&self) -> bool {
        self.last.is_some_and(|ty| ty.ends_statement())
    }

    fn begin_token(&mut self) {
        self.start = self.current;
        self.start_column = self.column;
        self.start_line = self.line;
    }

    /// Advance to the next character and return it
    fn advance(&mut self) -> Option<char> {
        if let Some((idx, c)) = self.chars.next() {
            self.current = idx + c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    /// Peek at the next character without consuming it
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    /// Peek at the character after the next one
    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current..].chars();
        iter.next();
        iter.next()
    }

    /// Consume the next character if it matches the expected character
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn with_assign(&mut self, plain: TokenType, assign: TokenType) -> Token<'src> {
        if self.match_char('=') {
            self.make_token(assign)
        } else {
            self.make_token(plain)
        }
    }

    fn current_span(&self) -> Span {
        Span::new_with_end(
            self.start,
            self.current,
            self.start_line,
            self.start_column,
            self.line,
            self.column,
        )
    }

    /// Create a token from start to current position
    fn make_token(&self, ty: TokenType) -> Token<'src> {
        let lexeme = &self.source[self.start..self.current];
        Token::new(ty, lexeme, self.current_span())
    }

    fn make_token_with_lexeme(&self, ty: TokenType, lexeme: &'static str) -> Token<'src> {
        Token::new(ty, lexeme, self.current_span())
    }

    fn error_token(&mut self, error: LexerError, message: &str) -> Token<'src> {
        self.errors.push(error);
        Token::new(TokenType::Error, message.to_string(), self.current_span())
    }

    /// Create an error token and collect an error for an unexpected character.
    fn error_unexpected_char(&mut self, c: char) -> Token<'src> {
        let span = self.current_span();
        tracing::debug!(char = %c, line = self.start_line, col = self.start_column, "lexer error: unexpected character");
        let message = format!("unexpected character '{}'", c);
        self.error_token(
            LexerError::UnexpectedCharacter {
                ch: c,
                span: span.into(),
            },
            &message,
        )
    }

    /// Scan an interpreted string literal
    fn string(&mut self) -> Token<'src> {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    let span = self.current_span();
                    tracing::debug!(
                        line = self.start_line,
                        col = self.start_column,
                        "lexer error: unterminated string"
                    );
                    return self.error_token(
                        LexerError::UnterminatedString { span: span.into() },
                        "unterminated string literal",
                    );
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some('"') => {
                    self.advance();
                    return self.make_token(TokenType::StringLiteral);
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Scan a raw string literal; may span lines
    fn raw_string(&mut self) -> Token<'src> {
        while let Some(c) = self.advance() {
            if c == '`' {
                return self.make_token(TokenType::RawStringLiteral);
            }
        }
        let span = self.current_span();
        self.error_token(
            LexerError::UnterminatedRawString { span: span.into() },
            "unterminated raw string literal",
        )
    }

    /// Scan a rune literal
    fn rune(&mut self) -> Token<'src> {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    let span = self.current_span();
                    return self.error_token(
                        LexerError::UnterminatedRune { span: span.into() },
                        "unterminated rune literal",
                    );
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some('\'') => {
                    self.advance();
                    return self.make_token(TokenType::RuneLiteral);
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Scan a number literal whose first digit has been consumed
    fn number(&mut self, first: char) -> Token<'src> {
        if first == '0' {
            match self.peek() {
                Some('x') | Some('X') => {
                    self.advance();
                    return self.prefixed_number(|c| c.is_ascii_hexdigit(), true);
                }
                Some('b') | Some('B') => {
                    self.advance();
                    return self.prefixed_number(|c| c == '0' || c == '1', false);
                }
                Some('o') | Some('O') => {
                    self.advance();
                    return self.prefixed_number(|c| ('0'..='7').contains(&c), false);
                }
                _ => {}
            }
        }

        self.digits(|c| c.is_ascii_digit());
        let mut ty = TokenType::IntLiteral;
        if self.peek() == Some('.') && self.peek_next() != Some('.') {
            self.advance();
            self.digits(|c| c.is_ascii_digit());
            ty = TokenType::FloatLiteral;
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            if !self.exponent() {
                return self.error_invalid_number();
            }
            ty = TokenType::FloatLiteral;
        }
        self.imaginary_suffix(ty)
    }

    /// Scan a float that starts with '.', e.g. `.5`
    fn number_fraction(&mut self) -> Token<'src> {
        self.digits(|c| c.is_ascii_digit());
        if matches!(self.peek(), Some('e') | Some('E')) && !self.exponent() {
            return self.error_invalid_number();
        }
        self.imaginary_suffix(TokenType::FloatLiteral)
    }

    fn prefixed_number(&mut self, is_digit: fn(char) -> bool, hex: bool) -> Token<'src> {
        let count = self.digits(is_digit);
        let mut ty = TokenType::IntLiteral;
        if hex && self.peek() == Some('.') {
            self.advance();
            self.digits(is_digit);
            ty = TokenType::FloatLiteral;
        }
        if hex && matches!(self.peek(), Some('p') | Some('P')) {
            if !self.exponent() {
                return self.error_invalid_number();
            }
            ty = TokenType::FloatLiteral;
        } else if ty == TokenType::FloatLiteral {
            // hex mantissa requires a 'p' exponent
            return self.error_invalid_number();
        }
        if count == 0 && ty == TokenType::IntLiteral {
            return self.error_invalid_number();
        }
        self.imaginary_suffix(ty)
    }

    fn digits(&mut self, is_digit: fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if is_digit(c) {
                count += 1;
                self.advance();
            } else if c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        count
    }

    /// Consume an exponent (`e`, `E`, `p` or `P` already peeked)
    fn exponent(&mut self) -> bool {
        self.advance();
        if matches!(self.peek(), Some('+') | Some('-')) {
            self.advance();
        }
        self.digits(|c| c.is_ascii_digit()) > 0
    }

    fn imaginary_suffix(&mut self, ty: TokenType) -> Token<'src> {
        if self.match_char('i') {
            self.make_token(TokenType::ImaginaryLiteral)
        } else {
            self.make_token(ty)
        }
    }

    fn error_invalid_number(&mut self) -> Token<'src> {
        let span = self.current_span();
        tracing::debug!(
            line = self.start_line,
            col = self.start_column,
            "lexer error: invalid number"
        );
        self.error_token(
            LexerError::InvalidNumber { span: span.into() },
            "invalid number literal",
        )
    }

    /// Scan an identifier or keyword
    fn identifier(&mut self) -> Token<'src> {
        while let Some(c) = self.peek() {
            if c == '_' || unicode_ident::is_xid_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[self.start..self.current];
        let ty = TokenType::keyword_type(text).unwrap_or(TokenType::Identifier);
        self.make_token(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(source: &str) -> Vec<TokenType> {
        let (tokens, errors) = Lexer::new(source).tokenize();
        assert!(errors.is_empty(), "unexpected lexer errors: {:?}", errors);
        tokens.into_iter().map(|t| t.ty).collect()
    }

    #[test]
    fn lexes_package_clause_with_implicit_semicolon() {
        assert_eq!(
            types("package greeter\n"),
            vec![
                TokenType::KwPackage,
                TokenType::Identifier,
                TokenType::Semicolon,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn no_semicolon_after_open_brace() {
        let tys = types("type A interface {\n\tGreet() string\n}\n");
        assert_eq!(
            tys,
            vec![
                TokenType::KwType,
                TokenType::Identifier,
                TokenType::KwInterface,
                TokenType::LBrace,
                TokenType::Identifier,
                TokenType::LParen,
                TokenType::RParen,
                TokenType::Identifier,
                TokenType::Semicolon,
                TokenType::RBrace,
                TokenType::Semicolon,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn semicolon_inserted_at_eof() {
        let (tokens, _) = Lexer::new("x").tokenize();
        assert_eq!(tokens[1].ty, TokenType::Semicolon);
        assert!(tokens[1].is_implicit_semicolon());
        assert_eq!(tokens[2].ty, TokenType::Eof);
    }

    #[test]
    fn comments_are_skipped() {
        let tys = types("// leading\nfoo /* inline */ bar // trailing\n");
        assert_eq!(
            tys,
            vec![
                TokenType::Identifier,
                TokenType::Identifier,
                TokenType::Semicolon,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn multiline_block_comment_acts_as_newline() {
        let tys = types("foo /* a\nb */ bar");
        assert_eq!(tys[1], TokenType::Semicolon);
    }

    #[test]
    fn operators_and_channels() {
        let tys = types("<-chan ... &^= := != ~");
        assert_eq!(
            tys,
            vec![
                TokenType::Arrow,
                TokenType::KwChan,
                TokenType::Ellipsis,
                TokenType::AmpCaretEq,
                TokenType::ColonEq,
                TokenType::BangEq,
                TokenType::Tilde,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn number_literals() {
        let tys = types("42 0x1F 0b1010 0o17 3.14 .5 1e9 0x1p-2 2i 1_000");
        assert_eq!(
            tys,
            vec![
                TokenType::IntLiteral,
                TokenType::IntLiteral,
                TokenType::IntLiteral,
                TokenType::IntLiteral,
                TokenType::FloatLiteral,
                TokenType::FloatLiteral,
                TokenType::FloatLiteral,
                TokenType::FloatLiteral,
                TokenType::ImaginaryLiteral,
                TokenType::IntLiteral,
                TokenType::Semicolon,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn string_rune_and_raw_literals() {
        let (tokens, errors) = Lexer::new("\"a\\\"b\" 'x' `multi\nline`").tokenize();
        assert!(errors.is_empty());
        assert_eq!(tokens[0].ty, TokenType::StringLiteral);
        assert_eq!(tokens[0].lexeme, "\"a\\\"b\"");
        assert_eq!(tokens[1].ty, TokenType::RuneLiteral);
        assert_eq!(tokens[2].ty, TokenType::RawStringLiteral);
        assert_eq!(tokens[2].span.end_line, 2);
    }

    #[test]
    fn unterminated_string_collects_error() {
        let mut lexer = Lexer::new("\"oops\n");
        let token = lexer.next_token();
        assert_eq!(token.ty, TokenType::Error);
        assert!(lexer.has_errors());
        assert!(matches!(
            lexer.take_errors()[0],
            LexerError::UnterminatedString { .. }
        ));
    }

    #[test]
    fn unexpected_character_collects_error() {
        let (tokens, errors) = Lexer::new("a $ b").tokenize();
        assert_eq!(tokens[1].ty, TokenType::Error);
        assert!(matches!(
            errors[0],
            LexerError::UnexpectedCharacter { ch: '$', .. }
        ));
    }

    #[test]
    fn tracks_lines_and_columns() {
        let (tokens, _) = Lexer::new("package a\n\ntype B int").tokenize();
        let ty_kw = tokens.iter().find(|t| t.ty == TokenType::KwType).unwrap();
        assert_eq!(ty_kw.span.line, 3);
        assert_eq!(ty_kw.span.column, 1);
    }
}
