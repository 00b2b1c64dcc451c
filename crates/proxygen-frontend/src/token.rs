// token.rs
//
// Go tokens as far as proxygen needs them: every lexical element is recognised
// so that skipped declarations still tokenize cleanly.

/// Single source of truth for keyword-to-token mapping.
///
/// Each entry `"text" => Variant` generates:
/// - A match arm in `TokenType::keyword_type`: `"text" => Some(TokenType::Variant)`
/// - A match arm in `TokenType::as_str`:       `Self::Variant => "text"`
macro_rules! define_keywords {
    ( $( $text:literal => $variant:ident ),+ $(,)? ) => {
        impl TokenType {
            /// Check if a string is a keyword and return its token type.
            pub fn keyword_type(text: &str) -> Option<TokenType> {
                match text {
                    $( $text => Some(TokenType::$variant), )+
                    _ => None,
                }
            }

            /// String representation for keyword tokens (used by `as_str`).
            fn keyword_as_str(&self) -> Option<&'static str> {
                match self {
                    $( Self::$variant => Some($text), )+
                    _ => None,
                }
            }
        }
    };
}

define_keywords! {
    "break"       => KwBreak,
    "case"        => KwCase,
    "chan"        => KwChan,
    "const"       => KwConst,
    "continue"    => KwContinue,
    "default"     => KwDefault,
    "defer"       => KwDefer,
    "else"        => KwElse,
    "fallthrough" => KwFallthrough,
    "for"         => KwFor,
    "func"        => KwFunc,
    "go"          => KwGo,
    "goto"        => KwGoto,
    "if"          => KwIf,
    "import"      => KwImport,
    "interface"   => KwInterface,
    "map"         => KwMap,
    "package"     => KwPackage,
    "range"       => KwRange,
    "return"      => KwReturn,
    "select"      => KwSelect,
    "struct"      => KwStruct,
    "switch"      => KwSwitch,
    "type"        => KwType,
    "var"         => KwVar,
}

/// All Go token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Literals
    IntLiteral,
    FloatLiteral,
    ImaginaryLiteral,
    RuneLiteral,
    StringLiteral,    // "..."
    RawStringLiteral, // `...`
    Identifier,

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Arithmetic and bitwise operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Ampersand,
    Pipe,
    Caret,
    LessLess,
    GreaterGreater,
    AmpCaret, // &^

    // Compound assignment
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    LessLessEq,
    GreaterGreaterEq,
    AmpCaretEq,

    // Logical, comparison, misc
    AmpAmp,
    PipePipe,
    Arrow, // <-
    PlusPlus,
    MinusMinus,
    EqEq,
    Lt,
    Gt,
    Eq,
    Bang,
    Tilde,
    BangEq,
    LtEq,
    GtEq,
    ColonEq,
    Ellipsis, // ...

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Semicolon,
    Colon,

    // Special
    Eof,
    Error,
}

impl TokenType {
    /// Get string representation for error messages
    pub fn as_str(&self) -> &'static str {
        if let Some(s) = self.keyword_as_str() {
            return s;
        }
        match self {
            Self::IntLiteral => "integer",
            Self::FloatLiteral => "float",
            Self::ImaginaryLiteral => "imaginary",
            Self::RuneLiteral => "rune",
            Self::StringLiteral => "string",
            Self::RawStringLiteral => "raw string",
            Self::Identifier => "identifier",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::LessLess => "<<",
            Self::GreaterGreater => ">>",
            Self::AmpCaret => "&^",
            Self::PlusEq => "+=",
            Self::MinusEq => "-=",
            Self::StarEq => "*=",
            Self::SlashEq => "/=",
            Self::PercentEq => "%=",
            Self::AmpEq => "&=",
            Self::PipeEq => "|=",
            Self::CaretEq => "^=",
            Self::LessLessEq => "<<=",
            Self::GreaterGreaterEq => ">>=",
            Self::AmpCaretEq => "&^=",
            Self::AmpAmp => "&&",
            Self::PipePipe => "||",
            Self::Arrow => "<-",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::EqEq => "==",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Eq => "=",
            Self::Bang => "!",
            Self::Tilde => "~",
            Self::BangEq => "!=",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::ColonEq => ":=",
            Self::Ellipsis => "...",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Eof => "end of file",
            Self::Error => "error",
            // All keyword variants are handled by `keyword_as_str()` above.
            _ => unreachable!("keyword variant not covered by define_keywords! macro"),
        }
    }

    /// Whether a newline directly after this token terminates the statement.
    ///
    /// Mirrors the automatic semicolon rule of the Go specification.
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::IntLiteral
                | Self::FloatLiteral
                | Self::ImaginaryLiteral
                | Self::RuneLiteral
                | Self::StringLiteral
                | Self::RawStringLiteral
                | Self::KwBreak
                | Self::KwContinue
                | Self::KwFallthrough
                | Self::KwReturn
                | Self::PlusPlus
                | Self::MinusMinus
                | Self::RParen
                | Self::RBracket
                | Self::RBrace
        )
    }

    /// Opening delimiter for a closing one.
    pub fn opening_delimiter(&self) -> Option<TokenType> {
        match self {
            Self::RParen => Some(Self::LParen),
            Self::RBracket => Some(Self::LBracket),
            Self::RBrace => Some(Self::LBrace),
            _ => None,
        }
    }

    pub fn is_opening_delimiter(&self) -> bool {
        matches!(self, Self::LParen | Self::LBracket | Self::LBrace)
    }
}

pub use crate::span::Span;

/// A token with its location in source code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    pub ty: TokenType,
    pub lexeme: std::borrow::Cow<'src, str>,
    pub span: Span,
}

impl<'src> Token<'src> {
    pub fn new(ty: TokenType, lexeme: impl Into<std::borrow::Cow<'src, str>>, span: Span) -> Self {
        Self {
            ty,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// Whether this semicolon was inserted by the lexer at a newline.
    pub fn is_implicit_semicolon(&self) -> bool {
        self.ty == TokenType::Semicolon && self.lexeme != ";"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip_through_as_str() {
        for kw in ["interface", "struct", "map", "chan", "func", "package"] {
            let ty = TokenType::keyword_type(kw).expect("keyword");
            assert_eq!(ty.as_str(), kw);
        }
        assert_eq!(TokenType::keyword_type("Greeter"), None);
    }

    #[test]
    fn statement_terminators() {
        assert!(TokenType::Identifier.ends_statement());
        assert!(TokenType::RBrace.ends_statement());
        assert!(TokenType::KwReturn.ends_statement());
        assert!(!TokenType::LBrace.ends_statement());
        assert!(!TokenType::Comma.ends_statement());
    }

    #[test]
    fn delimiter_pairs() {
        assert_eq!(TokenType::RBrace.opening_delimiter(), Some(TokenType::LBrace));
        assert_eq!(TokenType::Comma.opening_delimiter(), None);
        assert!(TokenType::LBracket.is_opening_delimiter());
    }
}
