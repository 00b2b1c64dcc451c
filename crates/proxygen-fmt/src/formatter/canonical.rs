//! Built-in formatter: validates generated Go and re-indents it by
//! delimiter depth.

use proxygen_frontend::{Lexer, LexerError, Parser, Span, Token, TokenType};

use super::{FormatResult, SourceFormatter};
use crate::config::FormatConfig;
use crate::errors::FormatError;

#[derive(Debug, Clone, Copy, Default)]
pub struct Canonical {
    pub config: FormatConfig,
}

impl Canonical {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }
}

impl SourceFormatter for Canonical {
    fn format(&self, source: &str) -> Result<FormatResult, FormatError> {
        let (tokens, errors) = Lexer::new(source).tokenize();
        if let Some(error) = errors.first() {
            return Err(lexer_syntax_error(error));
        }
        check_delimiters(&tokens)?;
        Parser::new(source)
            .parse_file()
            .map_err(|err| FormatError::Syntax {
                message: err.error.to_string(),
                span: err.span.into(),
            })?;

        let layout = LineLayout::new(source, &tokens);
        let output = render(source, &layout, &self.config);
        Ok(FormatResult::new(source, output))
    }

    fn name(&self) -> &str {
        "builtin"
    }
}

fn lexer_syntax_error(error: &LexerError) -> FormatError {
    let span = match error {
        LexerError::UnexpectedCharacter { span, .. }
        | LexerError::UnterminatedString { span }
        | LexerError::UnterminatedRawString { span }
        | LexerError::UnterminatedRune { span }
        | LexerError::InvalidNumber { span }
        | LexerError::UnterminatedComment { span } => *span,
    };
    FormatError::Syntax {
        message: error.to_string(),
        span,
    }
}

fn check_delimiters(tokens: &[Token<'_>]) -> Result<(), FormatError> {
    let mut open: Vec<&Token<'_>> = Vec::new();
    for token in tokens {
        if token.ty.is_opening_delimiter() {
            open.push(token);
        } else if let Some(expected) = token.ty.opening_delimiter() {
            match open.pop() {
                Some(opener) if opener.ty == expected => {}
                _ => {
                    return Err(FormatError::Syntax {
                        message: format!("unbalanced '{}'", token.ty.as_str()),
                        span: token.span.into(),
                    });
                }
            }
        }
    }
    match open.last() {
        Some(opener) => Err(FormatError::Syntax {
            message: format!("unclosed '{}'", opener.ty.as_str()),
            span: opener.span.into(),
        }),
        None => Ok(()),
    }
}

/// Indentation facts for each source line (index 0 = line 1).
struct LineLayout {
    /// Delimiter depth for the line
    depth: Vec<usize>,
    /// Line continues a multi-line raw string and must not be touched
    verbatim: Vec<bool>,
}

impl LineLayout {
    fn new(source: &str, tokens: &[Token<'_>]) -> Self {
        let line_count = source.lines().count().max(1);
        let mut first_depth: Vec<Option<usize>> = vec![None; line_count];
        let mut end_depth: Vec<Option<usize>> = vec![None; line_count];
        let mut verbatim = vec![false; line_count];

        let mut depth = 0usize;
        for token in tokens {
            if token.ty == TokenType::Eof || token.is_implicit_semicolon() {
                continue;
            }
            let line = line_index(token.span);
            if line >= line_count {
                break;
            }
            if first_depth[line].is_none() {
                let dedent = token.ty.opening_delimiter().is_some()
                    || matches!(token.ty, TokenType::KwCase | TokenType::KwDefault);
                first_depth[line] = Some(if dedent {
                    depth.saturating_sub(1)
                } else {
                    depth
                });
            }

            if token.ty.is_opening_delimiter() {
                depth += 1;
            } else if token.ty.opening_delimiter().is_some() {
                depth = depth.saturating_sub(1);
            }

            let end = (token.span.end_line as usize)
                .saturating_sub(1)
                .clamp(line, line_count - 1);
            for slot in &mut verbatim[line + 1..=end] {
                *slot = true;
            }
            end_depth[end] = Some(depth);
        }

        let mut running = 0usize;
        let depth = first_depth
            .iter()
            .zip(&end_depth)
            .map(|(first, end)| {
                let line_depth = first.unwrap_or(running);
                if let Some(end) = end {
                    running = *end;
                }
                line_depth
            })
            .collect();

        Self { depth, verbatim }
    }
}

fn line_index(span: Span) -> usize {
    (span.line as usize).saturating_sub(1)
}

fn render(source: &str, layout: &LineLayout, config: &FormatConfig) -> String {
    // (text, verbatim)
    let mut lines: Vec<(String, bool)> = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        if layout.verbatim.get(idx).copied().unwrap_or(false) {
            lines.push((raw.to_string(), true));
            continue;
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            lines.push((String::new(), false));
            continue;
        }
        let depth = layout.depth.get(idx).copied().unwrap_or(0);
        lines.push((format!("{}{}", config.indent(depth), trimmed), false));
    }

    let mut output = String::with_capacity(source.len());
    let mut blank_run = 0usize;
    for (idx, (line, verbatim)) in lines.iter().enumerate() {
        if line.is_empty() && !verbatim {
            blank_run += 1;
            let after_open = output.trim_end().ends_with(['{', '(']);
            let before_close = lines[idx + 1..]
                .iter()
                .find(|(l, _)| !l.is_empty())
                .is_none_or(|(next, _)| next.trim_start().starts_with(['}', ')']));
            if output.is_empty()
                || after_open
                || before_close
                || blank_run > config.max_blank_lines as usize
            {
                continue;
            }
        } else {
            blank_run = 0;
        }
        output.push_str(line);
        output.push('\n');
    }

    if output.is_empty() {
        output.push('\n');
    }
    output
}
