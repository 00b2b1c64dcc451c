// span.rs
//
// Locations of tokens and syntax nodes in a Go file.

/// Byte range plus the line/column pair at each end. Lines and columns are
/// 1-based; `end` and `end_column` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Span {
    /// Span of a token that may cover several lines (raw strings, block comments).
    pub fn new_with_end(
        start: usize,
        end: usize,
        line: u32,
        column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Self {
            start,
            end,
            line,
            column,
            end_line,
            end_column,
        }
    }

    /// Span of a token contained in one line.
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        let width = end.saturating_sub(start) as u32;
        Self::new_with_end(start, end, line, column, line, column + width)
    }

    /// From the start of `self` to the end of `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            end: other.end,
            end_line: other.end_line,
            end_column: other.end_column,
            ..self
        }
    }

    /// The text this span covers in `source`, or `""` when it lies outside it.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.end.saturating_sub(span.start)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_span_ends_on_its_line() {
        let span = Span::new(10, 16, 3, 6);
        assert_eq!((span.end_line, span.end_column), (3, 12));
    }

    #[test]
    fn merge_takes_start_of_first_and_end_of_second() {
        let package = Span::new(0, 7, 1, 1);
        let raw = Span::new_with_end(20, 41, 3, 5, 5, 2);
        let merged = package.merge(raw);
        assert_eq!((merged.start, merged.line, merged.column), (0, 1, 1));
        assert_eq!((merged.end, merged.end_line, merged.end_column), (41, 5, 2));
    }

    #[test]
    fn text_slices_the_covered_source() {
        let source = "type Store interface{}";
        assert_eq!(Span::new(5, 10, 1, 6).text(source), "Store");
        assert_eq!(Span::new(30, 34, 1, 31).text(source), "");
    }

    #[test]
    fn converts_to_offset_and_length() {
        let source_span: miette::SourceSpan = Span::new(5, 10, 1, 6).into();
        assert_eq!((source_span.offset(), source_span.len()), (5, 5));
    }
}
