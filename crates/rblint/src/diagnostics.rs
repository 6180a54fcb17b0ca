use serde::Serialize;

/// Half-open byte range into the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }

    pub fn join(&self, other: Span) -> Span {
        Span::new(self.start, other.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// 1-based line/column of a byte offset, for rendering only. Spans stay
/// offset-based so text edits never go through a line/column round trip.
pub fn position_at(src: &str, offset: usize) -> Position {
    let mut line = 1;
    let mut column = 1;
    for (index, ch) in src.char_indices() {
        if index >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    Position { line, column }
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub span: Span,
}

pub fn render_diagnostics(path: &str, src: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = String::new();
    for (index, diagnostic) in diagnostics.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        output.push_str(&render_diagnostic(path, src, diagnostic));
    }
    output
}

pub fn render_diagnostic(path: &str, src: &str, diagnostic: &Diagnostic) -> String {
    let pos = position_at(src, diagnostic.span.start);
    format!(
        "error[{}] {}:{}:{} {}",
        diagnostic.code, path, pos.line, pos.column, diagnostic.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_at_counts_lines_and_columns_from_one() {
        let src = "ab\ncd\n";
        assert_eq!(position_at(src, 0), Position { line: 1, column: 1 });
        assert_eq!(position_at(src, 1), Position { line: 1, column: 2 });
        assert_eq!(position_at(src, 3), Position { line: 2, column: 1 });
        assert_eq!(position_at(src, 4), Position { line: 2, column: 2 });
    }

    #[test]
    fn span_text_slices_half_open() {
        let src = "(abc)";
        assert_eq!(Span::new(0, 5).text(src), "(abc)");
        assert_eq!(Span::new(1, 4).text(src), "abc");
        assert!(Span::new(2, 2).is_empty());
    }

    #[test]
    fn render_diagnostic_includes_code_path_and_position() {
        let src = "x = \"oops\n";
        let diagnostic = Diagnostic {
            code: "E1001".to_string(),
            message: "unterminated string literal".to_string(),
            span: Span::new(4, 10),
        };
        assert_eq!(
            render_diagnostic("lib/a.rb", src, &diagnostic),
            "error[E1001] lib/a.rb:1:5 unterminated string literal"
        );
    }
}
