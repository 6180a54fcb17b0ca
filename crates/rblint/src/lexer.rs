use crate::cst::CstToken;
use crate::diagnostics::{Diagnostic, Span};
use crate::syntax;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Const,
    Ivar,
    Cvar,
    Gvar,
    Number,
    String,
    Symbol,
    Regexp,
    Keyword,
    Punct,
    Newline,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

struct Scanner<'a> {
    src: &'a str,
    chars: Vec<(usize, char)>,
    index: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().collect(),
            index: 0,
        }
    }

    fn offset(&self, index: usize) -> usize {
        match self.chars.get(index) {
            Some((offset, _)) => *offset,
            None => self.src.len(),
        }
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.index + ahead).map(|(_, ch)| *ch)
    }

    fn text_from(&self, start: usize) -> String {
        self.src[self.offset(start)..self.offset(self.index)].to_string()
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.offset(start), self.offset(self.index))
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

pub fn lex(content: &str) -> (Vec<CstToken>, Vec<Diagnostic>) {
    let mut scanner = Scanner::new(content);
    let mut tokens: Vec<CstToken> = Vec::new();
    let mut diagnostics = Vec::new();

    while let Some(ch) = scanner.peek(0) {
        let start = scanner.index;

        if ch == '\n' {
            scanner.index += 1;
            push(&mut tokens, "newline", &scanner, start);
            continue;
        }

        if ch == ' ' || ch == '\t' || ch == '\r' {
            while matches!(scanner.peek(0), Some(' ' | '\t' | '\r')) {
                scanner.index += 1;
            }
            push(&mut tokens, "whitespace", &scanner, start);
            continue;
        }

        // Line comments run to end-of-line.
        if ch == '#' {
            while scanner.peek(0).is_some_and(|c| c != '\n') {
                scanner.index += 1;
            }
            push(&mut tokens, "comment", &scanner, start);
            continue;
        }

        if is_ident_start(ch) {
            scan_word(&mut scanner);
            let text = scanner.text_from(start);
            let kind = if syntax::is_keyword(&text) {
                "keyword"
            } else if text.starts_with(|c: char| c.is_ascii_uppercase()) {
                "const"
            } else {
                "ident"
            };
            push(&mut tokens, kind, &scanner, start);
            continue;
        }

        if ch == '@' || ch == '$' {
            let kind = if ch == '@' && scanner.peek(1) == Some('@') {
                scanner.index += 2;
                "cvar"
            } else if ch == '@' {
                scanner.index += 1;
                "ivar"
            } else {
                scanner.index += 1;
                "gvar"
            };
            if !scanner.peek(0).is_some_and(is_ident_start) {
                diagnostics.push(Diagnostic {
                    code: "E1000".to_string(),
                    message: format!("unexpected character `{ch}`"),
                    span: scanner.span_from(start),
                });
                push(&mut tokens, "punct", &scanner, start);
                continue;
            }
            while scanner.peek(0).is_some_and(is_ident_continue) {
                scanner.index += 1;
            }
            push(&mut tokens, kind, &scanner, start);
            continue;
        }

        if ch.is_ascii_digit() {
            scan_number(&mut scanner);
            push(&mut tokens, "number", &scanner, start);
            continue;
        }

        if ch == '"' || ch == '\'' {
            if let Err(span) = scan_string(&mut scanner) {
                diagnostics.push(Diagnostic {
                    code: "E1001".to_string(),
                    message: "unterminated string literal".to_string(),
                    span,
                });
            }
            push(&mut tokens, "string", &scanner, start);
            continue;
        }

        if ch == ':' {
            if scanner.peek(1).is_some_and(is_ident_start) {
                scanner.index += 1;
                scan_word(&mut scanner);
                push(&mut tokens, "symbol", &scanner, start);
                continue;
            }
            if scanner.peek(1) == Some('"') {
                scanner.index += 1;
                if let Err(span) = scan_string(&mut scanner) {
                    // The literal opened at the colon, not the quote.
                    diagnostics.push(Diagnostic {
                        code: "E1001".to_string(),
                        message: "unterminated string literal".to_string(),
                        span: Span::new(scanner.offset(start), span.end),
                    });
                }
                push(&mut tokens, "symbol", &scanner, start);
                continue;
            }
        }

        if ch == '/' && regexp_position(&tokens) {
            if let Err(span) = scan_regexp(&mut scanner) {
                diagnostics.push(Diagnostic {
                    code: "E1002".to_string(),
                    message: "unterminated regexp literal".to_string(),
                    span,
                });
            }
            push(&mut tokens, "regexp", &scanner, start);
            continue;
        }

        if let Some(len) = match_symbol(&scanner) {
            scanner.index += len;
            push(&mut tokens, "punct", &scanner, start);
            continue;
        }

        scanner.index += 1;
        diagnostics.push(Diagnostic {
            code: "E1000".to_string(),
            message: format!("unexpected character `{ch}`"),
            span: scanner.span_from(start),
        });
    }

    (tokens, diagnostics)
}

fn push(tokens: &mut Vec<CstToken>, kind: &str, scanner: &Scanner, start: usize) {
    tokens.push(CstToken {
        kind: kind.to_string(),
        text: scanner.text_from(start),
        span: scanner.span_from(start),
    });
}

fn scan_word(scanner: &mut Scanner) {
    while scanner.peek(0).is_some_and(is_ident_continue) {
        scanner.index += 1;
    }
    // `defined?` and predicate/bang method names keep the trailing mark,
    // unless it opens `!=` / `?=` where it belongs to the operator.
    if matches!(scanner.peek(0), Some('?' | '!')) && scanner.peek(1) != Some('=') {
        scanner.index += 1;
    }
}

fn scan_number(scanner: &mut Scanner) {
    while scanner.peek(0).is_some_and(|c| c.is_ascii_digit()) {
        scanner.index += 1;
    }
    // A fraction only when a digit follows the dot, so `1..2` stays a range.
    if scanner.peek(0) == Some('.') && scanner.peek(1).is_some_and(|c| c.is_ascii_digit()) {
        scanner.index += 1;
        while scanner.peek(0).is_some_and(|c| c.is_ascii_digit()) {
            scanner.index += 1;
        }
    }
    // Imaginary and rational suffixes.
    if matches!(scanner.peek(0), Some('i' | 'r')) {
        scanner.index += 1;
    }
}

fn scan_string(scanner: &mut Scanner) -> Result<(), Span> {
    let start = scanner.index;
    let quote = scanner.peek(0).unwrap_or('"');
    scanner.index += 1;
    while let Some(ch) = scanner.peek(0) {
        if ch == '\\' {
            scanner.index += 2;
            continue;
        }
        if ch == quote {
            scanner.index += 1;
            return Ok(());
        }
        if quote == '"' && ch == '#' && scanner.peek(1) == Some('{') {
            scanner.index += 2;
            let mut depth = 1usize;
            while let Some(inner) = scanner.peek(0) {
                scanner.index += 1;
                match inner {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            continue;
        }
        scanner.index += 1;
    }
    Err(scanner.span_from(start))
}

fn scan_regexp(scanner: &mut Scanner) -> Result<(), Span> {
    let start = scanner.index;
    scanner.index += 1;
    while let Some(ch) = scanner.peek(0) {
        if ch == '\\' {
            scanner.index += 2;
            continue;
        }
        if ch == '\n' {
            return Err(scanner.span_from(start));
        }
        if ch == '/' {
            scanner.index += 1;
            while scanner.peek(0).is_some_and(|c| c.is_ascii_lowercase()) {
                scanner.index += 1;
            }
            return Ok(());
        }
        scanner.index += 1;
    }
    Err(scanner.span_from(start))
}

/// `/` opens a regexp literal only in expression position; after an operand
/// it is the division operator.
fn regexp_position(tokens: &[CstToken]) -> bool {
    let last = tokens
        .iter()
        .rev()
        .find(|t| t.kind != "whitespace" && t.kind != "comment");
    let Some(last) = last else {
        return true;
    };
    match last.kind.as_str() {
        "newline" => true,
        "punct" => !matches!(last.text.as_str(), ")" | "]" | "}"),
        "keyword" => !matches!(last.text.as_str(), "nil" | "true" | "false" | "self" | "end"),
        _ => false,
    }
}

fn match_symbol(scanner: &Scanner) -> Option<usize> {
    for (pattern, _) in syntax::SYMBOLS_3 {
        if (0..3).all(|i| scanner.peek(i) == Some(pattern[i])) {
            return Some(3);
        }
    }
    for (pattern, _) in syntax::SYMBOLS_2 {
        if (0..2).all(|i| scanner.peek(i) == Some(pattern[i])) {
            return Some(2);
        }
    }
    let ch = scanner.peek(0)?;
    syntax::SYMBOLS_1.contains(&ch).then_some(1)
}

/// Drop trivia and fold `;` into the newline separator kind, keeping spans.
pub fn filter_tokens(tokens: &[CstToken]) -> Vec<Token> {
    let mut filtered = Vec::new();
    for token in tokens {
        let kind = match token.kind.as_str() {
            "whitespace" | "comment" => continue,
            "newline" => TokenKind::Newline,
            "punct" if token.text == ";" => TokenKind::Newline,
            "punct" => TokenKind::Punct,
            "ident" => TokenKind::Ident,
            "const" => TokenKind::Const,
            "ivar" => TokenKind::Ivar,
            "cvar" => TokenKind::Cvar,
            "gvar" => TokenKind::Gvar,
            "number" => TokenKind::Number,
            "string" => TokenKind::String,
            "symbol" => TokenKind::Symbol,
            "regexp" => TokenKind::Regexp,
            "keyword" => TokenKind::Keyword,
            _ => continue,
        };
        filtered.push(Token {
            kind,
            text: token.text.clone(),
            span: token.span,
        });
    }
    filtered
}
