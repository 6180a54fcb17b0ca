use std::collections::HashSet;

use crate::diagnostics::{Diagnostic, Span};
use crate::lexer::{Token, TokenKind};
use crate::syntax;

use super::ast::{
    ArgStyle, Expr, ForwardKind, JumpKind, Literal, LoopKind, SpannedName, WordOp,
};

/// Parse a statement list from the filtered token stream. Local variable
/// names are tracked as assignments parse, so a later bare identifier
/// resolves to a variable reference rather than a method call.
pub fn parse_program(tokens: &[Token]) -> (Vec<Expr>, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens);
    let mut stmts = Vec::new();
    parser.skip_newlines();
    while !parser.at_end() {
        let before = parser.pos;
        if let Some(stmt) = parser.parse_stmt() {
            stmts.push(stmt);
        }
        if let Some(token) = parser.peek() {
            if token.kind != TokenKind::Newline {
                let span = token.span;
                parser.error("E1500", format!("unexpected token `{}`", token.text), span);
            }
        }
        if parser.pos == before {
            // Never stall on an unparsable token.
            parser.pos += 1;
        }
        parser.skip_newlines();
    }
    (stmts, parser.diagnostics)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    locals: HashSet<String>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            locals: HashSet::new(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, ahead: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + ahead)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn skip_newlines(&mut self) {
        while self.peek().is_some_and(|t| t.kind == TokenKind::Newline) {
            self.pos += 1;
        }
    }

    fn check_punct(&self, text: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Punct && t.text == text)
    }

    fn eat_punct(&mut self, text: &str) -> Option<Span> {
        if self.check_punct(text) {
            let span = self.tokens[self.pos].span;
            self.pos += 1;
            Some(span)
        } else {
            None
        }
    }

    fn check_keyword(&self, text: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Keyword && t.text == text)
    }

    fn eat_keyword(&mut self, text: &str) -> Option<Span> {
        if self.check_keyword(text) {
            let span = self.tokens[self.pos].span;
            self.pos += 1;
            Some(span)
        } else {
            None
        }
    }

    fn expect_punct(&mut self, text: &str) -> Option<Span> {
        if let Some(span) = self.eat_punct(text) {
            return Some(span);
        }
        let span = self.error_span();
        self.error("E1501", format!("expected `{text}`"), span);
        None
    }

    fn error_span(&self) -> Span {
        match self.peek() {
            Some(token) => token.span,
            None => {
                let end = self.tokens.last().map_or(0, |t| t.span.end);
                Span::new(end, end)
            }
        }
    }

    fn error(&mut self, code: &str, message: String, span: Span) {
        self.diagnostics.push(Diagnostic {
            code: code.to_string(),
            message,
            span,
        });
    }

    /// True when the next token starts with no gap after `end`, which is how
    /// call parens are told apart from a parenthesized first argument.
    fn touching(&self, end: usize) -> bool {
        self.peek().is_some_and(|t| t.span.start == end)
    }

    fn parse_stmt(&mut self) -> Option<Expr> {
        if let Some(kw_span) = self.eat_keyword("alias") {
            let new_name = self.expect_name()?;
            let old_name = self.expect_name()?;
            let span = kw_span.join(old_name.span);
            return Some(Expr::Alias {
                new_name,
                old_name,
                span,
            });
        }

        let mut expr = self.parse_expr()?;
        loop {
            let kind = if self.check_keyword("while") {
                LoopKind::While
            } else if self.check_keyword("until") {
                LoopKind::Until
            } else {
                break;
            };
            self.pos += 1;
            let cond = self.parse_expr()?;
            let span = expr.span().join(cond.span());
            expr = Expr::PostfixLoop {
                kind,
                body: Box::new(expr),
                cond: Box::new(cond),
                span,
            };
        }
        Some(expr)
    }

    fn parse_expr(&mut self) -> Option<Expr> {
        let mut left = self.parse_word_operand()?;
        loop {
            let op = if self.check_keyword("and") {
                WordOp::And
            } else if self.check_keyword("or") {
                WordOp::Or
            } else {
                break;
            };
            self.pos += 1;
            let right = self.parse_word_operand()?;
            let span = left.span().join(right.span());
            left = Expr::WordBinary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Some(left)
    }

    fn parse_word_operand(&mut self) -> Option<Expr> {
        if let Some(kw_span) = self.eat_keyword("not") {
            let operand = self.parse_word_operand()?;
            let span = kw_span.join(operand.span());
            return Some(Expr::Not {
                operand: Box::new(operand),
                span,
            });
        }
        self.parse_assign()
    }

    fn parse_assign(&mut self) -> Option<Expr> {
        let is_assign = self.peek().is_some_and(|t| t.kind == TokenKind::Ident)
            && self
                .peek_at(1)
                .is_some_and(|t| t.kind == TokenKind::Punct && t.text == "=");
        if is_assign {
            let target = self.expect_name()?;
            self.pos += 1; // `=`
            let value = self.parse_assign()?;
            self.locals.insert(target.name.clone());
            let span = target.span.join(value.span());
            return Some(Expr::Assign {
                target,
                value: Box::new(value),
                span,
            });
        }
        self.parse_range()
    }

    fn parse_range(&mut self) -> Option<Expr> {
        let lo = self.parse_binary(0)?;
        let exclusive = if self.check_punct("...") {
            true
        } else if self.check_punct("..") {
            false
        } else {
            return Some(lo);
        };
        self.pos += 1;
        let hi = self.parse_binary(0)?;
        let span = lo.span().join(hi.span());
        Some(Expr::Range {
            exclusive,
            lo: Box::new(lo),
            hi: Box::new(hi),
            span,
        })
    }

    fn parse_binary(&mut self, min_power: u8) -> Option<Expr> {
        let mut left = self.parse_postfix()?;
        loop {
            let Some(token) = self.peek() else {
                break;
            };
            if token.kind != TokenKind::Punct {
                break;
            }
            let Some(power) = binding_power(&token.text) else {
                break;
            };
            if power <= min_power {
                break;
            }
            let op = token.text.clone();
            self.pos += 1;
            let right = self.parse_binary(power)?;
            let span = left.span().join(right.span());
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Some(left)
    }

    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut base = self.parse_primary()?;
        loop {
            if self.eat_punct(".").is_some() {
                let name = self.expect_name()?;
                let mut span = base.span().join(name.span);
                let mut args = Vec::new();
                let mut style = ArgStyle::None;
                if self.touching(name.span.end) && self.check_punct("(") {
                    let (parsed, close) = self.parse_paren_args()?;
                    args = parsed;
                    style = ArgStyle::Parenthesized;
                    span = base.span().join(close);
                }
                base = Expr::Call {
                    receiver: Some(Box::new(base)),
                    name,
                    args,
                    style,
                    span,
                };
                continue;
            }
            if self.check_punct("[") && self.touching(base.span().end) {
                self.pos += 1;
                let index = self.parse_expr()?;
                let close = self.expect_punct("]")?;
                let span = base.span().join(close);
                base = Expr::Index {
                    base: Box::new(base),
                    index: Box::new(index),
                    span,
                };
                continue;
            }
            break;
        }
        Some(base)
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => {
                let span = self.error_span();
                self.error("E1500", "unexpected end of input".to_string(), span);
                return None;
            }
        };
        match token.kind {
            TokenKind::Number => {
                self.pos += 1;
                Some(Expr::Literal(Literal::Number {
                    text: token.text,
                    span: token.span,
                }))
            }
            TokenKind::String => {
                self.pos += 1;
                let interpolated = token.text.starts_with('"') && token.text.contains("#{");
                Some(Expr::Literal(Literal::Str {
                    text: token.text,
                    interpolated,
                    span: token.span,
                }))
            }
            TokenKind::Symbol => {
                self.pos += 1;
                let interpolated = token.text.contains("#{");
                Some(Expr::Literal(Literal::Symbol {
                    text: token.text,
                    interpolated,
                    span: token.span,
                }))
            }
            TokenKind::Regexp => {
                self.pos += 1;
                Some(Expr::Literal(Literal::Regexp {
                    text: token.text,
                    span: token.span,
                }))
            }
            TokenKind::Ivar => {
                self.pos += 1;
                Some(Expr::Ivar(name_of(&token)))
            }
            TokenKind::Cvar => {
                self.pos += 1;
                Some(Expr::Cvar(name_of(&token)))
            }
            TokenKind::Gvar => {
                self.pos += 1;
                Some(Expr::Gvar(name_of(&token)))
            }
            TokenKind::Const => {
                self.pos += 1;
                Some(Expr::Const(name_of(&token)))
            }
            TokenKind::Keyword => self.parse_keyword_primary(&token),
            TokenKind::Ident => self.parse_ident_primary(&token),
            TokenKind::Punct => match token.text.as_str() {
                "(" => self.parse_paren(),
                "[" => self.parse_array(),
                "{" => self.parse_hash(),
                _ => {
                    self.pos += 1;
                    self.error(
                        "E1500",
                        format!("unexpected token `{}`", token.text),
                        token.span,
                    );
                    None
                }
            },
            TokenKind::Newline => {
                let span = token.span;
                self.error("E1500", "unexpected end of expression".to_string(), span);
                None
            }
        }
    }

    fn parse_keyword_primary(&mut self, token: &Token) -> Option<Expr> {
        let text = token.text.as_str();
        let span = token.span;
        if syntax::KEYWORDS_NULLARY.contains(&text) {
            self.pos += 1;
            return Some(Expr::NullaryKeyword(name_of(token)));
        }
        match text {
            "nil" => {
                self.pos += 1;
                Some(Expr::Literal(Literal::Nil { span }))
            }
            "true" | "false" => {
                self.pos += 1;
                Some(Expr::Literal(Literal::Bool {
                    value: text == "true",
                    span,
                }))
            }
            "break" | "next" | "return" => {
                self.pos += 1;
                let kind = match text {
                    "break" => JumpKind::Break,
                    "next" => JumpKind::Next,
                    _ => JumpKind::Return,
                };
                let (args, style, span) = self.parse_keyword_args(span)?;
                Some(Expr::Jump {
                    kind,
                    args,
                    style,
                    span,
                })
            }
            "super" | "yield" => {
                self.pos += 1;
                let kind = if text == "super" {
                    ForwardKind::Super
                } else {
                    ForwardKind::Yield
                };
                let (args, style, span) = self.parse_keyword_args(span)?;
                Some(Expr::Forward {
                    kind,
                    args,
                    style,
                    span,
                })
            }
            "defined?" => {
                self.pos += 1;
                if self.touching(span.end) && self.check_punct("(") {
                    self.pos += 1;
                    let arg = self.parse_expr()?;
                    let close = self.expect_punct(")")?;
                    return Some(Expr::Defined {
                        arg: Box::new(arg),
                        parenthesized: true,
                        span: span.join(close),
                    });
                }
                let arg = self.parse_expr()?;
                let full = span.join(arg.span());
                Some(Expr::Defined {
                    arg: Box::new(arg),
                    parenthesized: false,
                    span: full,
                })
            }
            "if" | "unless" => {
                self.pos += 1;
                self.parse_if(span)
            }
            _ => {
                self.pos += 1;
                self.error("E1500", format!("unexpected keyword `{text}`"), span);
                None
            }
        }
    }

    fn parse_ident_primary(&mut self, token: &Token) -> Option<Expr> {
        let name = name_of(token);
        self.pos += 1;
        if self.touching(name.span.end) && self.check_punct("(") {
            let (args, close) = self.parse_paren_args()?;
            let span = name.span.join(close);
            return Some(Expr::Call {
                receiver: None,
                name,
                args,
                style: ArgStyle::Parenthesized,
                span,
            });
        }
        let index_follows = self.check_punct("[") && self.touching(name.span.end);
        if !index_follows && self.starts_expression() {
            let args = self.parse_bare_args()?;
            let last = args.last().map_or(name.span, |arg| arg.span());
            let span = name.span.join(last);
            return Some(Expr::Call {
                receiver: None,
                name,
                args,
                style: ArgStyle::Bare,
                span,
            });
        }
        if self.locals.contains(&name.name) {
            return Some(Expr::Lvar(name));
        }
        let span = name.span;
        Some(Expr::Call {
            receiver: None,
            name,
            args: Vec::new(),
            style: ArgStyle::None,
            span,
        })
    }

    fn parse_keyword_args(&mut self, kw_span: Span) -> Option<(Vec<Expr>, ArgStyle, Span)> {
        if self.touching(kw_span.end) && self.check_punct("(") {
            let (args, close) = self.parse_paren_args()?;
            return Some((args, ArgStyle::Parenthesized, kw_span.join(close)));
        }
        if self.starts_expression() {
            let args = self.parse_bare_args()?;
            let last = args.last().map_or(kw_span, |arg| arg.span());
            return Some((args, ArgStyle::Bare, kw_span.join(last)));
        }
        Some((Vec::new(), ArgStyle::None, kw_span))
    }

    fn parse_paren_args(&mut self) -> Option<(Vec<Expr>, Span)> {
        self.expect_punct("(")?;
        let mut args = Vec::new();
        if let Some(close) = self.eat_punct(")") {
            return Some((args, close));
        }
        loop {
            args.push(self.parse_expr()?);
            if self.eat_punct(",").is_none() {
                break;
            }
        }
        let close = self.expect_punct(")")?;
        Some((args, close))
    }

    fn parse_bare_args(&mut self) -> Option<Vec<Expr>> {
        let mut args = vec![self.parse_range()?];
        while self.eat_punct(",").is_some() {
            args.push(self.parse_range()?);
        }
        Some(args)
    }

    /// Would the next token begin an argument expression on the same line?
    fn starts_expression(&self) -> bool {
        let Some(token) = self.peek() else {
            return false;
        };
        match token.kind {
            TokenKind::Ident
            | TokenKind::Const
            | TokenKind::Ivar
            | TokenKind::Cvar
            | TokenKind::Gvar
            | TokenKind::Number
            | TokenKind::String
            | TokenKind::Symbol
            | TokenKind::Regexp => true,
            TokenKind::Punct => matches!(token.text.as_str(), "(" | "["),
            TokenKind::Keyword => {
                syntax::KEYWORDS_NULLARY.contains(&token.text.as_str())
                    || matches!(token.text.as_str(), "nil" | "true" | "false" | "defined?")
            }
            TokenKind::Newline => false,
        }
    }

    fn parse_paren(&mut self) -> Option<Expr> {
        let open = self.expect_punct("(")?;
        self.skip_newlines();
        let inner = self.parse_stmt()?;
        self.skip_newlines();
        if self.check_punct(",") {
            let span = self.error_span();
            self.error(
                "E1502",
                "parentheses must wrap a single expression".to_string(),
                span,
            );
            return None;
        }
        let close = self.expect_punct(")")?;
        Some(Expr::Paren {
            open,
            close,
            inner: Box::new(inner),
            span: open.join(close),
        })
    }

    fn parse_array(&mut self) -> Option<Expr> {
        let open = self.expect_punct("[")?;
        self.skip_newlines();
        let mut items = Vec::new();
        if let Some(close) = self.eat_punct("]") {
            return Some(Expr::Literal(Literal::Array {
                items,
                span: open.join(close),
            }));
        }
        loop {
            items.push(self.parse_expr()?);
            self.skip_newlines();
            if self.eat_punct(",").is_none() {
                break;
            }
            self.skip_newlines();
        }
        let close = self.expect_punct("]")?;
        Some(Expr::Literal(Literal::Array {
            items,
            span: open.join(close),
        }))
    }

    /// Hash bodies are skipped wholesale; the rule only needs the literal's
    /// extent, never its entries.
    fn parse_hash(&mut self) -> Option<Expr> {
        let open = self.expect_punct("{")?;
        let mut depth = 1usize;
        let mut close = open;
        while depth > 0 {
            let Some(token) = self.advance() else {
                let span = self.error_span();
                self.error("E1501", "expected `}`".to_string(), span);
                return None;
            };
            if token.kind == TokenKind::Punct {
                match token.text.as_str() {
                    "{" => depth += 1,
                    "}" => {
                        depth -= 1;
                        close = token.span;
                    }
                    _ => {}
                }
            }
        }
        Some(Expr::Literal(Literal::Hash {
            span: open.join(close),
        }))
    }

    fn parse_if(&mut self, kw_span: Span) -> Option<Expr> {
        let cond = self.parse_expr()?;
        if self.eat_keyword("then").is_none() {
            self.skip_newlines();
        }
        let mut then_body = Vec::new();
        let mut else_body = None;
        loop {
            self.skip_newlines();
            if self.check_keyword("else") || self.check_keyword("end") {
                break;
            }
            if self.at_end() {
                break;
            }
            then_body.push(self.parse_stmt()?);
        }
        if self.eat_keyword("else").is_some() {
            let mut body = Vec::new();
            loop {
                self.skip_newlines();
                if self.check_keyword("end") || self.at_end() {
                    break;
                }
                body.push(self.parse_stmt()?);
            }
            else_body = Some(body);
        }
        let Some(end_span) = self.eat_keyword("end") else {
            let span = self.error_span();
            self.error("E1501", "expected `end`".to_string(), span);
            return None;
        };
        Some(Expr::If {
            cond: Box::new(cond),
            then_body,
            else_body,
            span: kw_span.join(end_span),
        })
    }

    fn expect_name(&mut self) -> Option<SpannedName> {
        match self.peek() {
            Some(token) if matches!(token.kind, TokenKind::Ident | TokenKind::Const) => {
                let name = name_of(token);
                self.pos += 1;
                Some(name)
            }
            _ => {
                let span = self.error_span();
                self.error("E1500", "expected a name".to_string(), span);
                None
            }
        }
    }
}

fn name_of(token: &Token) -> SpannedName {
    SpannedName {
        name: token.text.clone(),
        span: token.span,
    }
}

fn binding_power(op: &str) -> Option<u8> {
    match op {
        "||" => Some(1),
        "&&" => Some(2),
        "==" | "!=" => Some(3),
        "<" | ">" | "<=" | ">=" => Some(4),
        "|" | "^" => Some(5),
        "&" => Some(6),
        "+" | "-" => Some(7),
        "*" | "/" | "%" => Some(8),
        "**" | "<<" | ">>" => Some(9),
        _ => None,
    }
}
