mod redundant_parens;

use serde::Serialize;

use crate::cst::CstToken;
use crate::diagnostics::Span;
use crate::surface::{Expr, Literal};

/// One reported rule violation. The span highlights the full `(...)` text
/// in the original source.
#[derive(Debug, Clone, Serialize)]
pub struct Offense {
    pub message: String,
    pub span: Span,
}

/// A deletion against the original source snapshot.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TextEdit {
    pub span: Span,
}

/// Depth-first pass over one file's statements. Offenses accumulate against
/// the immutable source; nothing here mutates the tree or the text.
pub fn check_stmts(stmts: &[Expr], tokens: &[CstToken]) -> Vec<Offense> {
    let mut offenses = Vec::new();
    for stmt in stmts {
        walk(stmt, false, tokens, &mut offenses);
    }
    offenses
}

fn walk(expr: &Expr, range_endpoint: bool, tokens: &[CstToken], out: &mut Vec<Offense>) {
    match expr {
        Expr::Paren {
            open,
            close,
            inner,
            ..
        } => {
            if let Some(offense) =
                redundant_parens::classify(*open, *close, inner, range_endpoint, tokens)
            {
                out.push(offense);
            }
            walk(inner, false, tokens, out);
        }
        Expr::Literal(Literal::Array { items, .. }) => {
            for item in items {
                walk(item, false, tokens, out);
            }
        }
        // Hash literals carry no children; text below the brace is never
        // inspected.
        Expr::Literal(_)
        | Expr::Lvar(_)
        | Expr::Ivar(_)
        | Expr::Cvar(_)
        | Expr::Gvar(_)
        | Expr::Const(_)
        | Expr::NullaryKeyword(_)
        | Expr::Alias { .. } => {}
        Expr::Jump { args, .. } | Expr::Forward { args, .. } => {
            for arg in args {
                walk(arg, false, tokens, out);
            }
        }
        Expr::Defined { arg, .. } => walk(arg, false, tokens, out),
        Expr::Call { receiver, args, .. } => {
            if let Some(receiver) = receiver {
                walk(receiver, false, tokens, out);
            }
            for arg in args {
                walk(arg, false, tokens, out);
            }
        }
        Expr::Index { base, index, .. } => {
            walk(base, false, tokens, out);
            walk(index, false, tokens, out);
        }
        // A wrapped endpoint keeps its parens; only the range as a whole is
        // a candidate.
        Expr::Range { lo, hi, .. } => {
            walk(lo, true, tokens, out);
            walk(hi, true, tokens, out);
        }
        Expr::WordBinary { left, right, .. } | Expr::Binary { left, right, .. } => {
            walk(left, false, tokens, out);
            walk(right, false, tokens, out);
        }
        Expr::Not { operand, .. } => walk(operand, false, tokens, out),
        Expr::Assign { value, .. } => walk(value, false, tokens, out),
        Expr::PostfixLoop { body, cond, .. } => {
            walk(body, false, tokens, out);
            walk(cond, false, tokens, out);
        }
        Expr::If {
            cond,
            then_body,
            else_body,
            ..
        } => {
            walk(cond, false, tokens, out);
            for stmt in then_body {
                walk(stmt, false, tokens, out);
            }
            if let Some(body) = else_body {
                for stmt in body {
                    walk(stmt, false, tokens, out);
                }
            }
        }
    }
}

/// The two single-byte deletions that unwrap an offense: the open paren is
/// the first byte of the highlight, the close paren the last. Only valid
/// for offenses emitted by `check_stmts` against the same source text.
pub fn correct(offense: &Offense) -> [TextEdit; 2] {
    let span = offense.span;
    [
        TextEdit {
            span: Span::new(span.start, span.start + 1),
        },
        TextEdit {
            span: Span::new(span.end - 1, span.end),
        },
    ]
}

/// Apply deletions in reverse offset order against the original snapshot,
/// so earlier edits never shift the offsets of later ones.
pub fn apply_edits(src: &str, edits: &[TextEdit]) -> String {
    let mut sorted: Vec<TextEdit> = edits.to_vec();
    sorted.sort_by(|a, b| b.span.start.cmp(&a.span.start));
    let mut output = src.to_string();
    for edit in sorted {
        debug_assert!(edit.span.end <= output.len());
        output.replace_range(edit.span.start..edit.span.end, "");
    }
    output
}
