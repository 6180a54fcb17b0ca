use crate::cst::CstToken;
use crate::diagnostics::Span;
use crate::surface::{ArgStyle, Expr};
use crate::syntax;

use super::Offense;

/// Verdict for one paren pair. Total over every expression shape: anything
/// not explicitly enumerated keeps its parens, so an unknown construct is
/// never auto-fixed.
pub(super) fn classify(
    open: Span,
    close: Span,
    inner: &Expr,
    range_endpoint: bool,
    tokens: &[CstToken],
) -> Option<Offense> {
    if keyword_touches(tokens, open, close) {
        return None;
    }
    if range_endpoint {
        return None;
    }
    let category = category_of(inner)?;
    Some(Offense {
        message: format!("Don't use parentheses around {category}."),
        span: open.join(close),
    })
}

fn category_of(inner: &Expr) -> Option<&'static str> {
    match inner {
        Expr::Literal(_) => Some("a literal"),
        Expr::Lvar(_) | Expr::Ivar(_) | Expr::Cvar(_) | Expr::Gvar(_) => Some("a variable"),
        Expr::Const(_) => Some("a constant"),
        Expr::NullaryKeyword(_) => Some("a keyword"),
        // A bare argument list relies on the parens for precedence; the
        // explicit call form already carries its own.
        Expr::Jump { args, style, .. } | Expr::Forward { args, style, .. } => {
            if *style == ArgStyle::Bare && !args.is_empty() {
                None
            } else {
                Some("a keyword")
            }
        }
        Expr::Defined { parenthesized, .. } => {
            if *parenthesized {
                Some("a keyword")
            } else {
                None
            }
        }
        Expr::Call { args, style, .. } => {
            if *style == ArgStyle::Bare && !args.is_empty() {
                None
            } else {
                Some("a method call")
            }
        }
        Expr::Index { .. } => Some("a method call"),
        Expr::Range { .. } => Some("a range"),
        // Word-form operators bind looser than most grouping; their parens
        // may be load-bearing.
        Expr::WordBinary { .. } | Expr::Not { .. } => None,
        // Structurally required or ambiguous without the parens.
        Expr::Alias { .. } | Expr::PostfixLoop { .. } => None,
        // Default-safe: operator expressions, assignment, control
        // expressions, and an already-parenthesized inner pair.
        Expr::Binary { .. } | Expr::Assign { .. } | Expr::If { .. } | Expr::Paren { .. } => None,
    }
}

/// Parens touching an adjacent control keyword are presumed load-bearing:
/// `else(1)` or `(1)end` cannot lose them without re-tokenizing unsafely.
fn keyword_touches(tokens: &[CstToken], open: Span, close: Span) -> bool {
    tokens.iter().any(|token| {
        token.kind == "keyword"
            && syntax::is_control_keyword(&token.text)
            && (token.span.end == open.start || token.span.start == close.end)
    })
}

#[cfg(test)]
mod tests {
    use crate::lint_text;

    fn offense_messages(src: &str) -> Vec<String> {
        let (offenses, diagnostics) = lint_text(src);
        assert!(
            diagnostics.is_empty(),
            "unexpected diagnostics for {src:?}: {diagnostics:?}"
        );
        offenses.into_iter().map(|o| o.message).collect()
    }

    fn highlights(src: &str) -> Vec<String> {
        let (offenses, diagnostics) = lint_text(src);
        assert!(
            diagnostics.is_empty(),
            "unexpected diagnostics for {src:?}: {diagnostics:?}"
        );
        offenses
            .into_iter()
            .map(|o| o.span.text(src).to_string())
            .collect()
    }

    #[test]
    fn flags_literal_and_highlights_the_whole_pair() {
        assert_eq!(
            offense_messages("(1)"),
            vec!["Don't use parentheses around a literal.".to_string()]
        );
        assert_eq!(highlights("(1)"), vec!["(1)".to_string()]);
    }

    #[test]
    fn keyword_touching_open_paren_suppresses_the_offense() {
        assert!(offense_messages("if x; y else(1) end").is_empty());
    }

    #[test]
    fn keyword_touching_close_paren_suppresses_the_offense() {
        assert!(offense_messages("if x; y else (1)end").is_empty());
    }

    #[test]
    fn spaced_keyword_boundaries_keep_the_offense() {
        assert_eq!(offense_messages("if x; y else (1) end").len(), 1);
    }

    #[test]
    fn range_endpoints_keep_their_parens() {
        assert!(offense_messages("(a)..(b)").is_empty());
        assert!(offense_messages("(a)...(b)").is_empty());
    }

    #[test]
    fn whole_range_loses_its_parens() {
        assert_eq!(
            offense_messages("(a..b)"),
            vec!["Don't use parentheses around a range.".to_string()]
        );
    }

    #[test]
    fn operator_expressions_are_default_safe() {
        assert!(offense_messages("(1 + 1)").is_empty());
        assert!(offense_messages("(x == y)").is_empty());
    }

    #[test]
    fn doubly_wrapped_expression_flags_only_the_inner_pair() {
        assert_eq!(highlights("((1))"), vec!["(1)".to_string()]);
    }

    #[test]
    fn word_operators_are_never_flagged_however_nested() {
        assert!(offense_messages("(1 and 2) and (3 or 4)").is_empty());
        assert!(offense_messages("((1 and 2) or (3 and 4)) and (not 5)").is_empty());
    }
}
