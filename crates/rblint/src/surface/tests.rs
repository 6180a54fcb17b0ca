use crate::diagnostics::Span;
use crate::lexer::{filter_tokens, lex};
use crate::surface::{parse_program, ArgStyle, Expr, JumpKind, Literal};

fn parse(src: &str) -> Vec<Expr> {
    let (cst, lex_diags) = lex(src);
    assert!(lex_diags.is_empty(), "lex diagnostics for {src:?}: {lex_diags:?}");
    let tokens = filter_tokens(&cst);
    let (stmts, diags) = parse_program(&tokens);
    assert!(diags.is_empty(), "parse diagnostics for {src:?}: {diags:?}");
    stmts
}

fn parse_one(src: &str) -> Expr {
    let mut stmts = parse(src);
    assert_eq!(stmts.len(), 1, "expected one statement in {src:?}");
    stmts.remove(0)
}

#[test]
fn call_with_parenthesized_args_records_the_style() {
    let Expr::Call { args, style, .. } = parse_one("x(1, 2)") else {
        panic!("expected a call");
    };
    assert_eq!(style, ArgStyle::Parenthesized);
    assert_eq!(args.len(), 2);
}

#[test]
fn call_with_bare_args_records_the_style() {
    let Expr::Call { args, style, .. } = parse_one("f a, 1, 2") else {
        panic!("expected a call");
    };
    assert_eq!(style, ArgStyle::Bare);
    assert_eq!(args.len(), 3);
}

#[test]
fn bare_identifier_is_a_call_until_assigned() {
    let Expr::Call { style, args, .. } = parse_one("x") else {
        panic!("expected a call");
    };
    assert_eq!(style, ArgStyle::None);
    assert!(args.is_empty());

    let stmts = parse("x = 1; x");
    assert!(matches!(stmts[0], Expr::Assign { .. }));
    assert!(matches!(stmts[1], Expr::Lvar(_)), "assigned name reads as a variable");
}

#[test]
fn member_access_chains_parse_as_calls_with_receiver() {
    let Expr::Call { receiver, name, style, .. } = parse_one("\"x\".to_sym") else {
        panic!("expected a call");
    };
    assert_eq!(name.name, "to_sym");
    assert_eq!(style, ArgStyle::None);
    assert!(matches!(
        receiver.as_deref(),
        Some(Expr::Literal(Literal::Str { .. }))
    ));
}

#[test]
fn index_access_requires_a_touching_bracket() {
    let Expr::Index { base, index, .. } = parse_one("x[:y]") else {
        panic!("expected an index access");
    };
    assert!(matches!(*base, Expr::Call { .. }));
    assert!(matches!(*index, Expr::Literal(Literal::Symbol { .. })));

    // With a gap the bracket opens an array argument instead.
    let Expr::Call { style, args, .. } = parse_one("x [:y]") else {
        panic!("expected a call");
    };
    assert_eq!(style, ArgStyle::Bare);
    assert!(matches!(args[0], Expr::Literal(Literal::Array { .. })));
}

#[test]
fn value_keywords_record_each_argument_style() {
    let Expr::Jump { kind, style, args, .. } = parse_one("break") else {
        panic!("expected a jump");
    };
    assert_eq!(kind, JumpKind::Break);
    assert_eq!(style, ArgStyle::None);
    assert!(args.is_empty());

    let Expr::Jump { style, args, .. } = parse_one("return()") else {
        panic!("expected a jump");
    };
    assert_eq!(style, ArgStyle::Parenthesized);
    assert!(args.is_empty());

    let Expr::Jump { style, args, .. } = parse_one("next(1)") else {
        panic!("expected a jump");
    };
    assert_eq!(style, ArgStyle::Parenthesized);
    assert_eq!(args.len(), 1);

    let Expr::Jump { style, args, .. } = parse_one("return 1, 2") else {
        panic!("expected a jump");
    };
    assert_eq!(style, ArgStyle::Bare);
    assert_eq!(args.len(), 2);
}

#[test]
fn defined_query_tracks_its_call_parens() {
    let Expr::Defined { parenthesized, .. } = parse_one("defined?(:A)") else {
        panic!("expected defined?");
    };
    assert!(parenthesized);

    let Expr::Defined { parenthesized, .. } = parse_one("defined? :A") else {
        panic!("expected defined?");
    };
    assert!(!parenthesized);
}

#[test]
fn ranges_parse_with_exclusivity() {
    let Expr::Range { exclusive, .. } = parse_one("a..b") else {
        panic!("expected a range");
    };
    assert!(!exclusive);

    let Expr::Range { exclusive, lo, hi, .. } = parse_one("(a)...(b)") else {
        panic!("expected a range");
    };
    assert!(exclusive);
    assert!(matches!(*lo, Expr::Paren { .. }));
    assert!(matches!(*hi, Expr::Paren { .. }));
}

#[test]
fn paren_node_holds_exact_delimiter_spans() {
    let Expr::Paren { open, close, inner, span } = parse_one("(1)") else {
        panic!("expected a paren node");
    };
    assert_eq!(open, Span::new(0, 1));
    assert_eq!(close, Span::new(2, 3));
    assert_eq!(span, Span::new(0, 3));
    assert!(matches!(*inner, Expr::Literal(Literal::Number { .. })));
}

#[test]
fn paren_wrapping_a_comma_list_is_rejected() {
    let (cst, _) = lex("(1, 2)");
    let tokens = filter_tokens(&cst);
    let (_, diags) = parse_program(&tokens);
    assert!(
        diags.iter().any(|d| d.code == "E1502"),
        "expected E1502, got: {diags:?}"
    );
}

#[test]
fn alias_and_postfix_loops_parse_as_statements() {
    assert!(matches!(parse_one("alias a b"), Expr::Alias { .. }));
    assert!(matches!(parse_one("a until b"), Expr::PostfixLoop { .. }));
    assert!(matches!(parse_one("a while b"), Expr::PostfixLoop { .. }));
}

#[test]
fn word_operators_chain_left_associative() {
    let Expr::WordBinary { left, .. } = parse_one("1 and 2 and 3") else {
        panic!("expected a word-op chain");
    };
    assert!(matches!(*left, Expr::WordBinary { .. }));
}

#[test]
fn if_with_semicolon_separator_and_else_branch() {
    let Expr::If { then_body, else_body, .. } = parse_one("if x; y else z end") else {
        panic!("expected an if");
    };
    assert_eq!(then_body.len(), 1);
    assert_eq!(else_body.as_ref().map(Vec::len), Some(1));
}

#[test]
fn nullary_keywords_parse_standalone() {
    for src in ["__FILE__", "__LINE__", "__ENCODING__", "redo", "retry", "self"] {
        assert!(
            matches!(parse_one(src), Expr::NullaryKeyword(_)),
            "expected {src} to parse as a nullary keyword"
        );
    }
}

#[test]
fn literal_forms_parse_as_literals() {
    for src in [
        "\"x\"", ":x", "1", "1.2", "1i", "1r", "{}", "[]", "nil", "true", "false", "/re/",
    ] {
        assert!(
            matches!(parse_one(src), Expr::Literal(_)),
            "expected {src} to parse as a literal"
        );
    }
}
