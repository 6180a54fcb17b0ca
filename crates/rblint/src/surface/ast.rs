use crate::diagnostics::Span;

#[derive(Debug, Clone)]
pub struct SpannedName {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Literal {
    Number {
        text: String,
        span: Span,
    },
    Str {
        text: String,
        interpolated: bool,
        span: Span,
    },
    Symbol {
        text: String,
        interpolated: bool,
        span: Span,
    },
    Regexp {
        text: String,
        span: Span,
    },
    Array {
        items: Vec<Expr>,
        span: Span,
    },
    Hash {
        span: Span,
    },
    Nil {
        span: Span,
    },
    Bool {
        value: bool,
        span: Span,
    },
}

impl Literal {
    pub fn span(&self) -> Span {
        match self {
            Literal::Number { span, .. }
            | Literal::Str { span, .. }
            | Literal::Symbol { span, .. }
            | Literal::Regexp { span, .. }
            | Literal::Array { span, .. }
            | Literal::Hash { span }
            | Literal::Nil { span }
            | Literal::Bool { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Break,
    Next,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardKind {
    Super,
    Yield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    While,
    Until,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordOp {
    And,
    Or,
}

/// How arguments were written at the call or keyword site. The rule's
/// verdicts hinge on this: bare argument lists make surrounding parens
/// load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgStyle {
    None,
    Parenthesized,
    Bare,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    Lvar(SpannedName),
    Ivar(SpannedName),
    Cvar(SpannedName),
    Gvar(SpannedName),
    Const(SpannedName),
    /// `self`, `__FILE__`, `__LINE__`, `__ENCODING__`, `redo`, `retry`.
    NullaryKeyword(SpannedName),
    Jump {
        kind: JumpKind,
        args: Vec<Expr>,
        style: ArgStyle,
        span: Span,
    },
    Forward {
        kind: ForwardKind,
        args: Vec<Expr>,
        style: ArgStyle,
        span: Span,
    },
    Defined {
        arg: Box<Expr>,
        parenthesized: bool,
        span: Span,
    },
    Call {
        receiver: Option<Box<Expr>>,
        name: SpannedName,
        args: Vec<Expr>,
        style: ArgStyle,
        span: Span,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    Range {
        exclusive: bool,
        lo: Box<Expr>,
        hi: Box<Expr>,
        span: Span,
    },
    WordBinary {
        op: WordOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Not {
        operand: Box<Expr>,
        span: Span,
    },
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Assign {
        target: SpannedName,
        value: Box<Expr>,
        span: Span,
    },
    Alias {
        new_name: SpannedName,
        old_name: SpannedName,
        span: Span,
    },
    PostfixLoop {
        kind: LoopKind,
        body: Box<Expr>,
        cond: Box<Expr>,
        span: Span,
    },
    If {
        cond: Box<Expr>,
        then_body: Vec<Expr>,
        else_body: Option<Vec<Expr>>,
        span: Span,
    },
    /// One expression enclosed by exactly one matching paren pair.
    Paren {
        open: Span,
        close: Span,
        inner: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Lvar(name)
            | Expr::Ivar(name)
            | Expr::Cvar(name)
            | Expr::Gvar(name)
            | Expr::Const(name)
            | Expr::NullaryKeyword(name) => name.span,
            Expr::Jump { span, .. }
            | Expr::Forward { span, .. }
            | Expr::Defined { span, .. }
            | Expr::Call { span, .. }
            | Expr::Index { span, .. }
            | Expr::Range { span, .. }
            | Expr::WordBinary { span, .. }
            | Expr::Not { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Assign { span, .. }
            | Expr::Alias { span, .. }
            | Expr::PostfixLoop { span, .. }
            | Expr::If { span, .. }
            | Expr::Paren { span, .. } => *span,
        }
    }
}
