use serde::Serialize;

use crate::diagnostics::Span;

/// Lossless token: whitespace and comments included, so span adjacency
/// against the original text can be answered exactly.
#[derive(Debug, Clone, Serialize)]
pub struct CstToken {
    pub kind: String,
    pub text: String,
    pub span: Span,
}
