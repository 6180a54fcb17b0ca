mod cst;
mod diagnostics;
mod lexer;
mod rules;
mod surface;
mod syntax;

pub use cst::CstToken;
pub use diagnostics::{
    position_at, render_diagnostic, render_diagnostics, Diagnostic, Position, Span,
};
pub use lexer::{filter_tokens, lex, Token, TokenKind};
pub use rules::{apply_edits, check_stmts, correct, Offense, TextEdit};
pub use surface::{
    parse_program, ArgStyle, Expr, ForwardKind, JumpKind, Literal, LoopKind, SpannedName, WordOp,
};

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    pub offenses: Vec<Offense>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lint one source text. When the lexer or parser reports diagnostics the
/// rule does not run: edits derived from a misparsed tree could corrupt
/// unrelated text.
pub fn lint_text(src: &str) -> (Vec<Offense>, Vec<Diagnostic>) {
    let (cst, mut diagnostics) = lex(src);
    let tokens = filter_tokens(&cst);
    let (stmts, parse_diagnostics) = parse_program(&tokens);
    diagnostics.extend(parse_diagnostics);
    if !diagnostics.is_empty() {
        return (Vec::new(), diagnostics);
    }
    (check_stmts(&stmts, &cst), diagnostics)
}

/// Collect offenses against the immutable source, then apply the paired
/// deletions in one pass. Unparsable input is returned untouched.
pub fn autocorrect_text(src: &str) -> (String, Vec<Offense>) {
    let (offenses, diagnostics) = lint_text(src);
    if !diagnostics.is_empty() {
        return (src.to_string(), Vec::new());
    }
    let edits: Vec<TextEdit> = offenses.iter().flat_map(correct).collect();
    (apply_edits(src, &edits), offenses)
}

pub fn lint_file(path: &Path) -> Result<FileReport, LintError> {
    let content = fs::read_to_string(path)?;
    let (offenses, diagnostics) = lint_text(&content);
    Ok(FileReport {
        path: path.display().to_string(),
        offenses,
        diagnostics,
    })
}

/// Lint a file, or every `.rb` file under a directory.
pub fn lint_target(target: &str) -> Result<Vec<FileReport>, LintError> {
    let path = Path::new(target);
    if path.is_file() {
        return Ok(vec![lint_file(path)?]);
    }
    if !path.is_dir() {
        return Err(LintError::InvalidPath(target.to_string()));
    }

    let mut paths = Vec::new();
    collect_files(path, &mut paths)?;
    paths.sort();
    if paths.is_empty() {
        return Err(LintError::InvalidPath(target.to_string()));
    }

    let mut reports = Vec::new();
    for path in paths {
        reports.push(lint_file(&path)?);
    }
    Ok(reports)
}

fn collect_files(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), LintError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let entry_path = entry.path();
        if entry_path.is_dir() {
            collect_files(&entry_path, paths)?;
            continue;
        }

        if entry_path.extension().and_then(|ext| ext.to_str()) == Some("rb") {
            paths.push(entry_path);
        }
    }
    Ok(())
}

pub fn reports_to_json(reports: &[FileReport]) -> Result<String, LintError> {
    Ok(serde_json::to_string_pretty(reports)?)
}

pub fn render_offenses(path: &str, src: &str, offenses: &[Offense]) -> String {
    let mut output = String::new();
    for (index, offense) in offenses.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        let pos = position_at(src, offense.span.start);
        output.push_str(&format!(
            "{}:{}:{} {}",
            path, pos.line, pos.column, offense.message
        ));
    }
    output
}
