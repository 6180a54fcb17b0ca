use std::fs;

use rblint::{lint_file, lint_target, render_offenses, reports_to_json, LintError};

#[test]
fn lint_file_reports_offenses_with_the_file_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("a.rb");
    fs::write(&path, "(1)\n").expect("write");

    let report = lint_file(&path).expect("lint");
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.offenses.len(), 1);
    assert!(report.path.ends_with("a.rb"));
}

#[test]
fn lint_target_walks_directories_for_rb_files_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.rb"), "(1)\n").expect("write");
    fs::create_dir(dir.path().join("sub")).expect("mkdir");
    fs::write(dir.path().join("sub").join("b.rb"), "x = 1; (x)\n").expect("write");
    fs::write(dir.path().join("notes.txt"), "(not ruby)\n").expect("write");

    let reports = lint_target(&dir.path().display().to_string()).expect("lint");
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.path.ends_with(".rb")));
    let total: usize = reports.iter().map(|r| r.offenses.len()).sum();
    assert_eq!(total, 2);
}

#[test]
fn lint_target_rejects_missing_paths() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope");
    let err = lint_target(&missing.display().to_string()).unwrap_err();
    assert!(matches!(err, LintError::InvalidPath(_)), "got: {err}");
}

#[test]
fn reports_serialize_to_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("a.rb");
    fs::write(&path, "(nil)\n").expect("write");

    let report = lint_file(&path).expect("lint");
    let json = reports_to_json(&[report]).expect("json");
    assert!(json.contains("Don't use parentheses around a literal."));
    assert!(json.contains("\"span\""));
}

#[test]
fn render_offenses_prints_line_and_column() {
    let src = "x = 1\n(x)\n";
    let (offenses, diagnostics) = rblint::lint_text(src);
    assert!(diagnostics.is_empty(), "diagnostics: {diagnostics:?}");
    let rendered = render_offenses("lib/a.rb", src, &offenses);
    assert_eq!(
        rendered,
        "lib/a.rb:2:1 Don't use parentheses around a variable."
    );
}
