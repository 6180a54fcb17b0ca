#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Keep inputs small; the interesting behavior is structural, not size.
    if data.len() > 64 * 1024 {
        return;
    }
    let src = String::from_utf8_lossy(data);
    let (offenses, diagnostics) = rblint::lint_text(&src);
    if !diagnostics.is_empty() {
        return;
    }

    // Corrections collected against the immutable source must yield text
    // that still lexes and parses, and every edit must stay in bounds.
    for offense in &offenses {
        assert!(offense.span.end <= src.len());
    }
    let (fixed, _) = rblint::autocorrect_text(&src);
    let _ = rblint::lint_text(&fixed);
});
