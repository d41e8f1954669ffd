//! Text normalization applied before parsing and after rendering.
//!
//! Normalization is a pure, idempotent text-to-text pass with three steps
//! applied strictly in order:
//!
//! 1. every `"\r\n"` and lone `"\r"` becomes `"\n"`;
//! 2. every maximal run of two or more `"\n"` collapses to a single `"\n"`;
//! 3. the text ends with exactly one `"\n"` (one is appended iff missing).
//!
//! The pipeline applies it to raw input text before it reaches the parser
//! and to the rendered output of every visitor as the final step.

/// Normalize line endings, blank lines, and the end of the text.
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)` for all `s`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        let ch = match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                '\n'
            }
            other => other,
        };
        // Collapse newline runs as they are produced.
        if ch == '\n' && out.ends_with('\n') {
            continue;
        }
        out.push(ch);
    }

    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
