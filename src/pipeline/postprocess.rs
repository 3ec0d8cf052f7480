//! Post-processing: escape inequality operators inside math spans.
//!
//! Recognised formulas frequently contain `<` and `>`. Once the combined
//! Markdown is rendered to HTML, a bare `<` starts a tag and silently
//! swallows formula content. Rewriting inequalities to their TeX commands
//! (`\le`, `\ge`, `\lt`, `\gt`) inside math delimiters keeps the formulas
//! intact without touching prose outside the spans.
//!
//! Four delimiter classes are handled in fixed order: `$$…$$`, `$…$`,
//! `\[…\]`, `\(…\)`. Each class is a separate pass over the whole text;
//! overlapping spans (an inline span inside a display span) are not
//! de-duplicated. That layering is deliberate — the substitutions are
//! idempotent, so a second pass over already-escaped content is a no-op.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static MATH_SPANS: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        Regex::new(r"(?s)\$\$(.+?)\$\$").unwrap(),
        Regex::new(r"\$([^$]+?)\$").unwrap(),
        Regex::new(r"(?s)\\\[(.+?)\\\]").unwrap(),
        Regex::new(r"(?s)\\\((.+?)\\\)").unwrap(),
    ]
});

/// Escape `<`/`>` operators inside math spans. Idempotent.
pub fn escape_math_inequalities(markdown: &str) -> String {
    let mut out = markdown.to_string();
    for span in MATH_SPANS.iter() {
        out = span
            .replace_all(&out, |caps: &Captures<'_>| {
                let whole = &caps[0];
                let inner = &caps[1];
                whole.replace(inner, &fix_inequalities(inner))
            })
            .into_owned();
    }
    out
}

/// Substitutions in priority order: compound operators first so `<=` never
/// degrades into `\lt =`. The `≤`/`≥` forms arrive pre-composed from the
/// recognition model and map to the same commands.
fn fix_inequalities(s: &str) -> String {
    s.replace("<=", r" \le ")
        .replace(">=", r" \ge ")
        .replace('≤', r" \le ")
        .replace('≥', r" \ge ")
        .replace('<', r" \lt ")
        .replace('>', r" \gt ")
}
