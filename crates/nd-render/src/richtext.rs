//! Inline Markdown for annotated text runs.

use crate::model::TextRun;

/// Render a sequence of rich-text runs as inline Markdown.
///
/// Annotations wrap in a fixed order, code backticks innermost, then bold,
/// italic, and strikethrough, so combined annotations always compose into
/// valid emphasis syntax (`bold + italic` is `***text***`). A run with an
/// `href` is wrapped in link syntax last, with the URL emitted verbatim.
/// Runs concatenate with no separator; empty input yields an empty string.
#[must_use]
pub fn render_runs(runs: &[TextRun]) -> String {
    let mut out = String::new();
    for run in runs {
        let mut text = run.plain_text.clone();
        if run.annotations.code {
            text = format!("`{text}`");
        }
        if run.annotations.bold {
            text = format!("**{text}**");
        }
        if run.annotations.italic {
            text = format!("*{text}*");
        }
        if run.annotations.strikethrough {
            text = format!("~~{text}~~");
        }
        if let Some(href) = &run.href {
            text = format!("[{text}]({href})");
        }
        out.push_str(&text);
    }
    out
}

/// Concatenate the plain text of runs, ignoring annotations and links.
///
/// Used for code fences, where emphasis markers would be literal noise.
#[must_use]
pub fn plain_text(runs: &[TextRun]) -> String {
    runs.iter().map(|r| r.plain_text.as_str()).collect()
}
