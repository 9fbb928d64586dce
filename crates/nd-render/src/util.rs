//! Small shared helpers.

/// Maximum length of a sanitized file name stem.
const MAX_STEM_LEN: usize = 100;

/// Characters that may not appear in file names on common filesystems.
const ILLEGAL: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Derive a filesystem-safe file name stem from a page title.
///
/// Illegal characters and spaces become `-`, runs of dashes collapse to one,
/// leading/trailing dashes are trimmed, and the result is capped at 100
/// characters. An empty or all-illegal title yields "Untitled".
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_dash = true; // suppress leading dashes
    for ch in title.trim().chars() {
        let mapped = if ILLEGAL.contains(&ch) || ch == ' ' {
            '-'
        } else {
            ch
        };
        if mapped == '-' {
            if !last_dash {
                out.push('-');
            }
            last_dash = true;
        } else {
            out.push(mapped);
            last_dash = false;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    let stem: String = out.chars().take(MAX_STEM_LEN).collect();
    if stem.is_empty() {
        "Untitled".to_owned()
    } else {
        stem
    }
}

/// Indent every non-empty line of `text` by one unit (two spaces).
#[must_use]
pub fn indent_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if line.trim_end_matches('\n').is_empty() {
            out.push_str(line);
        } else {
            out.push_str("  ");
            out.push_str(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_sanitize_plain_title() {
        assert_eq!(sanitize_title("Hello World"), "Hello-World");
    }

    #[test]
    fn test_sanitize_illegal_characters() {
        assert_eq!(sanitize_title(r#"a<b>c:d"e/f\g|h?i*j"#), "a-b-c-d-e-f-g-h-i-j");
    }

    #[test]
    fn test_sanitize_collapses_dashes() {
        assert_eq!(sanitize_title("a // b"), "a-b");
    }

    #[test]
    fn test_sanitize_trims_edges() {
        assert_eq!(sanitize_title("  ?spaced?  "), "spaced");
    }

    #[test]
    fn test_sanitize_empty_yields_untitled() {
        assert_eq!(sanitize_title(""), "Untitled");
        assert_eq!(sanitize_title("///"), "Untitled");
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "x".repeat(300);
        assert_eq!(sanitize_title(&long).len(), 100);
    }

    #[test]
    fn test_indent_lines() {
        assert_eq!(indent_lines("a\nb\n"), "  a\n  b\n");
    }

    #[test]
    fn test_indent_lines_keeps_blank_lines_bare() {
        assert_eq!(indent_lines("a\n\nb\n"), "  a\n\n  b\n");
    }
}
