//! Diagnostic formatting with source-line excerpts.
//!
//! Each diagnostic renders as a header line and, when the reported line
//! exists in the document, a two-line excerpt: the offending source line and
//! a caret pointing at the reported column. The source text is re-read from
//! the file rather than taken from the parsed document, because the parsed
//! representation may normalize whitespace and entities; excerpts must show
//! the bytes the author wrote.

use std::fs;
use std::path::Path;

use crate::libxml2::Diagnostic;

/// The document's text split into 1-based lines for excerpting.
///
/// Line numbers are only meaningful while the file on disk matches the
/// content the validator parsed; a mid-run rewrite of the file shows a stale
/// excerpt, which is accepted rather than detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLines {
    lines: Vec<String>,
}

impl SourceLines {
    /// Read the file with permissive decoding; undecodable byte sequences
    /// are replaced, never fatal. Returns `None` when the file cannot be
    /// read at all, in which case callers fall back to headers without
    /// excerpts — a formatting problem must not mask the validation result.
    pub fn from_path(path: &Path) -> Option<Self> {
        let bytes = fs::read(path).ok()?;
        Some(Self::from_text(&String::from_utf8_lossy(&bytes)))
    }

    pub fn from_text(text: &str) -> Self {
        SourceLines {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Fetch a line by its 1-based number; `None` when out of range.
    pub fn get(&self, line: i32) -> Option<&str> {
        if line < 1 {
            return None;
        }
        self.lines.get(line as usize - 1).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Render one block per diagnostic, in the given order, without dedup.
///
/// Pass `None` for `source` when the document could not be re-read; every
/// block then degrades to its header line.
pub fn format_diagnostics(diagnostics: &[Diagnostic], source: Option<&SourceLines>) -> Vec<String> {
    diagnostics
        .iter()
        .map(|d| format_diagnostic(d, source))
        .collect()
}

/// Render a single diagnostic block.
///
/// The header prints line and column exactly as the engine reported them,
/// including 0 for unlocalized errors. The caret sits after
/// `max(column - 1, 0)` spaces, so columns 0 and 1 both mark the first
/// character; a column past the end of the line is not clamped and the
/// caret simply lands beyond the visible text.
pub fn format_diagnostic(diagnostic: &Diagnostic, source: Option<&SourceLines>) -> String {
    let mut block = format!(
        "Line {}, column {}: {}",
        diagnostic.line, diagnostic.column, diagnostic.message
    );

    if let Some(text) = source.and_then(|s| s.get(diagnostic.line)) {
        let padding = diagnostic.column.max(1) as usize - 1;
        block.push('\n');
        block.push_str(text);
        block.push('\n');
        block.push_str(&" ".repeat(padding));
        block.push('^');
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(line: i32, column: i32, message: &str) -> Diagnostic {
        Diagnostic {
            line,
            column,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_pointer_position() {
        let source = SourceLines::from_text("<a><b></a>");
        let block = format_diagnostic(&diag(1, 5, "mismatch"), Some(&source));
        assert_eq!(block, "Line 1, column 5: mismatch\n<a><b></a>\n    ^");
    }

    #[test]
    fn test_columns_zero_and_one_both_mark_first_character() {
        let source = SourceLines::from_text("<root/>");
        let at_zero = format_diagnostic(&diag(1, 0, "m"), Some(&source));
        let at_one = format_diagnostic(&diag(1, 1, "m"), Some(&source));
        assert!(at_zero.ends_with("\n^"));
        assert!(at_one.ends_with("\n^"));
    }

    #[test]
    fn test_column_past_line_end_is_not_clamped() {
        let source = SourceLines::from_text("<a/>");
        let block = format_diagnostic(&diag(1, 10, "far"), Some(&source));
        let pointer = block.lines().last().unwrap();
        assert_eq!(pointer, format!("{}^", " ".repeat(9)));
    }

    #[test]
    fn test_out_of_range_line_yields_header_only() {
        let source = SourceLines::from_text("<a/>\n<b/>");

        for line in [0, -1, 3, 1000] {
            let block = format_diagnostic(&diag(line, 4, "somewhere else"), Some(&source));
            assert_eq!(
                block,
                format!("Line {}, column 4: somewhere else", line)
            );
        }
    }

    #[test]
    fn test_missing_source_yields_header_only() {
        let block = format_diagnostic(&diag(2, 7, "no excerpt available"), None);
        assert_eq!(block, "Line 2, column 7: no excerpt available");
    }

    #[test]
    fn test_header_prints_location_exactly_as_reported() {
        let block = format_diagnostic(&diag(0, 0, "document-wide problem"), None);
        assert_eq!(block, "Line 0, column 0: document-wide problem");
    }

    #[test]
    fn test_trailing_whitespace_preserved_in_excerpt() {
        let source = SourceLines::from_text("<a>   \n<b/>");
        let block = format_diagnostic(&diag(1, 2, "m"), Some(&source));
        let excerpt = block.lines().nth(1).unwrap();
        assert_eq!(excerpt, "<a>   ");
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let source = SourceLines::from_text("<a/>");
        let diagnostics = vec![
            diag(1, 2, "second reported first"),
            diag(1, 1, "first reported second"),
            diag(1, 2, "second reported first"),
        ];

        let blocks = format_diagnostics(&diagnostics, Some(&source));
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].starts_with("Line 1, column 2"));
        assert!(blocks[1].starts_with("Line 1, column 1"));
        assert_eq!(blocks[0], blocks[2]);
    }

    #[test]
    fn test_crlf_line_endings_stripped() {
        let source = SourceLines::from_text("<a/>\r\n<b/>\r\n");
        assert_eq!(source.get(1), Some("<a/>"));
        assert_eq!(source.get(2), Some("<b/>"));
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn test_lossy_decoding_never_fails() {
        let text = String::from_utf8_lossy(b"<a>\xff\xfe</a>\n<b/>");
        let source = SourceLines::from_text(&text);
        assert_eq!(source.len(), 2);
        assert!(source.get(1).unwrap().starts_with("<a>"));
    }

    #[test]
    fn test_source_lines_from_missing_file() {
        assert_eq!(
            SourceLines::from_path(Path::new("/nonexistent/document.xml")),
            None
        );
    }
}
