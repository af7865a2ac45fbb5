//! Line scanning primitives: document splitting, keyword anchoring,
//! indentation scopes, and the continuation state machine.
//!
//! The reader never mutates its line buffer; everything in this module
//! operates over an index into an immutable slice of lines, returning the
//! position at which the caller should resume scanning. This keeps the three
//! continuation styles independently testable and keeps scope tracking out
//! of loop-local flags.

/// Literal line that separates documents within one file.
pub(crate) const DOCUMENT_SEPARATOR: &str = "---";

/// State of the line scanner.
///
/// `Scanning` means the cursor sits outside any continuation block. The
/// other three states are entered when a value token consists solely of the
/// corresponding sigil:
///
/// - `^` → [`Verbatim`]: the value is the single next line, taken as stored.
/// - `|` → [`Literal`]: the value is every in-scope line joined with
///   newlines, each stripped of its leading indentation.
/// - `>` → [`Folded`]: same consumption as `Literal`, but lines are joined
///   with single spaces and the result is right-trimmed.
///
/// [`Verbatim`]: ScanState::Verbatim
/// [`Literal`]: ScanState::Literal
/// [`Folded`]: ScanState::Folded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanState {
    Scanning,
    Verbatim,
    Literal,
    Folded,
}

impl ScanState {
    /// Classify a value token. Anything other than a lone sigil stays in
    /// `Scanning`.
    pub(crate) fn from_token(token: &str) -> ScanState {
        match token {
            "^" => ScanState::Verbatim,
            "|" => ScanState::Literal,
            ">" => ScanState::Folded,
            _ => ScanState::Scanning,
        }
    }
}

/// A resolved continuation block: the assembled text plus the index of the
/// first line the outer scan should re-examine.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub(crate) text: String,
    pub(crate) next: usize,
}

/// Number of leading whitespace characters on a line.
pub(crate) fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Split the line buffer into documents on the `---` separator.
///
/// A file without a separator is a single document spanning every line.
pub(crate) fn split_documents(lines: &[String]) -> Vec<&[String]> {
    let mut documents = Vec::new();
    let mut start = 0;

    for (i, line) in lines.iter().enumerate() {
        if line == DOCUMENT_SEPARATOR {
            documents.push(&lines[start..i]);
            start = i + 1;
        }
    }
    documents.push(&lines[start..]);
    documents
}

/// Test whether a line anchors the keyword, returning the value text after
/// the keyword (left-trimmed) on a match.
///
/// Matching is a prefix test on the left-trimmed line, with one boundary
/// requirement: the character immediately after the keyword must be
/// whitespace, or the line must end there. A bare prefix of a longer token
/// does not anchor.
pub(crate) fn match_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Locate the first line in the document that anchors the keyword.
///
/// Returns the line index and the value text following the keyword.
pub(crate) fn find_anchor<'a>(doc: &'a [String], keyword: &str) -> Option<(usize, &'a str)> {
    doc.iter()
        .enumerate()
        .find_map(|(i, line)| match_keyword(line, keyword).map(|value| (i, value)))
}

/// Resolve a continuation block starting at `start`, scoped to lines whose
/// indentation strictly exceeds `anchor_indent`.
///
/// The first line at or above the anchor's indentation is not consumed; it
/// is left for the outer scan to re-examine. End of document terminates any
/// active state. Calling this in `Scanning` state is a logic error and
/// yields an empty block.
pub(crate) fn resolve_continuation(
    doc: &[String],
    start: usize,
    anchor_indent: usize,
    state: ScanState,
) -> Resolved {
    match state {
        ScanState::Scanning => Resolved {
            text: String::new(),
            next: start,
        },
        ScanState::Verbatim => {
            let text = doc.get(start).cloned().unwrap_or_default();
            Resolved {
                text,
                next: (start + 1).min(doc.len()),
            }
        }
        ScanState::Literal | ScanState::Folded => {
            let mut collected: Vec<&str> = Vec::new();
            let mut pos = start;
            while pos < doc.len() && indent_of(&doc[pos]) > anchor_indent {
                collected.push(doc[pos].trim_start());
                pos += 1;
            }
            let text = if state == ScanState::Literal {
                collected.join("\n")
            } else {
                collected.join(" ").trim_end().to_string()
            };
            Resolved { text, next: pos }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_indent_of() {
        assert_eq!(indent_of("no indent"), 0);
        assert_eq!(indent_of("  two"), 2);
        assert_eq!(indent_of("    four"), 4);
        assert_eq!(indent_of(""), 0);
    }

    #[test]
    fn test_split_no_separator_is_one_document() {
        let buf = lines(&["a: 1", "b: 2"]);
        let docs = split_documents(&buf);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].len(), 2);
    }

    #[test]
    fn test_split_on_separator() {
        let buf = lines(&["a: 1", "---", "b: 2", "---", "c: 3"]);
        let docs = split_documents(&buf);
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0], &["a: 1".to_string()][..]);
        assert_eq!(docs[1], &["b: 2".to_string()][..]);
        assert_eq!(docs[2], &["c: 3".to_string()][..]);
    }

    #[test]
    fn test_split_trailing_separator_yields_empty_document() {
        let buf = lines(&["a: 1", "---"]);
        let docs = split_documents(&buf);
        assert_eq!(docs.len(), 2);
        assert!(docs[1].is_empty());
    }

    #[test]
    fn test_match_keyword_basic() {
        assert_eq!(match_keyword("flag: yes", "flag:"), Some("yes"));
        assert_eq!(match_keyword("  flag: yes", "flag:"), Some("yes"));
        assert_eq!(match_keyword("flag:", "flag:"), Some(""));
    }

    #[test]
    fn test_match_keyword_requires_boundary() {
        // A keyword that is a textual prefix of a longer token must not match.
        assert_eq!(match_keyword("Float List: 1.1", "Float"), Some("List: 1.1"));
        assert_eq!(match_keyword("Floating: 1.1", "Float"), None);
        assert_eq!(match_keyword("flag:yes", "flag:"), None);
    }

    #[test]
    fn test_find_anchor_picks_first_match() {
        let buf = lines(&["other: 1", "key: first", "key: second"]);
        let (idx, value) = find_anchor(&buf, "key:").unwrap();
        assert_eq!(idx, 1);
        assert_eq!(value, "first");
    }

    #[test]
    fn test_find_anchor_missing() {
        let buf = lines(&["a: 1"]);
        assert!(find_anchor(&buf, "missing:").is_none());
    }

    #[test]
    fn test_scan_state_from_token() {
        assert_eq!(ScanState::from_token("^"), ScanState::Verbatim);
        assert_eq!(ScanState::from_token("|"), ScanState::Literal);
        assert_eq!(ScanState::from_token(">"), ScanState::Folded);
        assert_eq!(ScanState::from_token("plain"), ScanState::Scanning);
        assert_eq!(ScanState::from_token("||"), ScanState::Scanning);
        assert_eq!(ScanState::from_token(""), ScanState::Scanning);
    }

    #[test]
    fn test_verbatim_takes_single_next_line() {
        let buf = lines(&["key: ^", "  kept as stored", "  not taken"]);
        let resolved = resolve_continuation(&buf, 1, 0, ScanState::Verbatim);
        assert_eq!(resolved.text, "  kept as stored");
        assert_eq!(resolved.next, 2);
    }

    #[test]
    fn test_verbatim_at_end_of_document() {
        let buf = lines(&["key: ^"]);
        let resolved = resolve_continuation(&buf, 1, 0, ScanState::Verbatim);
        assert_eq!(resolved.text, "");
        assert_eq!(resolved.next, 1);
    }

    #[test]
    fn test_literal_preserves_line_breaks() {
        let buf = lines(&[
            "Multi Sentence: |",
            "  This is a multiline sentence,",
            "  there is no reason to worry!",
            "Next: 1",
        ]);
        let resolved = resolve_continuation(&buf, 1, 0, ScanState::Literal);
        assert_eq!(
            resolved.text,
            "This is a multiline sentence,\nthere is no reason to worry!"
        );
        // The terminating line is left for the outer scan.
        assert_eq!(resolved.next, 3);
    }

    #[test]
    fn test_folded_joins_with_spaces() {
        let buf = lines(&[
            "Multi Sentence: >",
            "  This is a multiline sentence,",
            "  there is no reason to worry!",
        ]);
        let resolved = resolve_continuation(&buf, 1, 0, ScanState::Folded);
        assert_eq!(
            resolved.text,
            "This is a multiline sentence, there is no reason to worry!"
        );
        assert_eq!(resolved.next, 3);
    }

    #[test]
    fn test_block_stops_at_anchor_indentation() {
        let buf = lines(&["key: |", "    deep", "  shallower", "outside"]);
        // Anchor indentation of 2: only the 4-space line is in scope.
        let resolved = resolve_continuation(&buf, 1, 2, ScanState::Literal);
        assert_eq!(resolved.text, "deep");
        assert_eq!(resolved.next, 2);
    }

    #[test]
    fn test_block_terminated_by_end_of_document() {
        let buf = lines(&["key: |", "  one", "  two"]);
        let resolved = resolve_continuation(&buf, 1, 0, ScanState::Literal);
        assert_eq!(resolved.text, "one\ntwo");
        assert_eq!(resolved.next, 3);
    }

    #[test]
    fn test_scanning_state_resolves_to_empty() {
        let buf = lines(&["a", "b"]);
        let resolved = resolve_continuation(&buf, 1, 0, ScanState::Scanning);
        assert_eq!(resolved.text, "");
        assert_eq!(resolved.next, 1);
    }
}
