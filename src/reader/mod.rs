//! Keyword-anchored reading of structured text files.
//!
//! This module provides [`KeywordReader`], which loads a text file into an
//! immutable line buffer and extracts typed scalars, lists, and dictionaries
//! anchored to caller-supplied keywords. Files may hold several documents
//! separated by `---` lines; every read selects one document and scans it
//! top to bottom.
//!
//! The grammar is deliberately small: it is not a YAML parser. A keyword
//! anchors the first line whose left-trimmed text starts with it, the lines
//! indented deeper than the anchor form its scope, and three single-character
//! sigils (`^`, `|`, `>`) introduce verbatim, literal, and folded multi-line
//! string values.
//!
//! # Example
//!
//! ```no_run
//! use keyquill::reader::KeywordReader;
//!
//! let reader = KeywordReader::open("settings.yaml").unwrap();
//! let retries: u32 = reader.read_scalar("Retries:").unwrap();
//! let verbose: bool = reader.read_scalar("Verbose:").unwrap();
//! let hosts: Vec<String> = reader.read_list("Hosts:").unwrap();
//! ```

mod coerce;
mod error;
mod scan;

pub use coerce::FromField;
pub use error::ReadError;

use indexmap::IndexMap;
use scan::{find_anchor, indent_of, resolve_continuation, split_documents, ScanState};
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};

/// Default number of lines rendered by the `Display` impl.
const DEFAULT_PRINT_LINES: usize = 50;

/// A reader over a keyword-structured text file.
///
/// The entire file is read once at construction into a buffer of
/// right-trimmed lines (leading indentation is preserved because it carries
/// scope information). The buffer is never mutated afterwards, so a shared
/// reader is safe for concurrent use and repeated reads with the same
/// arguments always return equal results.
#[derive(Debug)]
pub struct KeywordReader {
    path: PathBuf,
    lines: Vec<String>,
    /// Number of lines shown when the reader is displayed. Defaults to 50
    /// and may be adjusted after construction.
    pub print_lines: usize,
}

impl KeywordReader {
    /// Open a file and load its contents into the line buffer.
    ///
    /// Files ending in `.gz` are transparently decompressed. Trailing
    /// whitespace is stripped from each line; leading whitespace is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::FileNotFound`] if the path does not name an
    /// existing file, and [`ReadError::Io`] if the file cannot be read,
    /// decompressed, or decoded as UTF-8.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        let path_ref = path.as_ref();
        if !path_ref.is_file() {
            return Err(ReadError::FileNotFound {
                path: path_ref.display().to_string(),
            });
        }

        let is_gzipped = path_ref
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == "gz")
            .unwrap_or(false);

        let content = if is_gzipped {
            read_gzipped_file(path_ref)?
        } else {
            fs::read_to_string(path_ref).map_err(|e| ReadError::Io {
                path: path_ref.display().to_string(),
                message: e.to_string(),
            })?
        };

        let lines = content
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect();

        Ok(Self {
            path: path_ref.to_path_buf(),
            lines,
            print_lines: DEFAULT_PRINT_LINES,
        })
    }

    /// Sets the number of lines the `Display` impl renders.
    ///
    /// ```no_run
    /// use keyquill::reader::KeywordReader;
    ///
    /// let reader = KeywordReader::open("settings.yaml")
    ///     .unwrap()
    ///     .with_print_lines(2);
    /// println!("{}", reader);
    /// ```
    pub fn with_print_lines(mut self, print_lines: usize) -> Self {
        self.print_lines = print_lines;
        self
    }

    /// The path this reader was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of `---`-separated documents in the file.
    ///
    /// A file without a separator has exactly one document, at index 0.
    pub fn document_count(&self) -> usize {
        split_documents(&self.lines).len()
    }

    /// Read the value to the right of `keyword` in the first document,
    /// coerced to `T`.
    ///
    /// The anchor is the first line whose left-trimmed text starts with the
    /// keyword followed by whitespace or end of line; matching is
    /// case-sensitive. For string targets, a value consisting solely of
    /// `^`, `|`, or `>` is resolved as a multi-line continuation over the
    /// lines indented deeper than the anchor.
    ///
    /// # Example
    ///
    /// Given a file containing `Double Value: 1.11111187`:
    ///
    /// ```no_run
    /// use keyquill::reader::KeywordReader;
    ///
    /// let reader = KeywordReader::open("settings.txt").unwrap();
    /// let value: f64 = reader.read_scalar("Double Value:").unwrap();
    /// assert_eq!(value, 1.11111187);
    /// ```
    ///
    /// # Errors
    ///
    /// [`ReadError::KeywordNotFound`] if no line anchors the keyword, and
    /// [`ReadError::Coercion`] if the value text does not convert to `T`.
    pub fn read_scalar<T: FromField>(&self, keyword: &str) -> Result<T, ReadError> {
        self.read_scalar_from(keyword, 0)
    }

    /// Like [`read_scalar`](Self::read_scalar), but selecting the document
    /// at `doc_index`.
    ///
    /// # Errors
    ///
    /// [`ReadError::DocumentIndex`] when `doc_index` is at or beyond the
    /// document count, in addition to the errors of `read_scalar`.
    pub fn read_scalar_from<T: FromField>(
        &self,
        keyword: &str,
        doc_index: usize,
    ) -> Result<T, ReadError> {
        let doc = self.document(doc_index)?;
        let (anchor, value) = find_anchor(doc, keyword).ok_or_else(|| {
            ReadError::KeywordNotFound {
                keyword: keyword.to_string(),
            }
        })?;

        if T::MULTILINE {
            let state = ScanState::from_token(value);
            if state != ScanState::Scanning {
                let resolved =
                    resolve_continuation(doc, anchor + 1, indent_of(&doc[anchor]), state);
                return T::from_field(&resolved.text);
            }
        }
        T::from_field(value)
    }

    /// Read the dash-prefixed items beneath `keyword` in the first document
    /// as an ordered list of `T`.
    ///
    /// Every line inside the keyword's indentation scope whose left-trimmed
    /// text begins with `-` is one item. An item consisting solely of a
    /// continuation sigil is resolved against the dash line's own
    /// indentation before coercion. Source order is preserved.
    ///
    /// # Errors
    ///
    /// [`ReadError::KeywordNotFound`] if the keyword has no anchor,
    /// [`ReadError::EmptyScope`] if the anchor exists but no dash line
    /// follows within its scope, and [`ReadError::Coercion`] on the first
    /// item that fails to convert.
    pub fn read_list<T: FromField>(&self, keyword: &str) -> Result<Vec<T>, ReadError> {
        self.read_list_from(keyword, 0)
    }

    /// Like [`read_list`](Self::read_list), but selecting the document at
    /// `doc_index`.
    pub fn read_list_from<T: FromField>(
        &self,
        keyword: &str,
        doc_index: usize,
    ) -> Result<Vec<T>, ReadError> {
        let doc = self.document(doc_index)?;
        let (anchor, _) = find_anchor(doc, keyword).ok_or_else(|| ReadError::KeywordNotFound {
            keyword: keyword.to_string(),
        })?;
        let anchor_indent = indent_of(&doc[anchor]);

        let mut items = Vec::new();
        let mut pos = anchor + 1;
        while pos < doc.len() {
            let line = &doc[pos];
            let indent = indent_of(line);
            if indent <= anchor_indent {
                break;
            }
            match line.trim_start().strip_prefix('-') {
                Some(raw) => {
                    let raw = raw.trim();
                    let state = ScanState::from_token(raw);
                    if state != ScanState::Scanning {
                        // Continuations are scoped to the dash line's own
                        // indentation, not the keyword's.
                        let resolved = resolve_continuation(doc, pos + 1, indent, state);
                        items.push(T::from_field(&resolved.text)?);
                        pos = resolved.next;
                    } else {
                        items.push(T::from_field(raw)?);
                        pos += 1;
                    }
                }
                None => pos += 1,
            }
        }

        if items.is_empty() {
            return Err(ReadError::EmptyScope {
                keyword: keyword.to_string(),
            });
        }
        Ok(items)
    }

    /// Read the colon-separated entries beneath `keyword` in the first
    /// document as an insertion-ordered map from `K` to `V`.
    ///
    /// Every line inside the keyword's indentation scope containing a colon
    /// is one entry: text before the first colon is the key, text after it
    /// is the value. A value consisting solely of a continuation sigil is
    /// resolved against the entry line's indentation before coercion.
    ///
    /// Duplicate keys follow a last-write-wins policy: the value is
    /// replaced, and the key keeps its original position in the map.
    ///
    /// # Errors
    ///
    /// Mirrors [`read_list`](Self::read_list): not-found for a missing
    /// anchor, empty-scope when no entry follows, coercion on the first key
    /// or value that fails to convert.
    pub fn read_dict<K, V>(&self, keyword: &str) -> Result<IndexMap<K, V>, ReadError>
    where
        K: FromField + Hash + Eq,
        V: FromField,
    {
        self.read_dict_from(keyword, 0)
    }

    /// Like [`read_dict`](Self::read_dict), but selecting the document at
    /// `doc_index`.
    pub fn read_dict_from<K, V>(
        &self,
        keyword: &str,
        doc_index: usize,
    ) -> Result<IndexMap<K, V>, ReadError>
    where
        K: FromField + Hash + Eq,
        V: FromField,
    {
        let doc = self.document(doc_index)?;
        let (anchor, _) = find_anchor(doc, keyword).ok_or_else(|| ReadError::KeywordNotFound {
            keyword: keyword.to_string(),
        })?;
        let anchor_indent = indent_of(&doc[anchor]);

        let mut entries = IndexMap::new();
        let mut pos = anchor + 1;
        while pos < doc.len() {
            let line = &doc[pos];
            let indent = indent_of(line);
            if indent <= anchor_indent {
                break;
            }
            match line.split_once(':') {
                Some((raw_key, raw_value)) => {
                    let key = K::from_field(raw_key.trim())?;
                    let raw_value = raw_value.trim();
                    let state = ScanState::from_token(raw_value);
                    if state != ScanState::Scanning {
                        let resolved = resolve_continuation(doc, pos + 1, indent, state);
                        entries.insert(key, V::from_field(&resolved.text)?);
                        pos = resolved.next;
                    } else {
                        entries.insert(key, V::from_field(raw_value)?);
                        pos += 1;
                    }
                }
                None => pos += 1,
            }
        }

        if entries.is_empty() {
            return Err(ReadError::EmptyScope {
                keyword: keyword.to_string(),
            });
        }
        Ok(entries)
    }

    /// Read an inline JSON object anchored to `keyword` in the first
    /// document.
    ///
    /// The text after the keyword on every anchoring line is accumulated
    /// until it forms a braced payload, which is then parsed with
    /// `serde_json`. This supports files that mix keyword fields with
    /// embedded JSON snippets.
    pub fn read_inline_json(&self, keyword: &str) -> Result<serde_json::Value, ReadError> {
        self.read_inline_json_from(keyword, 0)
    }

    /// Like [`read_inline_json`](Self::read_inline_json), but selecting the
    /// document at `doc_index`.
    pub fn read_inline_json_from(
        &self,
        keyword: &str,
        doc_index: usize,
    ) -> Result<serde_json::Value, ReadError> {
        let doc = self.document(doc_index)?;
        let mut payload = String::new();
        let mut found = false;

        for line in doc {
            if let Some(rest) = scan::match_keyword(line, keyword) {
                found = true;
                payload.push_str(rest);
                if payload.starts_with('{') && payload.ends_with('}') {
                    return serde_json::from_str(&payload).map_err(|_| ReadError::Coercion {
                        value: payload.clone(),
                        target: "json",
                    });
                }
            }
        }

        if found {
            Err(ReadError::Coercion {
                value: payload,
                target: "json",
            })
        } else {
            Err(ReadError::KeywordNotFound {
                keyword: keyword.to_string(),
            })
        }
    }

    /// Read an inline XML payload anchored to `keyword` in the first
    /// document, deserialized into `T`.
    ///
    /// Accumulation works like [`read_inline_json`](Self::read_inline_json),
    /// except that a candidate payload that fails to deserialize keeps
    /// accumulating until the document ends (closing tags usually arrive on
    /// later anchored lines).
    pub fn read_inline_xml<T: DeserializeOwned>(&self, keyword: &str) -> Result<T, ReadError> {
        self.read_inline_xml_from(keyword, 0)
    }

    /// Like [`read_inline_xml`](Self::read_inline_xml), but selecting the
    /// document at `doc_index`.
    pub fn read_inline_xml_from<T: DeserializeOwned>(
        &self,
        keyword: &str,
        doc_index: usize,
    ) -> Result<T, ReadError> {
        let doc = self.document(doc_index)?;
        let mut payload = String::new();
        let mut found = false;

        for line in doc {
            if let Some(rest) = scan::match_keyword(line, keyword) {
                found = true;
                payload.push_str(rest);
                if payload.starts_with('<') && payload.ends_with('>') {
                    if let Ok(value) = quick_xml::de::from_str(&payload) {
                        return Ok(value);
                    }
                }
            }
        }

        if found {
            Err(ReadError::Coercion {
                value: payload,
                target: "xml",
            })
        } else {
            Err(ReadError::KeywordNotFound {
                keyword: keyword.to_string(),
            })
        }
    }

    /// Select a document by index, or fail with a range error.
    fn document(&self, index: usize) -> Result<&[String], ReadError> {
        let documents = split_documents(&self.lines);
        let count = documents.len();
        documents
            .into_iter()
            .nth(index)
            .ok_or(ReadError::DocumentIndex { index, count })
    }
}

impl fmt::Display for KeywordReader {
    /// Renders at most `print_lines` lines of the buffer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.print_lines.min(self.lines.len());
        write!(f, "{}", self.lines[..shown].join("\n"))
    }
}

/// Reads and decompresses a gzipped file into a string.
fn read_gzipped_file(path: &Path) -> Result<String, ReadError> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let io_err = |e: std::io::Error| ReadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let file = fs::File::open(path).map_err(io_err)?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder.read_to_string(&mut content).map_err(io_err)?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn reader_from(content: &str) -> KeywordReader {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        KeywordReader::open(file.path()).unwrap()
    }

    #[test]
    fn test_open_missing_file() {
        let err = KeywordReader::open("definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ReadError::FileNotFound { .. }));
    }

    #[test]
    fn test_reader_is_debuggable() {
        // `unwrap_err` on Result<KeywordReader, _> needs Debug on the Ok side.
        let reader = reader_from("a: 1\n");
        let rendered = format!("{:?}", reader);
        assert!(rendered.contains("KeywordReader"));
    }

    #[test]
    fn test_lines_are_right_trimmed_only() {
        let reader = reader_from("  indented: 1   \n");
        assert_eq!(reader.to_string(), "  indented: 1");
    }

    #[test]
    fn test_display_honors_print_lines() {
        let mut reader = reader_from("a: 1\nb: 2\nc: 3\n");
        reader.print_lines = 2;
        assert_eq!(reader.to_string(), "a: 1\nb: 2");
    }

    #[test]
    fn test_read_scalar_string() {
        let reader = reader_from("String: Hello\n");
        let value: String = reader.read_scalar("String:").unwrap();
        assert_eq!(value, "Hello");
    }

    #[test]
    fn test_read_scalar_first_match_wins() {
        let reader = reader_from("port: 80\nport: 8080\n");
        let value: u16 = reader.read_scalar("port:").unwrap();
        assert_eq!(value, 80);
    }

    #[test]
    fn test_read_scalar_bool_synonyms() {
        let reader = reader_from("flag: yes\nother: Off\n");
        assert_eq!(reader.read_scalar::<bool>("flag:").unwrap(), true);
        assert_eq!(reader.read_scalar::<bool>("other:").unwrap(), false);
    }

    #[test]
    fn test_read_scalar_bad_bool_is_coercion_error() {
        let reader = reader_from("flag: maybe\n");
        let err = reader.read_scalar::<bool>("flag:").unwrap_err();
        assert!(matches!(err, ReadError::Coercion { .. }));
    }

    #[test]
    fn test_sigil_is_plain_text_for_non_string_targets() {
        // A lone `|` only introduces a block for string targets.
        let reader = reader_from("count: |\n  5\n");
        let err = reader.read_scalar::<i32>("count:").unwrap_err();
        assert!(matches!(err, ReadError::Coercion { .. }));
    }

    #[test]
    fn test_read_list_in_order() {
        let reader = reader_from("First List:\n  - 1.1\n  - 2.2\n  - 3.3\n  - 4.4\n");
        let values: Vec<f64> = reader.read_list("First List:").unwrap();
        assert_eq!(values, vec![1.1, 2.2, 3.3, 4.4]);
    }

    #[test]
    fn test_read_list_stops_at_scope_end() {
        let reader = reader_from("Letters:\n  - a\n  - b\nNumbers:\n  - 1\n");
        let values: Vec<String> = reader.read_list("Letters:").unwrap();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_read_list_empty_scope() {
        let reader = reader_from("Letters:\nNumbers:\n  - 1\n");
        let err = reader.read_list::<String>("Letters:").unwrap_err();
        assert!(matches!(err, ReadError::EmptyScope { .. }));
    }

    #[test]
    fn test_read_dict_in_order() {
        let reader = reader_from("Ages:\n  Jon: 44\n  Jill: 32\n  Bob: 12\n");
        let ages: IndexMap<String, i64> = reader.read_dict("Ages:").unwrap();
        let pairs: Vec<(&String, &i64)> = ages.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (&"Jon".to_string(), &44),
                (&"Jill".to_string(), &32),
                (&"Bob".to_string(), &12),
            ]
        );
    }

    #[test]
    fn test_read_dict_duplicate_key_last_wins() {
        let reader = reader_from("Ages:\n  Jon: 44\n  Jill: 32\n  Jon: 45\n");
        let ages: IndexMap<String, i64> = reader.read_dict("Ages:").unwrap();
        assert_eq!(ages.len(), 2);
        assert_eq!(ages["Jon"], 45);
        // First insertion position is kept.
        assert_eq!(ages.get_index(0).unwrap().0, "Jon");
    }

    #[test]
    fn test_read_dict_integer_keys() {
        let reader = reader_from("Columns:\n  0: id\n  1: name\n");
        let cols: IndexMap<u32, String> = reader.read_dict("Columns:").unwrap();
        assert_eq!(cols[&0], "id");
        assert_eq!(cols[&1], "name");
    }

    #[test]
    fn test_read_inline_json() {
        let reader =
            reader_from("JSON Data: {\"book\": \"History of the World\", \"year\": 1976}\n");
        let value = reader.read_inline_json("JSON Data:").unwrap();
        assert_eq!(value["book"], "History of the World");
        assert_eq!(value["year"], 1976);
    }

    #[test]
    fn test_read_inline_json_incomplete() {
        let reader = reader_from("JSON Data: {\"unclosed\": 1\n");
        let err = reader.read_inline_json("JSON Data:").unwrap_err();
        assert!(matches!(err, ReadError::Coercion { target: "json", .. }));
    }

    #[test]
    fn test_read_inline_json_missing_keyword() {
        let reader = reader_from("no json here\n");
        let err = reader.read_inline_json("JSON Data:").unwrap_err();
        assert!(matches!(err, ReadError::KeywordNotFound { .. }));
    }

    #[test]
    fn test_idempotent_reads() {
        let reader = reader_from("value: 12\n");
        let first: i32 = reader.read_scalar("value:").unwrap();
        let second: i32 = reader.read_scalar("value:").unwrap();
        assert_eq!(first, second);
    }
}
