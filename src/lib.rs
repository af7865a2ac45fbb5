//! KeyQuill - keyword-anchored readers for structured text files.
//!
//! KeyQuill reads configuration files that anchor values to keyword tokens
//! at the start of a line, in a small YAML-like grammar: indentation scopes
//! bound lists and dictionaries, `---` lines separate documents, and the
//! `^`, `|`, and `>` sigils introduce verbatim, literal, and folded
//! multi-line strings. The [`reader`] module holds the scanner; the
//! [`fulldoc`] module reads files that are entirely JSON, YAML, or XML by
//! delegating to the standard parsers.
//!
//! # Example
//!
//! Given `settings.yaml`:
//!
//! ```text
//! Verbose: yes
//! Retries: 3
//! Hosts:
//!   - alpha.example.com
//!   - beta.example.com
//! Ages:
//!   Jon: 44
//!   Jill: 32
//! ```
//!
//! ```no_run
//! use keyquill::KeywordReader;
//! use indexmap::IndexMap;
//!
//! let reader = KeywordReader::open("settings.yaml").unwrap();
//! let verbose: bool = reader.read_scalar("Verbose:").unwrap();
//! let retries: u32 = reader.read_scalar("Retries:").unwrap();
//! let hosts: Vec<String> = reader.read_list("Hosts:").unwrap();
//! let ages: IndexMap<String, u32> = reader.read_dict("Ages:").unwrap();
//!
//! assert!(verbose);
//! assert_eq!(retries, 3);
//! assert_eq!(hosts.len(), 2);
//! assert_eq!(ages["Jon"], 44);
//! ```

pub mod fulldoc;
pub mod reader;

pub use reader::{FromField, KeywordReader, ReadError};
