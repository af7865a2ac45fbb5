//! Full-document readers for JSON, YAML, and XML files.
//!
//! Unlike the keyword scanner in [`crate::reader`], the functions here treat
//! the whole file as one well-formed document and delegate parsing to
//! `serde_json`, `serde_yaml`, and `quick-xml`. They exist for files that
//! are entirely JSON, YAML, or XML; keyword-anchored line scanning is never
//! applied to them.

use anyhow::{bail, Context, Result};
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

/// Reads an entire file as one JSON value.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn read_full_json<P: AsRef<Path>>(path: P) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path.as_ref()).context("Failed to read JSON file")?;
    serde_json::from_str(&content).context("Failed to parse JSON")
}

/// Finds the first value stored under `keyword` anywhere in a JSON tree.
///
/// The search is depth-first: object keys are checked before descending
/// into values, and arrays are searched element by element. Returns `None`
/// when no object in the tree carries the key.
pub fn json_section<'a>(value: &'a serde_json::Value, keyword: &str) -> Option<&'a serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(found) = map.get(keyword) {
                return Some(found);
            }
            map.values().find_map(|v| json_section(v, keyword))
        }
        serde_json::Value::Array(items) => items.iter().find_map(|v| json_section(v, keyword)),
        _ => None,
    }
}

/// Reads a JSON file and returns the subtree nested under `keyword`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON, or does
/// not contain the keyword anywhere in its tree.
pub fn read_full_json_section<P: AsRef<Path>>(path: P, keyword: &str) -> Result<serde_json::Value> {
    let value = read_full_json(path)?;
    match json_section(&value, keyword) {
        Some(found) => Ok(found.clone()),
        None => bail!("Keyword '{}' not found in the JSON data", keyword),
    }
}

/// Reads every `---`-separated document in a YAML file.
///
/// A single-document file yields a one-element vector.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any document fails to
/// parse.
pub fn read_full_yaml<P: AsRef<Path>>(path: P) -> Result<Vec<serde_yaml::Value>> {
    let content = fs::read_to_string(path.as_ref()).context("Failed to read YAML file")?;

    let mut documents = Vec::new();
    for (index, document) in serde_yaml::Deserializer::from_str(&content).enumerate() {
        let value = serde_yaml::Value::deserialize(document)
            .with_context(|| format!("Invalid YAML in document {}", index))?;
        documents.push(value);
    }
    Ok(documents)
}

/// Reads a single-document YAML file into a caller-chosen type.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not deserialize
/// into `T`.
pub fn read_full_yaml_as<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let content = fs::read_to_string(path.as_ref()).context("Failed to read YAML file")?;
    serde_yaml::from_str(&content).context("Failed to parse YAML")
}

/// Writes `value` to a YAML file, creating it or appending a new document.
///
/// In append mode the target must already exist, and a `---` separator is
/// emitted before the new document so that [`read_full_yaml`] returns it as
/// an additional entry.
///
/// # Errors
///
/// Returns an error if the file is missing in append mode, or if
/// serialization or the write itself fails.
pub fn write_yaml_file<P: AsRef<Path>>(
    path: P,
    value: &serde_yaml::Value,
    append: bool,
) -> Result<()> {
    let path_ref = path.as_ref();
    if append && !path_ref.is_file() {
        bail!("File '{}' not found", path_ref.display());
    }

    let rendered = serde_yaml::to_string(value).context("Failed to serialize YAML")?;

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(append)
        .write(true)
        .truncate(!append)
        .open(path_ref)
        .with_context(|| format!("Failed to open '{}'", path_ref.display()))?;

    if append {
        file.write_all(b"---\n").context("Failed to write YAML")?;
    }
    file.write_all(rendered.as_bytes())
        .context("Failed to write YAML")?;
    Ok(())
}

/// Reads an entire XML file into a caller-chosen type.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not deserialize
/// into `T`.
pub fn read_full_xml<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let content = fs::read_to_string(path.as_ref()).context("Failed to read XML file")?;
    quick_xml::de::from_str(&content).context("Failed to parse XML")
}

/// Extracts the first subtree whose element name matches `tag`.
///
/// Events between the matching start tag and its end tag (inclusive) are
/// copied verbatim, so the returned string is itself well-formed XML that
/// can be handed to [`read_full_xml_section`] or any deserializer.
///
/// # Errors
///
/// Returns an error if the XML is malformed or the tag never appears.
pub fn xml_section(content: &str, tag: &str) -> Result<String> {
    let mut reader = Reader::from_str(content);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut depth = 0usize;

    loop {
        match reader.read_event().context("Malformed XML data")? {
            Event::Eof => bail!("Tag '{}' not found in the XML data", tag),
            Event::Start(e) => {
                if depth > 0 {
                    depth += 1;
                    writer.write_event(Event::Start(e))?;
                } else if e.name().as_ref() == tag.as_bytes() {
                    depth = 1;
                    writer.write_event(Event::Start(e))?;
                }
            }
            Event::End(e) => {
                if depth > 0 {
                    writer.write_event(Event::End(e))?;
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
            }
            Event::Empty(e) => {
                if depth > 0 {
                    writer.write_event(Event::Empty(e))?;
                } else if e.name().as_ref() == tag.as_bytes() {
                    writer.write_event(Event::Empty(e))?;
                    break;
                }
            }
            other => {
                if depth > 0 {
                    writer.write_event(other)?;
                }
            }
        }
    }

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).context("Extracted XML is not valid UTF-8")
}

/// Reads an XML file and deserializes the first subtree named `tag`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the tag is absent, or the
/// subtree does not deserialize into `T`.
pub fn read_full_xml_section<T: DeserializeOwned, P: AsRef<Path>>(path: P, tag: &str) -> Result<T> {
    let content = fs::read_to_string(path.as_ref()).context("Failed to read XML file")?;
    let section = xml_section(&content, tag)?;
    quick_xml::de::from_str(&section)
        .with_context(|| format!("Failed to parse XML section '{}'", tag))
}
