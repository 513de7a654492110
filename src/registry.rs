//! Link registry loading and validation.
//!
//! The registry is a YAML mapping of short code to link entry:
//!
//! ```yaml
//! go:
//!   url: https://example.com
//!   title: Example
//! docs:
//!   url: https://docs.example.com   # title is optional
//! ```
//!
//! Loading produces a [`LinkRegistry`] that keeps the document's order. Every
//! string is trimmed before it is checked, so a whitespace-only `url` is
//! rejected and a whitespace-only `title` counts as absent. An empty document
//! is an empty registry, not an error.
//!
//! ## Validation
//!
//! Any of these aborts the load with [`ConfigError`]:
//! - the document is not valid YAML, or its top level is not a mapping
//! - a key is not a non-empty string
//! - a code contains whitespace or a path separator, is `.`/`..`, or is a
//!   name the emitter writes itself (see [`RESERVED_CODES`])
//! - two keys trim to the same code
//! - an entry is not a mapping, lacks a non-empty `url`, or has a non-string `title`

use crate::config::ConfigError;
use serde::Serialize;
use serde::ser::SerializeMap;
use serde_yaml::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Codes that would collide with files and directories the emitter writes.
pub const RESERVED_CODES: &[&str] = &[
    "assets",
    "outbound",
    "generate",
    "index.html",
    "404.html",
    "links.json",
    "_redirects",
];

/// One row of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Short code; the URL path segment the link is published under.
    pub code: String,
    /// Redirect target. Only checked for non-emptiness.
    pub url: String,
    /// Display title. Never `Some("")`.
    pub title: Option<String>,
}

impl LinkEntry {
    /// The title to display, falling back to `default` when unset.
    pub fn display_title<'a>(&'a self, default: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(default)
    }
}

/// Validated links in source-document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRegistry {
    entries: Vec<LinkEntry>,
}

impl LinkRegistry {
    pub fn entries(&self) -> &[LinkEntry] {
        &self.entries
    }

    pub fn get(&self, code: &str) -> Option<&LinkEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LinkEntry> {
        self.entries.iter()
    }

    /// Compact JSON object of `code -> {url, title}`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<'a> IntoIterator for &'a LinkRegistry {
    type Item = &'a LinkEntry;
    type IntoIter = std::slice::Iter<'a, LinkEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Serializes as `{code: {"url": ..., "title": ... | null}}`, keeping
/// registry order.
impl Serialize for LinkRegistry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct JsonEntry<'a> {
            url: &'a str,
            title: Option<&'a str>,
        }

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(
                &entry.code,
                &JsonEntry {
                    url: &entry.url,
                    title: entry.title.as_deref(),
                },
            )?;
        }
        map.end()
    }
}

/// Read and parse the registry file. A missing file is an error.
pub fn load_registry_file(path: &Path) -> Result<LinkRegistry, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    load_registry(&text)
}

/// Parse and validate registry source text.
pub fn load_registry(source_text: &str) -> Result<LinkRegistry, ConfigError> {
    if is_blank_document(source_text) {
        return Ok(LinkRegistry::default());
    }
    let document: Value = serde_yaml::from_str(source_text)?;
    let mapping = match document {
        Value::Null => return Ok(LinkRegistry::default()),
        Value::Mapping(mapping) => mapping,
        _ => {
            return Err(invalid(
                "Link registry must contain a mapping of short codes to link entries",
            ));
        }
    };

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in &mapping {
        let code = match key.as_str().map(str::trim) {
            Some(code) if !code.is_empty() => code,
            _ => return Err(invalid("Each short code must be a non-empty string")),
        };
        validate_code(code)?;
        if !seen.insert(code.to_string()) {
            return Err(invalid(format!("Duplicate short code '{code}'")));
        }
        entries.push(parse_entry(code, value)?);
    }
    Ok(LinkRegistry { entries })
}

fn parse_entry(code: &str, value: &Value) -> Result<LinkEntry, ConfigError> {
    let Value::Mapping(fields) = value else {
        return Err(invalid(format!("Entry for '{code}' must be a mapping")));
    };

    let url = match fields.get("url").and_then(Value::as_str).map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            return Err(invalid(format!(
                "Entry for '{code}' must include a non-empty 'url'"
            )));
        }
    };

    let title = match fields.get("title") {
        None | Some(Value::Null) => None,
        Some(Value::String(title)) => Some(title.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string),
        Some(_) => {
            return Err(invalid(format!(
                "Entry for '{code}' has invalid 'title' (must be a string)"
            )));
        }
    };

    Ok(LinkEntry {
        code: code.to_string(),
        url,
        title,
    })
}

/// True for documents with no content besides comments and markers.
fn is_blank_document(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Codes become directory names and `_redirects` tokens, so they must be a
/// single path segment with no whitespace.
fn validate_code(code: &str) -> Result<(), ConfigError> {
    if code == "." || code == ".." {
        return Err(invalid(format!("Short code '{code}' is not a valid path segment")));
    }
    if code
        .chars()
        .any(|c| c.is_whitespace() || c == '/' || c == '\\')
    {
        return Err(invalid(format!(
            "Short code '{code}' must not contain whitespace or path separators"
        )));
    }
    if RESERVED_CODES.contains(&code) {
        return Err(invalid(format!("Short code '{code}' is reserved")));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}
