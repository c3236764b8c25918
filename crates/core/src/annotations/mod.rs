//! Source annotations overlaid on call-graph nodes.
//!
//! An annotation file holds one record per line, with colon-separated fields:
//!
//! ```text
//! <file>:<line>:<kind>:<tags>:<text>
//! ```
//!
//! `kind` is `Conditional` or `Note`; `tags` is a comma-separated list of
//! `key` or `key=value`. The text is the remainder of the line and may
//! itself contain colons. Blank lines and lines starting with `#` are
//! skipped.

mod generate;
mod index;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use generate::{generate_annotations, sanitize};
pub use index::AnnotationSet;

const FIELD_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Conditional,
    Note,
}

impl AnnotationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Conditional => "Conditional",
            AnnotationKind::Note => "Note",
        }
    }
}

impl FromStr for AnnotationKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Conditional" => Ok(AnnotationKind::Conditional),
            "Note" => Ok(AnnotationKind::Note),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A note attached to one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub file_name: String,
    pub line: u32,
    pub kind: AnnotationKind,
    /// `key` tags map to `None`, `key=value` tags to `Some(value)`.
    pub tags: BTreeMap<String, Option<String>>,
    pub text: String,
}

impl Annotation {
    pub fn new(
        file_name: impl Into<String>,
        line: u32,
        kind: AnnotationKind,
        text: impl Into<String>,
    ) -> Self {
        Self { file_name: file_name.into(), line, kind, tags: BTreeMap::new(), text: text.into() }
    }
}

impl fmt::Display for Annotation {
    /// Renders the record in the file format, so output parses back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<String> = self
            .tags
            .iter()
            .map(|(k, v)| match v {
                Some(v) => format!("{k}={v}"),
                None => k.clone(),
            })
            .collect();
        write!(f, "{}:{}:{}:{}:{}", self.file_name, self.line, self.kind, tags.join(","), self.text)
    }
}

/// Why a single record failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("invalid format, not enough ':' separators")]
    FieldCount,
    #[error("line value is not an integer: {0:?}")]
    Line(String),
    #[error("kind value is invalid: {0:?}")]
    Kind(String),
    #[error("tag value is invalid: {0:?}")]
    Tag(String),
}

/// A record error located in its source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source_name}:{line}: {error}: {text:?}")]
pub struct AnnotationError {
    pub source_name: String,
    pub line: usize,
    pub text: String,
    pub error: RecordError,
}

/// Parse one annotation record.
pub fn parse_record(record: &str) -> Result<Annotation, RecordError> {
    let parts: Vec<&str> = record.splitn(FIELD_COUNT, ':').map(str::trim).collect();
    let [file_name, raw_line, raw_kind, raw_tags, text] = parts[..] else {
        return Err(RecordError::FieldCount);
    };

    let line = raw_line.parse().map_err(|_| RecordError::Line(raw_line.to_string()))?;
    let kind = raw_kind.parse().map_err(|_| RecordError::Kind(raw_kind.to_string()))?;
    let tags = parse_tags(raw_tags)?;

    Ok(Annotation { file_name: file_name.to_string(), line, kind, tags, text: text.to_string() })
}

fn parse_tags(raw: &str) -> Result<BTreeMap<String, Option<String>>, RecordError> {
    let mut tags = BTreeMap::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (key, value) = match tag.split_once('=') {
            None => (tag, None),
            Some((key, value)) if !value.contains('=') => (key, Some(value.to_string())),
            Some(_) => return Err(RecordError::Tag(tag.to_string())),
        };
        if key.is_empty() {
            return Err(RecordError::Tag(tag.to_string()));
        }
        tags.insert(key.to_string(), value);
    }
    Ok(tags)
}

/// Parse a whole annotation file. `source_name` is used in errors only.
pub fn parse_annotations(source_name: &str, text: &str) -> Result<Vec<Annotation>, AnnotationError> {
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let record = raw.trim();
        if record.is_empty() || record.starts_with('#') {
            continue;
        }
        let annotation = parse_record(record).map_err(|error| AnnotationError {
            source_name: source_name.to_string(),
            line: idx + 1,
            text: raw.to_string(),
            error,
        })?;
        out.push(annotation);
    }
    Ok(out)
}
