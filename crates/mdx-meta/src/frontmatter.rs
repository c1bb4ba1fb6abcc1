//! Header parsing and serialization.

use serde::Serialize;
use serde_yaml::{Mapping, Value};

const DELIMITER: &str = "---";
const END_MARKER: &str = "...";

/// Error type for metadata header operations.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// The opening `---` line has no closing line.
    #[error("Metadata header is not closed by a `---` line")]
    Unterminated,

    /// The header parsed, but not as a key-value mapping.
    #[error("Metadata header must be a mapping")]
    NotMapping,

    #[error("Invalid YAML in metadata header: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("Failed to serialize metadata header: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Ordered key-value metadata from a document header.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter {
    mapping: Mapping,
}

impl FrontMatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse header YAML. Blank input gives an empty mapping.
    pub fn from_yaml(yaml: &str) -> Result<Self, FrontMatterError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        match serde_yaml::from_str(yaml).map_err(FrontMatterError::Parse)? {
            Value::Null => Ok(Self::default()),
            Value::Mapping(mapping) => Ok(Self { mapping }),
            _ => Err(FrontMatterError::NotMapping),
        }
    }

    /// Serialize as YAML without document markers.
    pub fn to_yaml(&self) -> Result<String, FrontMatterError> {
        serde_yaml::to_string(&self.mapping).map_err(FrontMatterError::Serialize)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.mapping.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.mapping.get(key)
    }

    /// String value of `key`, `None` when missing or not a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Non-negative integer value of `key`.
    #[must_use]
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    /// String items of a sequence value. Non-string items are skipped.
    #[must_use]
    pub fn get_str_list(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .and_then(Value::as_sequence)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Insert or replace `key`. New keys go to the end.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.mapping.insert(Value::from(key), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.mapping.remove(key)
    }

    /// Entries with string keys, in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.mapping
            .iter()
            .filter_map(|(key, value)| key.as_str().map(|key| (key, value)))
    }
}

/// Split a document into its metadata header and body.
///
/// A header is present only when the first line is `---`. It ends at the
/// next `---` or `...` line. Blank lines between the header and the body are
/// dropped. Documents without a header return an empty mapping and the whole
/// text as body.
///
/// # Example
///
/// ```
/// let (meta, body) = mdx_meta::load("---\ntitle: Hello\n---\n\nText\n").unwrap();
///
/// assert_eq!(meta.get_str("title"), Some("Hello"));
/// assert_eq!(body, "Text\n");
/// ```
pub fn load(text: &str) -> Result<(FrontMatter, String), FrontMatterError> {
    let Some(rest) = after_opening_line(text) else {
        return Ok((FrontMatter::new(), text.to_owned()));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let marker = line.trim_end();
        if marker == DELIMITER || marker == END_MARKER {
            let meta = FrontMatter::from_yaml(&rest[..offset])?;
            let body = skip_blank_lines(&rest[offset + line.len()..]);
            return Ok((meta, body.to_owned()));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unterminated)
}

/// Join metadata and body into document text ending with a newline.
///
/// An empty mapping writes the body alone.
pub fn dump(meta: &FrontMatter, body: &str) -> Result<String, FrontMatterError> {
    let mut out = String::new();
    if !meta.is_empty() {
        out.push_str(DELIMITER);
        out.push('\n');
        out.push_str(&meta.to_yaml()?);
        out.push_str(DELIMITER);
        out.push_str("\n\n");
    }
    out.push_str(body);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

fn after_opening_line(text: &str) -> Option<&str> {
    let first = text.split_inclusive('\n').next()?;
    (first.trim_end() == DELIMITER).then(|| &text[first.len()..])
}

fn skip_blank_lines(mut text: &str) -> &str {
    while let Some(pos) = text.find('\n')
        && text[..pos].trim().is_empty()
    {
        text = &text[pos + 1..];
    }
    text
}
