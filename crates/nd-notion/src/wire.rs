//! Wire-format types for the Notion REST API.
//!
//! Notion keys each block's payload by its own type tag
//! (`{"type": "paragraph", "paragraph": {...}}`), so [`RawBlock`] keeps the
//! payload as raw JSON; `convert` parses it into the closed model enum.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// A page object as returned by `pages.retrieve`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    pub id: String,
    pub created_time: DateTime<Utc>,
    pub last_edited_time: DateTime<Utc>,
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
}

impl RawPage {
    /// Extract the page title from its title property.
    ///
    /// The title lives in whichever property carries a `title` run array
    /// (the key is "title" for plain pages but varies for database rows).
    /// Absent, empty, or malformed titles yield "Untitled".
    #[must_use]
    pub fn title(&self) -> String {
        for value in self.properties.values() {
            let Some(runs) = value.get("title").and_then(Value::as_array) else {
                continue;
            };
            let text: String = runs
                .iter()
                .filter_map(|run| run.get("plain_text").and_then(Value::as_str))
                .collect();
            if !text.trim().is_empty() {
                return text;
            }
        }
        "Untitled".to_owned()
    }
}

/// A block object as returned by `blocks.children.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub has_children: bool,
    /// Remaining fields, including the type-keyed payload object.
    #[serde(flatten)]
    rest: serde_json::Map<String, Value>,
}

impl RawBlock {
    /// The type-specific payload object, if present.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        self.rest.get(&self.block_type)
    }
}

/// One page of a paginated children listing.
#[derive(Debug, Deserialize)]
pub struct ChildrenResponse {
    #[serde(default)]
    pub results: Vec<RawBlock>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A rich-text item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichTextWire {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub annotations: AnnotationsWire,
    #[serde(default)]
    pub href: Option<String>,
}

/// Annotation flags; missing flags default to false.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct AnnotationsWire {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
}

/// Payload for text-bearing blocks (paragraph, headings, list items, quote).
#[derive(Debug, Default, Deserialize)]
pub struct TextPayload {
    #[serde(default)]
    pub rich_text: Vec<RichTextWire>,
}

/// Payload for to-do blocks.
#[derive(Debug, Default, Deserialize)]
pub struct TodoPayload {
    #[serde(default)]
    pub rich_text: Vec<RichTextWire>,
    #[serde(default)]
    pub checked: bool,
}

/// Payload for code blocks.
#[derive(Debug, Default, Deserialize)]
pub struct CodePayload {
    #[serde(default)]
    pub rich_text: Vec<RichTextWire>,
    #[serde(default)]
    pub language: String,
}

/// Payload for callout blocks.
#[derive(Debug, Default, Deserialize)]
pub struct CalloutPayload {
    #[serde(default)]
    pub rich_text: Vec<RichTextWire>,
    #[serde(default)]
    pub icon: Option<IconWire>,
}

/// Callout icon; only emoji icons carry a printable value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IconWire {
    #[serde(default)]
    pub emoji: Option<String>,
}

/// Payload for image blocks: either an internally-hosted file or an
/// external URL.
#[derive(Debug, Default, Deserialize)]
pub struct ImagePayload {
    #[serde(default)]
    pub caption: Vec<RichTextWire>,
    #[serde(default)]
    pub file: Option<FileUrl>,
    #[serde(default)]
    pub external: Option<FileUrl>,
}

impl ImagePayload {
    /// The image URL, wherever it is hosted.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.file
            .as_ref()
            .or(self.external.as_ref())
            .map(|f| f.url.as_str())
    }
}

/// A URL-bearing file reference.
#[derive(Debug, Clone, Deserialize)]
pub struct FileUrl {
    pub url: String,
}

/// Payload for table-row blocks.
#[derive(Debug, Default, Deserialize)]
pub struct TableRowPayload {
    #[serde(default)]
    pub cells: Vec<Vec<RichTextWire>>,
}

/// Payload for bookmark blocks.
#[derive(Debug, Deserialize)]
pub struct BookmarkPayload {
    pub url: String,
    #[serde(default)]
    pub caption: Vec<RichTextWire>,
}

/// Payload for equation blocks.
#[derive(Debug, Default, Deserialize)]
pub struct EquationPayload {
    #[serde(default)]
    pub expression: String,
}
