//! Document model: pages, blocks, and rich-text runs.
//!
//! Instances are read-only views constructed once per sync pass by the
//! content source; the renderer never mutates them. A block's payload shape
//! is fully determined by its variant, so dispatch is a closed `match` with
//! an explicit [`BlockPayload::Unsupported`] fallback.

use chrono::{DateTime, Utc};

/// One atomic content unit in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Opaque stable identifier.
    pub id: String,
    /// Whether the source reported nested blocks under this one.
    pub has_children: bool,
    /// Nested blocks, empty unless `has_children`.
    pub children: Vec<Block>,
    /// Type-specific payload.
    pub payload: BlockPayload,
}

impl Block {
    /// Create a leaf block with the given payload.
    #[must_use]
    pub fn new(id: impl Into<String>, payload: BlockPayload) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            children: Vec::new(),
            payload,
        }
    }

    /// Attach child blocks.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.has_children = !children.is_empty();
        self.children = children;
        self
    }
}

/// Closed enumeration of block types and their payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockPayload {
    Paragraph { text: Vec<TextRun> },
    Heading1 { text: Vec<TextRun> },
    Heading2 { text: Vec<TextRun> },
    Heading3 { text: Vec<TextRun> },
    BulletedListItem { text: Vec<TextRun> },
    NumberedListItem { text: Vec<TextRun> },
    ToDo { text: Vec<TextRun>, checked: bool },
    Code { text: Vec<TextRun>, language: String },
    Quote { text: Vec<TextRun> },
    Callout { text: Vec<TextRun>, icon: Option<String> },
    Image { url: Option<String>, caption: Vec<TextRun> },
    Table,
    TableRow { cells: Vec<Vec<TextRun>> },
    Divider,
    /// A nested page. Carries the fully-fetched child page so the page
    /// renderer can recurse without another round-trip.
    ChildPage { page: Page },
    Bookmark { url: String, caption: Vec<TextRun> },
    Equation { expression: String },
    /// Unknown type tag, or a known tag whose payload failed to parse.
    Unsupported { kind: String },
}

impl BlockPayload {
    /// True for the block types that participate in list runs.
    #[must_use]
    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            Self::BulletedListItem { .. } | Self::NumberedListItem { .. } | Self::ToDo { .. }
        )
    }
}

/// A span of text carrying style annotations and an optional hyperlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub plain_text: String,
    pub annotations: Annotations,
    pub href: Option<String>,
}

impl TextRun {
    /// An unannotated run without a link.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            annotations: Annotations::default(),
            href: None,
        }
    }

    /// Set the annotation flags.
    #[must_use]
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Set the hyperlink target.
    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

/// Style annotation flags for one text run.
///
/// Malformed flags from the wire are treated as absent, so `Default` is the
/// recovery value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
}

impl Annotations {
    #[must_use]
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }
}

/// One page of the workspace: title, timestamps, and its block sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: String,
    /// Title derived from the title property; "Untitled" when absent.
    pub title: String,
    pub created_time: DateTime<Utc>,
    pub last_edited_time: DateTime<Utc>,
    pub blocks: Vec<Block>,
}

impl Page {
    /// A page with fixed timestamps, for tests and examples.
    #[must_use]
    pub fn test_page(id: impl Into<String>, title: impl Into<String>) -> Self {
        let ts = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .expect("valid fixed timestamp")
            .with_timezone(&Utc);
        Self {
            id: id.into(),
            title: title.into(),
            created_time: ts,
            last_edited_time: ts,
            blocks: Vec::new(),
        }
    }

    /// Replace the block sequence.
    #[must_use]
    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }
}

/// One rendered Markdown file, ready for a sink.
///
/// `path` is always relative with `/`-separated segments; the sink roots it
/// under its own base directory. The page id and edit timestamp ride along
/// for the driver's change detection.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub path: String,
    pub content: String,
    pub page_id: String,
    pub last_edited_time: DateTime<Utc>,
}

/// An image referenced by a rendered page.
///
/// The renderer emits the source URL verbatim and records the reference here
/// so the driver can download, re-host, and rewrite it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Source URL as it appears in the rendered Markdown.
    pub url: String,
    /// Alt text (image caption, or "image").
    pub alt_text: String,
    /// Id of the page the image appeared on.
    pub page_id: String,
    /// Title of the page the image appeared on.
    pub page_title: String,
}
