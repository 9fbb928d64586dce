//! Wire JSON to document-model conversion.
//!
//! Dispatch is a closed match over the known type tags. Anything else, and
//! any known tag whose payload fails to parse, becomes
//! [`BlockPayload::Unsupported`] so the renderer surfaces it as a
//! passthrough comment instead of silently dropping it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use nd_render::{Annotations, Block, BlockPayload, Page, TextRun};

use crate::wire::{
    BookmarkPayload, CalloutPayload, CodePayload, EquationPayload, ImagePayload, RawBlock,
    RawPage, RichTextWire, TableRowPayload, TextPayload, TodoPayload,
};

/// A fetched page with its expanded block tree.
#[derive(Debug)]
pub struct PageNode {
    pub page: RawPage,
    pub blocks: Vec<BlockNode>,
}

/// A fetched block with its expanded children.
///
/// For `child_page` blocks the fetched subtree lives in `child_page` (it is
/// the child page's content, not freeform children of the block).
#[derive(Debug)]
pub struct BlockNode {
    pub block: RawBlock,
    pub children: Vec<BlockNode>,
    pub child_page: Option<Box<PageNode>>,
}

/// Convert a fetched page tree into the renderer's document model.
#[must_use]
pub fn convert_page(node: &PageNode) -> Page {
    Page {
        id: node.page.id.clone(),
        title: node.page.title(),
        created_time: node.page.created_time,
        last_edited_time: node.page.last_edited_time,
        blocks: node.blocks.iter().map(convert_block).collect(),
    }
}

fn convert_block(node: &BlockNode) -> Block {
    Block {
        id: node.block.id.clone(),
        has_children: node.block.has_children,
        children: node.children.iter().map(convert_block).collect(),
        payload: convert_payload(node),
    }
}

fn convert_payload(node: &BlockNode) -> BlockPayload {
    let raw = &node.block;
    let kind = raw.block_type.as_str();
    let payload = raw.payload().cloned().unwrap_or(Value::Null);

    match kind {
        "paragraph" => typed(kind, payload, |p: TextPayload| BlockPayload::Paragraph {
            text: runs(&p.rich_text),
        }),
        "heading_1" => typed(kind, payload, |p: TextPayload| BlockPayload::Heading1 {
            text: runs(&p.rich_text),
        }),
        "heading_2" => typed(kind, payload, |p: TextPayload| BlockPayload::Heading2 {
            text: runs(&p.rich_text),
        }),
        "heading_3" => typed(kind, payload, |p: TextPayload| BlockPayload::Heading3 {
            text: runs(&p.rich_text),
        }),
        "bulleted_list_item" => typed(kind, payload, |p: TextPayload| {
            BlockPayload::BulletedListItem {
                text: runs(&p.rich_text),
            }
        }),
        "numbered_list_item" => typed(kind, payload, |p: TextPayload| {
            BlockPayload::NumberedListItem {
                text: runs(&p.rich_text),
            }
        }),
        "to_do" => typed(kind, payload, |p: TodoPayload| BlockPayload::ToDo {
            text: runs(&p.rich_text),
            checked: p.checked,
        }),
        "code" => typed(kind, payload, |p: CodePayload| BlockPayload::Code {
            text: runs(&p.rich_text),
            language: p.language,
        }),
        "quote" => typed(kind, payload, |p: TextPayload| BlockPayload::Quote {
            text: runs(&p.rich_text),
        }),
        "callout" => typed(kind, payload, |p: CalloutPayload| BlockPayload::Callout {
            text: runs(&p.rich_text),
            icon: p.icon.and_then(|i| i.emoji),
        }),
        "image" => typed(kind, payload, |p: ImagePayload| BlockPayload::Image {
            url: p.url().map(str::to_owned),
            caption: runs(&p.caption),
        }),
        "table" => BlockPayload::Table,
        "table_row" => typed(kind, payload, |p: TableRowPayload| BlockPayload::TableRow {
            cells: p.cells.iter().map(|cell| runs(cell)).collect(),
        }),
        "divider" => BlockPayload::Divider,
        "child_page" => match &node.child_page {
            Some(child) => BlockPayload::ChildPage {
                page: convert_page(child),
            },
            // A child_page block without its fetched page cannot recurse.
            None => BlockPayload::Unsupported {
                kind: kind.to_owned(),
            },
        },
        "bookmark" => typed(kind, payload, |p: BookmarkPayload| BlockPayload::Bookmark {
            url: p.url,
            caption: runs(&p.caption),
        }),
        "equation" => typed(kind, payload, |p: EquationPayload| BlockPayload::Equation {
            expression: p.expression,
        }),
        other => BlockPayload::Unsupported {
            kind: other.to_owned(),
        },
    }
}

/// Parse a payload value, degrading to `Unsupported` on shape mismatch.
fn typed<T, F>(kind: &str, payload: Value, build: F) -> BlockPayload
where
    T: DeserializeOwned,
    F: FnOnce(T) -> BlockPayload,
{
    match serde_json::from_value::<T>(payload) {
        Ok(parsed) => build(parsed),
        Err(err) => {
            tracing::debug!("malformed {kind} payload: {err}");
            BlockPayload::Unsupported {
                kind: kind.to_owned(),
            }
        }
    }
}

fn runs(wire: &[RichTextWire]) -> Vec<TextRun> {
    wire.iter()
        .map(|r| TextRun {
            plain_text: r.plain_text.clone(),
            annotations: Annotations {
                bold: r.annotations.bold,
                italic: r.annotations.italic,
                strikethrough: r.annotations.strikethrough,
                code: r.annotations.code,
            },
            href: r.href.clone(),
        })
        .collect()
}
