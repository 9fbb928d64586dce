//! Per-block Markdown dispatch.

use crate::list::{ListContext, ListKind};
use crate::model::{Block, BlockPayload, ImageRef, Page, TextRun};
use crate::options::{HeadingLevels, PostFormat, RenderOptions};
use crate::richtext::{plain_text, render_runs};
use crate::table::render_table;
use crate::util::{indent_lines, sanitize_title};
use crate::warning::RenderWarning;

/// Renders one page's block sequence to Markdown.
///
/// Holds the per-document mutable state (list context, collected images and
/// warnings). Construct one per page render and discard it afterwards; the
/// state must not leak into a sibling page's render.
pub struct BlockRenderer<'a> {
    options: &'a RenderOptions,
    page_id: String,
    page_title: String,
    /// Link prefix for child-page references, relative to this document.
    child_dir: String,
    list: ListContext,
    in_list_run: bool,
    images: Vec<ImageRef>,
    warnings: Vec<RenderWarning>,
}

impl<'a> BlockRenderer<'a> {
    /// Create a renderer for one page.
    ///
    /// `child_dir` is the directory (relative to this page's document, with
    /// a trailing `/` or empty) where child-page documents will be placed;
    /// child-page blocks link into it.
    #[must_use]
    pub fn new(options: &'a RenderOptions, page: &Page, child_dir: impl Into<String>) -> Self {
        Self {
            options,
            page_id: page.id.clone(),
            page_title: page.title.clone(),
            child_dir: child_dir.into(),
            list: ListContext::new(),
            in_list_run: false,
            images: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Collected image references and warnings, consuming the renderer.
    #[must_use]
    pub fn finish(self) -> (Vec<ImageRef>, Vec<RenderWarning>) {
        (self.images, self.warnings)
    }

    /// Render a sibling sequence of blocks.
    ///
    /// List runs are emitted tight (single newline between items); a blank
    /// line is inserted when a run is followed by non-list content so the
    /// next block is not swallowed as a lazy continuation of the last item.
    pub fn render_blocks(&mut self, blocks: &[Block]) -> String {
        let mut out = String::new();
        for block in blocks {
            let is_list = block.payload.is_list_item();
            if !is_list {
                self.list.reset();
            }
            let rendered = self.render_block(block);
            if rendered.is_empty() {
                continue;
            }
            if self.in_list_run && !is_list {
                out.push('\n');
            }
            self.in_list_run = is_list;
            out.push_str(&rendered);
        }
        out
    }

    /// Render a single block, recursing into its children.
    ///
    /// Never fails: a block missing the data its type requires renders as
    /// an empty string (or a passthrough comment) and records a warning.
    fn render_block(&mut self, block: &Block) -> String {
        match &block.payload {
            BlockPayload::Paragraph { text } => self.paragraph(block, text),
            BlockPayload::Heading1 { text } => self.heading(block, text, 1),
            BlockPayload::Heading2 { text } => self.heading(block, text, 2),
            BlockPayload::Heading3 { text } => self.heading(block, text, 3),
            BlockPayload::BulletedListItem { text } => self.list_item(block, text, None),
            BlockPayload::NumberedListItem { text } => {
                let number = self.list.ordered_item();
                self.numbered_item(block, text, number)
            }
            BlockPayload::ToDo { text, checked } => self.list_item(block, text, Some(*checked)),
            BlockPayload::Code { text, language } => Self::code(text, language),
            BlockPayload::Quote { text } => self.quoted(block, text, None),
            BlockPayload::Callout { text, icon } => self.quoted(block, text, icon.as_deref()),
            BlockPayload::Image { url, caption } => self.image(block, url.as_deref(), caption),
            BlockPayload::Table => self.table(block),
            BlockPayload::TableRow { .. } => {
                self.warn(block, "table row outside a table");
                String::new()
            }
            BlockPayload::Divider => "---\n\n".to_owned(),
            BlockPayload::ChildPage { page } => self.child_page_link(page),
            BlockPayload::Bookmark { url, caption } => Self::bookmark(url, caption),
            BlockPayload::Equation { expression } => Self::equation(expression),
            BlockPayload::Unsupported { kind } => {
                format!("<!-- unsupported block type: {kind} -->\n\n")
            }
        }
    }

    fn paragraph(&mut self, block: &Block, text: &[TextRun]) -> String {
        let mut out = render_runs(text);
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        if !block.children.is_empty() {
            let nested = self.nested_children(block);
            if self.options.nested_list_indent {
                out.push_str(&indent_lines(&nested));
            } else {
                out.push_str(&nested);
            }
        }
        out
    }

    fn heading(&mut self, block: &Block, text: &[TextRun], level: usize) -> String {
        let rendered = render_runs(text);
        if rendered.is_empty() {
            return String::new();
        }
        let marker = match self.options.heading_levels {
            HeadingLevels::Distinct => "#".repeat(level),
            HeadingLevels::Uniform => "##".to_owned(),
        };
        let mut out = format!("{marker} {rendered}\n\n");
        if !block.children.is_empty() {
            // Toggle headings carry children; render them flush below.
            out.push_str(&self.nested_children(block));
        }
        out
    }

    /// Bulleted list item, or a to-do item when `checked` is present.
    fn list_item(&mut self, block: &Block, text: &[TextRun], checked: Option<bool>) -> String {
        let indent = self.list.indent();
        self.list.bullet_item();
        let marker = match checked {
            Some(true) => "- [x] ",
            Some(false) => "- [ ] ",
            None => "- ",
        };
        let mut out = format!("{indent}{marker}{}\n", render_runs(text));
        out.push_str(&self.list_children(block, ListKind::Unordered));
        out
    }

    fn numbered_item(&mut self, block: &Block, text: &[TextRun], number: u32) -> String {
        let indent = self.list.indent();
        let mut out = format!("{indent}{number}. {}\n", render_runs(text));
        out.push_str(&self.list_children(block, ListKind::Ordered));
        out
    }

    /// Recurse into a list item's children under a pushed stack frame.
    fn list_children(&mut self, block: &Block, kind: ListKind) -> String {
        if block.children.is_empty() {
            return String::new();
        }
        self.list.push(kind);
        let out = self.render_blocks(&block.children);
        self.list.pop();
        out
    }

    /// Recurse into a non-list block's children.
    fn nested_children(&mut self, block: &Block) -> String {
        let was_in_run = self.in_list_run;
        self.in_list_run = false;
        let out = self.render_blocks(&block.children);
        self.in_list_run = was_in_run;
        out
    }

    fn code(text: &[TextRun], language: &str) -> String {
        let code = plain_text(text);
        if code.is_empty() {
            return String::new();
        }
        format!("```{language}\n{code}\n```\n\n")
    }

    /// Quote blocks and callouts share blockquote syntax; callouts carry an
    /// icon prefix.
    fn quoted(&mut self, block: &Block, text: &[TextRun], icon: Option<&str>) -> String {
        let rendered = render_runs(text);
        if rendered.is_empty() && block.children.is_empty() {
            return String::new();
        }
        let mut out = match icon {
            Some(icon) => format!("> {icon} {rendered}\n\n"),
            None => format!("> {rendered}\n\n"),
        };
        if !block.children.is_empty() {
            out.push_str(&self.nested_children(block));
        }
        out
    }

    fn image(&mut self, block: &Block, url: Option<&str>, caption: &[TextRun]) -> String {
        let Some(url) = url else {
            self.warn(block, "image block has no url");
            return String::new();
        };
        let caption = render_runs(caption);
        let alt = if caption.is_empty() {
            "image"
        } else {
            caption.as_str()
        };
        self.images.push(ImageRef {
            url: url.to_owned(),
            alt_text: alt.to_owned(),
            page_id: self.page_id.clone(),
            page_title: self.page_title.clone(),
        });
        format!("![{alt}]({url})\n\n")
    }

    /// A table's children are its rows, not freeform content; route them to
    /// the table assembler instead of generic recursion.
    fn table(&mut self, block: &Block) -> String {
        let rows: Vec<&[Vec<TextRun>]> = block
            .children
            .iter()
            .filter_map(|child| match &child.payload {
                BlockPayload::TableRow { cells } => Some(cells.as_slice()),
                _ => None,
            })
            .collect();
        render_table(&rows)
    }

    /// Child pages are rendered as separate documents by the page renderer;
    /// in the body they appear as a relative link.
    fn child_page_link(&self, page: &Page) -> String {
        let stem = sanitize_title(&page.title);
        let file = match self.options.post_format {
            PostFormat::Document => format!("{}{stem}.md", self.child_dir),
            PostFormat::Blog => format!(
                "{}{}-{stem}.md",
                self.child_dir,
                page.created_time.format("%Y-%m-%d")
            ),
        };
        format!("[{}]({file})\n\n", page.title)
    }

    fn bookmark(url: &str, caption: &[TextRun]) -> String {
        let caption = render_runs(caption);
        let label = if caption.is_empty() {
            url
        } else {
            caption.as_str()
        };
        format!("[{label}]({url})\n\n")
    }

    fn equation(expression: &str) -> String {
        if expression.is_empty() {
            return String::new();
        }
        format!("$$\n{expression}\n$$\n\n")
    }

    fn warn(&mut self, block: &Block, message: &str) {
        self.warnings
            .push(RenderWarning::new(&self.page_id, Some(&block.id), message));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Annotations;

    fn render(blocks: Vec<Block>) -> String {
        render_with(&RenderOptions::default(), blocks)
    }

    fn render_with(options: &RenderOptions, blocks: Vec<Block>) -> String {
        let page = Page::test_page("page-1", "Test").with_blocks(blocks);
        let mut renderer = BlockRenderer::new(options, &page, "Test/");
        renderer.render_blocks(&page.blocks)
    }

    fn paragraph(id: &str, text: &str) -> Block {
        Block::new(
            id,
            BlockPayload::Paragraph {
                text: vec![TextRun::plain(text)],
            },
        )
    }

    fn bullet(id: &str, text: &str) -> Block {
        Block::new(
            id,
            BlockPayload::BulletedListItem {
                text: vec![TextRun::plain(text)],
            },
        )
    }

    fn numbered(id: &str, text: &str) -> Block {
        Block::new(
            id,
            BlockPayload::NumberedListItem {
                text: vec![TextRun::plain(text)],
            },
        )
    }

    #[test]
    fn test_heading_and_annotated_paragraph() {
        let blocks = vec![
            Block::new(
                "h",
                BlockPayload::Heading1 {
                    text: vec![TextRun::plain("Intro")],
                },
            ),
            Block::new(
                "p",
                BlockPayload::Paragraph {
                    text: vec![
                        TextRun::plain("Hello "),
                        TextRun::plain("world").with_annotations(Annotations::bold()),
                    ],
                },
            ),
        ];
        assert_eq!(render(blocks), "# Intro\n\nHello **world**\n\n");
    }

    #[test]
    fn test_heading_levels_distinct() {
        let blocks = vec![
            Block::new("1", BlockPayload::Heading1 { text: vec![TextRun::plain("a")] }),
            Block::new("2", BlockPayload::Heading2 { text: vec![TextRun::plain("b")] }),
            Block::new("3", BlockPayload::Heading3 { text: vec![TextRun::plain("c")] }),
        ];
        assert_eq!(render(blocks), "# a\n\n## b\n\n### c\n\n");
    }

    #[test]
    fn test_heading_levels_uniform() {
        let options = RenderOptions {
            heading_levels: HeadingLevels::Uniform,
            ..RenderOptions::default()
        };
        let blocks = vec![
            Block::new("1", BlockPayload::Heading1 { text: vec![TextRun::plain("a")] }),
            Block::new("3", BlockPayload::Heading3 { text: vec![TextRun::plain("c")] }),
        ];
        assert_eq!(render_with(&options, blocks), "## a\n\n## c\n\n");
    }

    #[test]
    fn test_numbered_siblings_are_tight() {
        let blocks = vec![numbered("1", "One"), numbered("2", "Two")];
        assert_eq!(render(blocks), "1. One\n2. Two\n");
    }

    #[test]
    fn test_numbering_resets_after_non_list_block() {
        let blocks = vec![
            numbered("1", "One"),
            numbered("2", "Two"),
            paragraph("p", "break"),
            numbered("3", "Three"),
        ];
        assert_eq!(
            render(blocks),
            "1. One\n2. Two\n\nbreak\n\n1. Three\n"
        );
    }

    #[test]
    fn test_nested_bullets_indent_by_depth() {
        let blocks = vec![
            bullet("a", "top").with_children(vec![
                bullet("b", "mid").with_children(vec![bullet("c", "deep")]),
            ]),
            bullet("d", "next"),
        ];
        assert_eq!(render(blocks), "- top\n  - mid\n    - deep\n- next\n");
    }

    #[test]
    fn test_nested_ordered_restarts_parent_continues() {
        let blocks = vec![
            numbered("1", "One").with_children(vec![
                numbered("1a", "One-a"),
                numbered("1b", "One-b"),
            ]),
            numbered("2", "Two"),
        ];
        assert_eq!(
            render(blocks),
            "1. One\n  1. One-a\n  2. One-b\n2. Two\n"
        );
    }

    #[test]
    fn test_todo_items() {
        let blocks = vec![
            Block::new(
                "t1",
                BlockPayload::ToDo {
                    text: vec![TextRun::plain("done")],
                    checked: true,
                },
            ),
            Block::new(
                "t2",
                BlockPayload::ToDo {
                    text: vec![TextRun::plain("open")],
                    checked: false,
                },
            ),
        ];
        assert_eq!(render(blocks), "- [x] done\n- [ ] open\n");
    }

    #[test]
    fn test_code_fence_uses_plain_text() {
        let blocks = vec![Block::new(
            "c",
            BlockPayload::Code {
                text: vec![TextRun::plain("let x = 1;").with_annotations(Annotations::bold())],
                language: "rust".to_owned(),
            },
        )];
        assert_eq!(render(blocks), "```rust\nlet x = 1;\n```\n\n");
    }

    #[test]
    fn test_quote_and_callout() {
        let blocks = vec![
            Block::new(
                "q",
                BlockPayload::Quote {
                    text: vec![TextRun::plain("wisdom")],
                },
            ),
            Block::new(
                "c",
                BlockPayload::Callout {
                    text: vec![TextRun::plain("note this")],
                    icon: Some("💡".to_owned()),
                },
            ),
        ];
        assert_eq!(render(blocks), "> wisdom\n\n> 💡 note this\n\n");
    }

    #[test]
    fn test_image_collects_reference() {
        let page = Page::test_page("p1", "Pics").with_blocks(vec![Block::new(
            "i",
            BlockPayload::Image {
                url: Some("https://example.com/a.png".to_owned()),
                caption: vec![TextRun::plain("diagram")],
            },
        )]);
        let options = RenderOptions::default();
        let mut renderer = BlockRenderer::new(&options, &page, "");
        let out = renderer.render_blocks(&page.blocks);
        assert_eq!(out, "![diagram](https://example.com/a.png)\n\n");
        let (images, warnings) = renderer.finish();
        assert!(warnings.is_empty());
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].alt_text, "diagram");
        assert_eq!(images[0].page_title, "Pics");
    }

    #[test]
    fn test_image_without_url_warns_and_renders_nothing() {
        let page = Page::test_page("p1", "Pics").with_blocks(vec![Block::new(
            "i",
            BlockPayload::Image {
                url: None,
                caption: Vec::new(),
            },
        )]);
        let options = RenderOptions::default();
        let mut renderer = BlockRenderer::new(&options, &page, "");
        assert_eq!(renderer.render_blocks(&page.blocks), "");
        let (_, warnings) = renderer.finish();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].block_id.as_deref(), Some("i"));
    }

    #[test]
    fn test_table_children_are_intercepted() {
        let table = Block::new("t", BlockPayload::Table).with_children(vec![
            Block::new(
                "r1",
                BlockPayload::TableRow {
                    cells: vec![vec![TextRun::plain("a")], vec![TextRun::plain("b")]],
                },
            ),
            Block::new(
                "r2",
                BlockPayload::TableRow {
                    cells: vec![vec![TextRun::plain("x")]],
                },
            ),
        ]);
        assert_eq!(
            render(vec![table]),
            "| a | b |\n| --- | --- |\n| x |  |\n\n"
        );
    }

    #[test]
    fn test_empty_table_sentinel() {
        let table = Block::new("t", BlockPayload::Table);
        assert_eq!(render(vec![table]), "<!-- empty table -->\n\n");
    }

    #[test]
    fn test_unsupported_renders_passthrough_comment() {
        let blocks = vec![Block::new(
            "u",
            BlockPayload::Unsupported {
                kind: "synced_block".to_owned(),
            },
        )];
        assert_eq!(
            render(blocks),
            "<!-- unsupported block type: synced_block -->\n\n"
        );
    }

    #[test]
    fn test_child_page_renders_relative_link() {
        let child = Page::test_page("c1", "Sub Page");
        let blocks = vec![Block::new("cp", BlockPayload::ChildPage { page: child })];
        assert_eq!(render(blocks), "[Sub Page](Test/Sub-Page.md)\n\n");
    }

    #[test]
    fn test_divider_bookmark_equation() {
        let blocks = vec![
            Block::new("d", BlockPayload::Divider),
            Block::new(
                "b",
                BlockPayload::Bookmark {
                    url: "https://example.com".to_owned(),
                    caption: Vec::new(),
                },
            ),
            Block::new(
                "e",
                BlockPayload::Equation {
                    expression: "E = mc^2".to_owned(),
                },
            ),
        ];
        assert_eq!(
            render(blocks),
            "---\n\n[https://example.com](https://example.com)\n\n$$\nE = mc^2\n$$\n\n"
        );
    }

    #[test]
    fn test_malformed_block_does_not_abort_siblings() {
        let blocks = vec![
            Block::new(
                "bad",
                BlockPayload::Image {
                    url: None,
                    caption: Vec::new(),
                },
            ),
            paragraph("ok", "still here"),
        ];
        assert_eq!(render(blocks), "still here\n\n");
    }

    #[test]
    fn test_list_under_paragraph_starts_flush_by_default() {
        let blocks = vec![paragraph("p", "intro").with_children(vec![numbered("1", "One")])];
        assert_eq!(render(blocks), "intro\n\n1. One\n");
    }

    #[test]
    fn test_list_under_paragraph_indents_when_configured() {
        let options = RenderOptions {
            nested_list_indent: true,
            ..RenderOptions::default()
        };
        let blocks = vec![paragraph("p", "intro").with_children(vec![numbered("1", "One")])];
        assert_eq!(render_with(&options, blocks), "intro\n\n  1. One\n");
    }

    #[test]
    fn test_empty_paragraph_renders_nothing() {
        let blocks = vec![Block::new("p", BlockPayload::Paragraph { text: Vec::new() })];
        assert_eq!(render(blocks), "");
    }
}
