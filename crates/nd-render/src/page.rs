//! Whole-page and workspace rendering.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::block::BlockRenderer;
use crate::model::{Block, BlockPayload, ImageRef, Page, RenderedDocument};
use crate::options::{PostFormat, RenderOptions};
use crate::util::sanitize_title;
use crate::warning::RenderWarning;

/// Everything one workspace render produces.
#[derive(Debug, Default)]
pub struct RenderOutput {
    /// Rendered documents, root page first, children in traversal order.
    pub documents: Vec<RenderedDocument>,
    /// Images referenced by the documents, for the driver to re-host.
    pub images: Vec<ImageRef>,
    /// Non-fatal problems encountered along the way.
    pub warnings: Vec<RenderWarning>,
}

/// Renders a page and all reachable descendant pages to Markdown documents.
///
/// Owns the processed-page set for the duration of one workspace traversal;
/// a page reachable twice (duplicate reference or cycle) is rendered exactly
/// once. Create a fresh instance per workspace; instances are single-use.
pub struct PageRenderer<'a> {
    options: &'a RenderOptions,
    processed: HashSet<String>,
}

impl<'a> PageRenderer<'a> {
    #[must_use]
    pub fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            processed: HashSet::new(),
        }
    }

    /// Render the workspace rooted at `page` into a flat ordered document set.
    #[must_use]
    pub fn render_workspace(mut self, page: &Page) -> RenderOutput {
        let mut output = RenderOutput::default();
        self.render_page(page, "", &[], &mut output);
        output
    }

    fn render_page(
        &mut self,
        page: &Page,
        dir: &str,
        categories: &[String],
        output: &mut RenderOutput,
    ) {
        if !self.processed.insert(page.id.clone()) {
            // Cyclic or duplicate reference; not an error, just already done.
            return;
        }

        let stem = sanitize_title(&page.title);
        let (path, child_link_dir, child_dir) = match self.options.post_format {
            PostFormat::Document => (
                format!("{dir}{stem}.md"),
                format!("{stem}/"),
                format!("{dir}{stem}/"),
            ),
            PostFormat::Blog => (
                format!("{}-{stem}.md", page.created_time.format("%Y-%m-%d")),
                String::new(),
                String::new(),
            ),
        };

        let mut renderer = BlockRenderer::new(self.options, page, child_link_dir);
        let body = renderer.render_blocks(&page.blocks);
        let (images, warnings) = renderer.finish();
        output.images.extend(images);
        output.warnings.extend(warnings);

        let content = match self.options.post_format {
            PostFormat::Document => document_content(page, &body),
            PostFormat::Blog => blog_content(page, categories, &body),
        };
        output.documents.push(RenderedDocument {
            path,
            content,
            page_id: page.id.clone(),
            last_edited_time: page.last_edited_time,
        });

        let mut child_categories = categories.to_vec();
        child_categories.push(page.title.clone());
        for child in collect_child_pages(&page.blocks) {
            self.render_page(child, &child_dir, &child_categories, output);
        }
    }
}

/// Plain mirrored document: title heading, edit-stamp line, separator, body.
fn document_content(page: &Page, body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 128);
    let _ = writeln!(out, "# {}\n", page.title);
    let _ = writeln!(
        out,
        "_Last edited: {}_\n",
        page.last_edited_time.format("%Y-%m-%d %H:%M UTC")
    );
    out.push_str("---\n\n");
    out.push_str(body);
    out
}

/// Blog post: YAML front matter, then the body without a title heading.
fn blog_content(page: &Page, categories: &[String], body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 128);
    out.push_str("---\n");
    let _ = writeln!(out, "title: {}", page.title);
    let _ = writeln!(out, "date: {}", page.created_time.format("%Y-%m-%d %H:%M:%S"));
    if let Some(category) = categories.first() {
        let _ = writeln!(out, "categories: {category}");
    }
    out.push_str("---\n\n");
    out.push_str(body);
    out
}

/// Depth-first search for child-page blocks anywhere in a block tree.
///
/// Child pages nested inside lists or toggles count; the subtree of a child
/// page itself is not entered here (the recursion into it happens when that
/// page is rendered).
fn collect_child_pages(blocks: &[Block]) -> Vec<&Page> {
    let mut pages = Vec::new();
    for block in blocks {
        if let BlockPayload::ChildPage { page } = &block.payload {
            pages.push(page);
        } else {
            pages.extend(collect_child_pages(&block.children));
        }
    }
    pages
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::TextRun;

    fn paragraph(id: &str, text: &str) -> Block {
        Block::new(
            id,
            BlockPayload::Paragraph {
                text: vec![TextRun::plain(text)],
            },
        )
    }

    fn child_page_block(id: &str, page: Page) -> Block {
        Block::new(id, BlockPayload::ChildPage { page })
    }

    #[test]
    fn test_single_page_document() {
        let page = Page::test_page("p1", "My Page").with_blocks(vec![paragraph("b1", "Hello")]);
        let output = PageRenderer::new(&RenderOptions::default()).render_workspace(&page);

        assert_eq!(output.documents.len(), 1);
        let doc = &output.documents[0];
        assert_eq!(doc.path, "My-Page.md");
        assert_eq!(doc.page_id, "p1");
        assert_eq!(
            doc.content,
            "# My Page\n\n_Last edited: 2024-01-15 10:30 UTC_\n\n---\n\nHello\n\n"
        );
    }

    #[test]
    fn test_untitled_page_does_not_raise() {
        let page = Page::test_page("p1", "").with_blocks(vec![paragraph("b1", "x")]);
        let output = PageRenderer::new(&RenderOptions::default()).render_workspace(&page);
        assert_eq!(output.documents[0].path, "Untitled.md");
    }

    #[test]
    fn test_child_pages_nest_under_parent_directory() {
        let grandchild = Page::test_page("p3", "Deep").with_blocks(vec![paragraph("b3", "g")]);
        let child = Page::test_page("p2", "Child")
            .with_blocks(vec![child_page_block("cp2", grandchild)]);
        let root = Page::test_page("p1", "Root").with_blocks(vec![
            paragraph("b1", "intro"),
            child_page_block("cp1", child),
        ]);

        let output = PageRenderer::new(&RenderOptions::default()).render_workspace(&root);
        let paths: Vec<&str> = output.documents.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["Root.md", "Root/Child.md", "Root/Child/Deep.md"]);

        // The parent body links to the child relative to itself.
        assert!(output.documents[0].content.contains("[Child](Root/Child.md)"));
        assert!(output.documents[1].content.contains("[Deep](Child/Deep.md)"));
    }

    #[test]
    fn test_cycle_renders_once_and_terminates() {
        // A page that carries itself as a descendant.
        let self_ref = Page::test_page("p1", "Loop");
        let root = Page::test_page("p1", "Loop")
            .with_blocks(vec![child_page_block("cp", self_ref)]);

        let output = PageRenderer::new(&RenderOptions::default()).render_workspace(&root);
        assert_eq!(output.documents.len(), 1);
    }

    #[test]
    fn test_duplicate_reference_emits_once() {
        let shared = Page::test_page("p2", "Shared");
        let root = Page::test_page("p1", "Root").with_blocks(vec![
            child_page_block("cp1", shared.clone()),
            child_page_block("cp2", shared),
        ]);

        let output = PageRenderer::new(&RenderOptions::default()).render_workspace(&root);
        let paths: Vec<&str> = output.documents.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["Root.md", "Root/Shared.md"]);
    }

    #[test]
    fn test_child_page_nested_in_list_is_found() {
        let child = Page::test_page("p2", "Tucked");
        let root = Page::test_page("p1", "Root").with_blocks(vec![
            Block::new(
                "li",
                BlockPayload::BulletedListItem {
                    text: vec![TextRun::plain("see below")],
                },
            )
            .with_children(vec![child_page_block("cp", child)]),
        ]);

        let output = PageRenderer::new(&RenderOptions::default()).render_workspace(&root);
        assert_eq!(output.documents.len(), 2);
        assert_eq!(output.documents[1].path, "Root/Tucked.md");
    }

    #[test]
    fn test_blog_format_front_matter_and_filename() {
        let options = RenderOptions {
            post_format: PostFormat::Blog,
            ..RenderOptions::default()
        };
        let child = Page::test_page("p2", "A Post").with_blocks(vec![paragraph("b2", "body")]);
        let root = Page::test_page("p1", "Blog Home")
            .with_blocks(vec![child_page_block("cp", child)]);

        let output = PageRenderer::new(&options).render_workspace(&root);
        assert_eq!(output.documents[0].path, "2024-01-15-Blog-Home.md");
        assert_eq!(output.documents[1].path, "2024-01-15-A-Post.md");

        let post = &output.documents[1].content;
        assert!(post.starts_with("---\ntitle: A Post\ndate: 2024-01-15 10:30:00\n"));
        assert!(post.contains("categories: Blog Home\n"));
        assert!(!post.contains("# A Post"));
    }

    #[test]
    fn test_empty_page_still_produces_document() {
        let page = Page::test_page("p1", "Bare");
        let output = PageRenderer::new(&RenderOptions::default()).render_workspace(&page);
        assert_eq!(output.documents.len(), 1);
        assert!(output.documents[0].content.ends_with("---\n\n"));
    }

    #[test]
    fn test_warnings_and_images_are_aggregated() {
        let child = Page::test_page("p2", "Child").with_blocks(vec![Block::new(
            "img",
            BlockPayload::Image {
                url: None,
                caption: Vec::new(),
            },
        )]);
        let root = Page::test_page("p1", "Root").with_blocks(vec![
            Block::new(
                "img0",
                BlockPayload::Image {
                    url: Some("https://example.com/x.png".to_owned()),
                    caption: Vec::new(),
                },
            ),
            child_page_block("cp", child),
        ]);

        let output = PageRenderer::new(&RenderOptions::default()).render_workspace(&root);
        assert_eq!(output.images.len(), 1);
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].page_id, "p2");
    }
}
