//! Block-tree to Markdown renderer.
//!
//! This crate is the core of notedown: it walks a recursively-nested tree of
//! typed content blocks and deterministically emits Markdown, tracking the
//! cross-block state (list nesting, ordered-list numbering, table assembly)
//! that cannot be computed from any single block in isolation.
//!
//! The renderer performs no I/O. It consumes an already-materialized
//! [`Page`] tree and produces an ordered set of [`RenderedDocument`]s plus
//! structured [`RenderWarning`]s and collected [`ImageRef`]s for the
//! surrounding sync driver to act on. All mutable state (list context,
//! processed-page set) is scoped to a single [`PageRenderer::render_workspace`]
//! call, so independent workspaces can be rendered concurrently with separate
//! renderer instances.
//!
//! # Example
//!
//! ```
//! use nd_render::{Block, BlockPayload, Page, PageRenderer, RenderOptions, TextRun};
//!
//! let page = Page::test_page("p1", "Intro").with_blocks(vec![
//!     Block::new("b1", BlockPayload::Heading1 { text: vec![TextRun::plain("Intro")] }),
//! ]);
//! let output = PageRenderer::new(&RenderOptions::default()).render_workspace(&page);
//! assert_eq!(output.documents.len(), 1);
//! assert!(output.documents[0].content.contains("# Intro"));
//! ```

mod block;
mod list;
mod model;
mod options;
mod page;
mod richtext;
mod table;
mod util;
mod warning;

pub use block::BlockRenderer;
pub use list::{ListContext, ListKind};
pub use model::{
    Annotations, Block, BlockPayload, ImageRef, Page, RenderedDocument, TextRun,
};
pub use options::{HeadingLevels, PostFormat, RenderOptions};
pub use page::{PageRenderer, RenderOutput};
pub use richtext::render_runs;
pub use table::render_table;
pub use util::sanitize_title;
pub use warning::RenderWarning;
