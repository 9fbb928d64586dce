//! Recursive block-tree fetcher.

use tracing::info;

use nd_render::Page;

use crate::client::NotionClient;
use crate::convert::{BlockNode, PageNode, convert_page};
use crate::error::NotionError;

/// Materializes a page and its full block subtree, including the embedded
/// page records child-page blocks need, so rendering can proceed without
/// further round-trips.
pub struct TreeFetcher<'a> {
    client: &'a NotionClient,
}

impl<'a> TreeFetcher<'a> {
    #[must_use]
    pub fn new(client: &'a NotionClient) -> Self {
        Self { client }
    }

    /// Fetch the workspace rooted at `root_page_id` as a document-model page.
    pub fn fetch_workspace(&self, root_page_id: &str) -> Result<Page, NotionError> {
        info!("fetching workspace root {root_page_id}");
        let page = self.client.get_page(root_page_id)?;
        let blocks = self.fetch_children(&page.id)?;
        Ok(convert_page(&PageNode { page, blocks }))
    }

    fn fetch_children(&self, block_id: &str) -> Result<Vec<BlockNode>, NotionError> {
        let mut nodes = Vec::new();
        for raw in self.client.list_children(block_id)? {
            let node = if raw.block_type == "child_page" {
                // A child_page block's id doubles as the child page's id;
                // its listed children are the child page's content.
                let page = self.client.get_page(&raw.id)?;
                let blocks = if raw.has_children {
                    self.fetch_children(&raw.id)?
                } else {
                    Vec::new()
                };
                BlockNode {
                    block: raw,
                    children: Vec::new(),
                    child_page: Some(Box::new(PageNode { page, blocks })),
                }
            } else {
                let children = if raw.has_children {
                    self.fetch_children(&raw.id)?
                } else {
                    Vec::new()
                };
                BlockNode {
                    block: raw,
                    children,
                    child_page: None,
                }
            };
            nodes.push(node);
        }
        Ok(nodes)
    }
}
