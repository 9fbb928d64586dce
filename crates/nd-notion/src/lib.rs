//! Notion content source.
//!
//! Sync HTTP client for the Notion REST API plus the tree fetcher that
//! materializes a page and its recursively-expanded block tree into the
//! `nd-render` document model. All network work happens here, before
//! rendering starts; the renderer never sees this crate.
//!
//! Transient API failures (429, 5xx, transport errors) are retried with a
//! fixed backoff inside the client. Unknown or malformed blocks convert to
//! [`nd_render::BlockPayload::Unsupported`] so they surface in the output
//! instead of being dropped or aborting the fetch.

mod client;
mod convert;
mod error;
mod fetch;
mod wire;

pub use client::NotionClient;
pub use convert::{BlockNode, PageNode, convert_page};
pub use error::NotionError;
pub use fetch::TreeFetcher;
pub use wire::{ChildrenResponse, RawBlock, RawPage, RichTextWire};
