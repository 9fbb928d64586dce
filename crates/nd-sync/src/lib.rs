//! Sync driver for notedown.
//!
//! Orchestrates one fetch → render → write pass: renders the workspace,
//! skips pages whose last-edited timestamp hasn't moved since the previous
//! pass, re-hosts referenced images through the sink (rewriting their URLs),
//! and records new timestamps in a JSON state file. One failed document
//! never aborts the pass; failures become warnings in the
//! [`SyncOutcome`].
//!
//! The driver owns no rendering policy and no sink policy: the renderer
//! decides content and relative paths, the sink decides conflict handling.

mod driver;
mod error;
mod images;
mod state;

pub use driver::{DryRunOutcome, SyncOptions, SyncOutcome, Syncer};
pub use error::SyncError;
pub use images::ImageFetcher;
pub use state::SyncState;
