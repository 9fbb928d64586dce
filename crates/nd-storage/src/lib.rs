//! Content sink abstraction for notedown.
//!
//! This crate provides the [`Sink`] trait for persisting rendered Markdown
//! and re-hosted images, abstracted over the backend. This enables:
//!
//! - **Unit testing** the sync driver without network or filesystem access
//! - **Backend flexibility** (local directory, GitHub repository)
//! - **Clean separation** between rendering and persistence
//!
//! Paths handed to a sink are always relative with `/`-separated segments;
//! each backend roots them under its own base (a directory, a repository
//! branch). Conflict handling — file exists vs. not — is the sink's
//! concern, never the renderer's.

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod sink;

pub use fs::FsSink;
#[cfg(feature = "mock")]
pub use mock::{MockSink, PutRecord};
pub use sink::{ErrorStatus, Sink, SinkError, SinkErrorKind};
