//! CLI command implementations.

mod sync;
mod watch;

pub(crate) use sync::SyncArgs;
pub(crate) use watch::WatchArgs;
