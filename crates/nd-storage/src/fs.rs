//! Filesystem sink.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::sink::{Sink, SinkError};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Writes rendered output under a base directory.
///
/// Creates parent directories as needed; `put` is a plain overwrite, so
/// repeated syncs are idempotent. The revision message is logged and
/// otherwise ignored (no history on a plain directory).
#[derive(Debug)]
pub struct FsSink {
    base: PathBuf,
}

impl FsSink {
    /// Create a sink rooted at `base`.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolve a relative `/`-separated path under the base directory.
    ///
    /// Rejects absolute paths and parent-directory traversal.
    fn resolve(&self, path: &str) -> Result<PathBuf, SinkError> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if path.is_empty() || escapes {
            return Err(SinkError::invalid_path(path).with_backend(BACKEND));
        }
        Ok(self.base.join(relative))
    }

    fn write(&self, path: &str, data: &[u8], message: &str) -> Result<(), SinkError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SinkError::io(e, Some(path.to_owned())).with_backend(BACKEND))?;
        }
        fs::write(&target, data)
            .map_err(|e| SinkError::io(e, Some(path.to_owned())).with_backend(BACKEND))?;
        debug!("wrote {path} ({message})");
        Ok(())
    }
}

impl Sink for FsSink {
    fn put(&self, path: &str, content: &str, message: &str) -> Result<(), SinkError> {
        self.write(path, content.as_bytes(), message)
    }

    fn put_binary(&self, path: &str, data: &[u8], message: &str) -> Result<(), SinkError> {
        self.write(path, data, message)
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.exists())
    }

    fn name(&self) -> &'static str {
        BACKEND
    }
}
