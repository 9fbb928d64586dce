//! Mock sink implementation for testing.
//!
//! Provides [`MockSink`] for unit testing the sync driver without
//! filesystem or network access.

use std::collections::HashSet;
use std::sync::RwLock;

use crate::sink::{Sink, SinkError};

/// One recorded `put` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRecord {
    pub path: String,
    /// Text content, or the binary payload's length rendered as a marker.
    pub content: String,
    pub message: String,
    pub binary: bool,
}

/// Mock sink for testing.
///
/// Records every put in order. Use the builder methods to pre-populate
/// existing paths or make specific paths fail.
///
/// # Example
///
/// ```ignore
/// use nd_storage::{MockSink, Sink};
///
/// let sink = MockSink::new().with_existing("old.md");
/// assert!(sink.exists("old.md"));
/// sink.put("new.md", "content", "create").unwrap();
/// assert_eq!(sink.puts().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockSink {
    puts: RwLock<Vec<PutRecord>>,
    existing: RwLock<HashSet<String>>,
    failing: RwLock<HashSet<String>>,
}

impl MockSink {
    /// Create a new empty mock sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a path as already existing.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_existing(self, path: impl Into<String>) -> Self {
        self.existing.write().unwrap().insert(path.into());
        self
    }

    /// Make every put to a path fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing(self, path: impl Into<String>) -> Self {
        self.failing.write().unwrap().insert(path.into());
        self
    }

    /// All recorded puts, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn puts(&self) -> Vec<PutRecord> {
        self.puts.read().unwrap().clone()
    }

    fn record(
        &self,
        path: &str,
        content: String,
        message: &str,
        binary: bool,
    ) -> Result<(), SinkError> {
        if self.failing.read().unwrap().contains(path) {
            return Err(SinkError::new(crate::sink::SinkErrorKind::Unavailable)
                .with_path(path)
                .with_backend("Mock"));
        }
        self.puts.write().unwrap().push(PutRecord {
            path: path.to_owned(),
            content,
            message: message.to_owned(),
            binary,
        });
        self.existing.write().unwrap().insert(path.to_owned());
        Ok(())
    }
}

impl Sink for MockSink {
    fn put(&self, path: &str, content: &str, message: &str) -> Result<(), SinkError> {
        self.record(path, content.to_owned(), message, false)
    }

    fn put_binary(&self, path: &str, data: &[u8], message: &str) -> Result<(), SinkError> {
        self.record(path, format!("<{} bytes>", data.len()), message, true)
    }

    fn exists(&self, path: &str) -> bool {
        self.existing.read().unwrap().contains(path)
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_records_puts_in_order() {
        let sink = MockSink::new();
        sink.put("a.md", "A", "create a").unwrap();
        sink.put("b.md", "B", "create b").unwrap();

        let puts = sink.puts();
        assert_eq!(puts.len(), 2);
        assert_eq!(puts[0].path, "a.md");
        assert_eq!(puts[1].path, "b.md");
    }

    #[test]
    fn test_put_marks_existing() {
        let sink = MockSink::new();
        assert!(!sink.exists("a.md"));
        sink.put("a.md", "A", "m").unwrap();
        assert!(sink.exists("a.md"));
    }

    #[test]
    fn test_failing_path_errors() {
        let sink = MockSink::new().with_failing("bad.md");
        assert!(sink.put("bad.md", "x", "m").is_err());
        assert!(sink.puts().is_empty());
    }

    #[test]
    fn test_binary_put_records_marker() {
        let sink = MockSink::new();
        sink.put_binary("img.png", &[0; 16], "image").unwrap();
        let puts = sink.puts();
        assert!(puts[0].binary);
        assert_eq!(puts[0].content, "<16 bytes>");
    }
}
