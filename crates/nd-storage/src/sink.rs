//! Sink trait and error types.
//!
//! Provides the core [`Sink`] trait for persisting rendered output, along
//! with [`SinkError`] for unified error handling across backends.

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SinkErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied (bad credentials, protected branch).
    PermissionDenied,
    /// Invalid path or identifier.
    InvalidPath,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Too many requests.
    RateLimited,
    /// Operation timed out.
    Timeout,
    /// Write conflict (e.g. stale content SHA).
    Conflict,
    /// Other/unknown error category.
    Other,
}

/// Retry guidance.
#[derive(Debug, PartialEq, Eq, Default)]
pub enum ErrorStatus {
    /// Don't retry (config error, invalid path).
    #[default]
    Permanent,
    /// Retry immediately (timeout, connection reset).
    Temporary,
    /// Retry with backoff (rate limited, service unavailable).
    Persistent,
}

/// Sink error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct SinkError {
    /// Semantic error category.
    pub kind: SinkErrorKind,
    /// Retry guidance.
    pub status: ErrorStatus,
    /// Relative path context (if applicable).
    pub path: Option<String>,
    /// Backend identifier (e.g., "Fs", "GitHub").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SinkError {
    /// Create a new sink error.
    #[must_use]
    pub fn new(kind: SinkErrorKind) -> Self {
        Self {
            kind,
            status: ErrorStatus::Permanent,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set retry status.
    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create an invalid path error.
    #[must_use]
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::new(SinkErrorKind::InvalidPath).with_path(path)
    }

    /// Create a sink error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<String>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SinkErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => SinkErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut => SinkErrorKind::Timeout,
            _ => SinkErrorKind::Other,
        };
        let status = match err.kind() {
            std::io::ErrorKind::TimedOut => ErrorStatus::Temporary,
            _ => ErrorStatus::Permanent,
        };
        let mut error = Self::new(kind).with_status(status).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            SinkErrorKind::NotFound => "Not found",
            SinkErrorKind::PermissionDenied => "Permission denied",
            SinkErrorKind::InvalidPath => "Invalid path",
            SinkErrorKind::Unavailable => "Unavailable",
            SinkErrorKind::RateLimited => "Rate limited",
            SinkErrorKind::Timeout => "Timeout",
            SinkErrorKind::Conflict => "Conflict",
            SinkErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {path})")?;
        }

        Ok(())
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Persistence backend for rendered output.
///
/// `put` has create-or-update semantics: the backend decides whether the
/// path exists and how to record history (a commit, a plain overwrite).
/// `message` describes the change for backends with revision history.
pub trait Sink: Send + Sync {
    /// Create or update a text file at a relative path.
    fn put(&self, path: &str, content: &str, message: &str) -> Result<(), SinkError>;

    /// Create or update a binary file at a relative path.
    fn put_binary(&self, path: &str, data: &[u8], message: &str) -> Result<(), SinkError>;

    /// Whether a file already exists at the path.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &str) -> bool;

    /// Backend identifier for logs and error messages.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_sink_error_new_defaults() {
        let err = SinkError::new(SinkErrorKind::NotFound);
        assert_eq!(err.kind, SinkErrorKind::NotFound);
        assert_eq!(err.status, ErrorStatus::Permanent);
        assert!(err.path.is_none());
        assert!(err.backend.is_none());
    }

    #[test]
    fn test_sink_error_display_simple() {
        let err = SinkError::new(SinkErrorKind::RateLimited);
        assert_eq!(err.to_string(), "Rate limited");
    }

    #[test]
    fn test_sink_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SinkError::new(SinkErrorKind::NotFound)
            .with_backend("Fs")
            .with_path("a/b.md")
            .with_source(io_err);
        assert_eq!(
            err.to_string(),
            "[Fs] Not found: file not found (path: a/b.md)"
        );
    }

    #[test]
    fn test_io_mapping_timeout_is_temporary() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = SinkError::io(io_err, None);
        assert_eq!(err.kind, SinkErrorKind::Timeout);
        assert_eq!(err.status, ErrorStatus::Temporary);
    }

    #[test]
    fn test_io_mapping_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SinkError::io(io_err, Some("x.md".to_owned()));
        assert_eq!(err.kind, SinkErrorKind::PermissionDenied);
        assert_eq!(err.path.as_deref(), Some("x.md"));
    }

    #[test]
    fn test_sink_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SinkError>();
    }
}
