//! Structured render diagnostics.

use std::fmt;

/// A non-fatal problem encountered while rendering.
///
/// The renderer never logs and never fails; malformed blocks degrade to
/// empty or passthrough output and are reported here for the caller to log
/// or surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderWarning {
    /// Page on which the problem occurred.
    pub page_id: String,
    /// Offending block, when attributable to one.
    pub block_id: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl RenderWarning {
    pub(crate) fn new(
        page_id: impl Into<String>,
        block_id: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            page_id: page_id.into(),
            block_id: block_id.map(str::to_owned),
            message: message.into(),
        }
    }
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.block_id {
            Some(block) => write!(
                f,
                "page {}: block {}: {}",
                self.page_id, block, self.message
            ),
            None => write!(f, "page {}: {}", self.page_id, self.message),
        }
    }
}
