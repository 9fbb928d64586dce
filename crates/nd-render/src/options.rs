//! Rendering options.
//!
//! The two source-behavior ambiguities (heading weight mapping and list
//! indentation under non-list parents) are explicit options here rather than
//! hard-coded policy.

/// Options controlling Markdown output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "snake_case"))]
pub struct RenderOptions {
    /// How heading-1/2/3 blocks map to output heading weights.
    pub heading_levels: HeadingLevels,
    /// When true, child blocks of a non-list parent (e.g. a list nested
    /// under a paragraph) are indented one unit instead of starting flush.
    pub nested_list_indent: bool,
    /// Overall document shape: plain mirrored document or blog post.
    pub post_format: PostFormat,
}

/// Heading weight mapping policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HeadingLevels {
    /// heading-1/2/3 render as `#`/`##`/`###`.
    #[default]
    Distinct,
    /// All three render as `##`, one level below the page title.
    Uniform,
}

/// Output document shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PostFormat {
    /// Title heading, last-edited line, separator, body; nested directories
    /// keyed by the parent page's sanitized title.
    #[default]
    Document,
    /// YAML front matter (title, date, category), flat date-prefixed
    /// filenames.
    Blog,
}
