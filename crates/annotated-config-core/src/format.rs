//! The seam between the core and a file syntax.

use crate::document::Document;

/// A file syntax that can read and write commented [`Document`]s.
///
/// Errors are plain messages; [`crate::ConfigFile`] attaches the file path
/// and format name before surfacing them as [`crate::ConfigError`].
pub trait Format {
    /// Lowercase name used in diagnostics, e.g. `"toml"`.
    fn name(&self) -> &'static str;

    /// Conventional file extension, without the dot.
    fn extension(&self) -> &'static str;

    /// Parse file contents. Empty input yields an empty document.
    fn parse(&self, source: &str) -> Result<Document, String>;

    /// Render a document, including comments.
    fn render(&self, document: &Document) -> Result<String, String>;
}
