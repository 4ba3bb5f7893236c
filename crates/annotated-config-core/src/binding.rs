//! Binding between configuration structs and documents.
//!
//! A [`Configuration`] walks its own fields twice: once with a [`Loader`] to
//! pull values out of a parsed document, once with a [`Saver`] to push its
//! values back in. `#[derive(Configuration)]` writes both walks; a manual
//! implementation looks like this:
//!
//! ```
//! use annotated_config_core::{Configuration, Loader, Saver};
//!
//! #[derive(Default)]
//! struct Server {
//!     port: u16,
//! }
//!
//! impl Configuration for Server {
//!     fn load_properties(&mut self, loader: &mut Loader<'_>) {
//!         loader.property("port", &mut self.port);
//!     }
//!
//!     fn save_properties(&self, saver: &mut Saver<'_>) {
//!         saver.property("port", &["Port to listen on."], &self.port);
//!     }
//! }
//! ```

use tracing::{trace, warn};

use crate::document::{Node, Table};
use crate::property::{Mismatch, PropertyValue};

/// A struct whose fields map onto the keys of a configuration file.
pub trait Configuration {
    /// Copy every compatible value found under the loader's table into the
    /// matching field.
    fn load_properties(&mut self, loader: &mut Loader<'_>);

    /// Write every field, with its declared comments, into the saver's table.
    fn save_properties(&self, saver: &mut Saver<'_>);
}

/// A file value that was present but could not be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub path: String,
    pub reason: Mismatch,
}

/// What happened to each property during one load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Paths whose file value was stored in the field.
    pub applied: Vec<String>,
    /// Paths absent from the file; their fields kept their values.
    pub missing: Vec<String>,
    /// Paths whose file value had an incompatible type.
    pub rejected: Vec<Rejection>,
}

impl LoadReport {
    /// True when no file value was rejected.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Reads properties out of one table of a parsed document.
pub struct Loader<'a> {
    table: Option<&'a Table>,
    prefix: String,
    report: &'a mut LoadReport,
}

impl<'a> Loader<'a> {
    /// A loader over the root table of a document.
    pub fn new(root: &'a Table, report: &'a mut LoadReport) -> Self {
        Self {
            table: Some(root),
            prefix: String::new(),
            report,
        }
    }

    /// Dotted path of the table this loader reads.
    pub fn path(&self) -> &str {
        &self.prefix
    }

    /// Store the value at `key` in `field` when present and compatible.
    pub fn property<T: PropertyValue>(&mut self, key: &str, field: &mut T) {
        let path = join(&self.prefix, key);
        let Some(node) = self.table.and_then(|t| t.get_path(key)) else {
            trace!(%path, "property not in file");
            self.report.missing.push(path);
            return;
        };
        match T::from_value(&node.to_value()) {
            Ok(value) => {
                *field = value;
                trace!(%path, "property loaded");
                self.report.applied.push(path);
            }
            Err(reason) => {
                warn!(%path, %reason, "ignoring incompatible value, keeping current one");
                self.report.rejected.push(Rejection { path, reason });
            }
        }
    }

    /// Load a nested section from the table at `key`. A missing table, or a
    /// plain value where a table belongs, leaves every field of the section
    /// as it is.
    pub fn section<C: Configuration + ?Sized>(&mut self, key: &str, section: &mut C) {
        let path = join(&self.prefix, key);
        let table = self.table.and_then(|t| t.get_path(key)).and_then(Node::as_table);
        let mut child = Loader {
            table,
            prefix: path,
            report: &mut *self.report,
        };
        section.load_properties(&mut child);
    }
}

/// Writes properties into one table of a document.
pub struct Saver<'a> {
    table: &'a mut Table,
    prefix: String,
}

impl<'a> Saver<'a> {
    /// A saver over the root table of a document.
    pub fn new(root: &'a mut Table) -> Self {
        Self {
            table: root,
            prefix: String::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.prefix
    }

    /// Write `field` at `key`. `comments` are used only when the document has
    /// no entry at `key` yet.
    pub fn property<T: PropertyValue>(&mut self, key: &str, comments: &[&str], field: &T) {
        trace!(path = %join(&self.prefix, key), "property saved");
        self.table.set_value(key, field.to_value(), comments);
    }

    /// Write a nested section into the table at `key`, creating it with
    /// `comments` when absent.
    pub fn section<C: Configuration + ?Sized>(&mut self, key: &str, comments: &[&str], section: &C) {
        let prefix = join(&self.prefix, key);
        let mut child = Saver {
            table: self.table.section_mut(key, comments),
            prefix,
        };
        section.save_properties(&mut child);
    }
}
