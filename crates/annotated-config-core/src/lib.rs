//! Core of annotated-config: bind plain Rust structs to commented
//! configuration files.
//!
//! # Module layout
//!
//! - **value** — format-neutral [`Value`].
//! - **document** — commented, ordered [`Document`] tree.
//! - **property** — [`PropertyValue`] conversions for field types.
//! - **binding** — the [`Configuration`] trait and its [`Loader`]/[`Saver`] walks.
//! - **format** — the [`Format`] trait implemented by the TOML and YAML crates.
//! - **config_file** — [`ConfigFile`], which ties a configuration, a format and a path together.
//! - **file_util** — directory and file creation helpers.

// Lets `#[derive(Configuration)]` name this crate by its extern name from inside it.
extern crate self as annotated_config_core;

pub mod binding;
pub mod config_file;
pub mod document;
pub mod error;
pub mod file_util;
pub mod format;
pub mod property;
pub mod value;

pub use binding::{Configuration, LoadReport, Loader, Rejection, Saver};
pub use config_file::{ConfigFile, ConfigFileBuilder, DefaultResource};
pub use document::{Document, Entry, Node, Table};
pub use error::{ConfigError, Result};
pub use format::Format;
pub use property::{Mismatch, PropertyValue};
pub use value::Value;

pub use indexmap::IndexMap;
