//! Bind plain Rust structs to commented TOML and YAML configuration files.
//!
//! Fields marked `#[config(property)]` map to keys, fields marked
//! `#[config(section)]` map to nested tables, and `comment = "..."` text is
//! written above each entry the first time it is saved. Comments and keys
//! already in the file are left alone.
//!
//! ```no_run
//! use annotated_config::{Configuration, TomlConfig};
//!
//! #[derive(Configuration)]
//! struct Settings {
//!     #[config(property, comment = "Port to listen on.")]
//!     port: u16,
//!     #[config(section = "database", comment = "Storage settings.")]
//!     database: Database,
//! }
//!
//! #[derive(Default, Configuration)]
//! struct Database {
//!     #[config(property = "url")]
//!     url: Option<String>,
//! }
//!
//! impl Default for Settings {
//!     fn default() -> Self {
//!         Self { port: 8080, database: Database::default() }
//!     }
//! }
//!
//! let settings = TomlConfig::<Settings>::create("settings.toml")?;
//! println!("port {}", settings.port);
//! # Ok::<(), annotated_config::ConfigError>(())
//! ```
//!
//! The `toml` and `yaml` features (both on by default) select the formats.

// Lets `#[derive(Configuration)]` name this crate by its extern name from inside it.
extern crate self as annotated_config;

pub mod logger;

pub use annotated_config_core::*;
pub use annotated_config_derive::Configuration;

#[cfg(feature = "toml")]
pub use annotated_config_toml::{Toml, TomlConfig};
#[cfg(feature = "yaml")]
pub use annotated_config_yaml::{Yaml, YamlConfig};
